// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tree nodes and the merge algorithm that inserts a command's
//! component chain into them.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::command::{Command, Predicate};
use crate::component::{ArgumentComponent, CommandFlag, LiteralComponent};
use crate::errors::RegistrationError;

pub(crate) enum NodeKind<S> {
    Root,
    Literal(LiteralComponent),
    Argument(ArgumentComponent<S>),
}

/// One node of the command tree.
///
/// Children are tried, during both parsing and suggestion, in the
/// priority order literals, then the single argument child — this is
/// an invariant the merge algorithm preserves by construction, since
/// `IndexMap` keeps insertion order and there is at most one argument
/// child.
pub struct CommandNode<S> {
    kind: NodeKind<S>,
    literal_children: IndexMap<String, CommandNode<S>>,
    alias_to_primary: HashMap<String, String>,
    argument_child: Option<Box<CommandNode<S>>>,
    flags: Vec<CommandFlag<S>>,
    command: Option<Arc<Command<S>>>,
    aggregated_permission: Option<Predicate<S>>,
    aggregated_sender_type: Option<Predicate<S>>,
}

impl<S> CommandNode<S> {
    fn new(kind: NodeKind<S>) -> Self {
        CommandNode {
            kind,
            literal_children: IndexMap::new(),
            alias_to_primary: HashMap::new(),
            argument_child: None,
            flags: Vec::new(),
            command: None,
            aggregated_permission: None,
            aggregated_sender_type: None,
        }
    }

    pub(crate) fn root() -> Self {
        CommandNode::new(NodeKind::Root)
    }

    /// The literal this node matches, if it is a literal node.
    pub fn literal(&self) -> Option<&LiteralComponent> {
        match &self.kind {
            NodeKind::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// The argument this node binds, if it is an argument node.
    pub fn argument(&self) -> Option<&ArgumentComponent<S>> {
        match &self.kind {
            NodeKind::Argument(argument) => Some(argument),
            _ => None,
        }
    }

    /// The command terminal at this node, if registering a command
    /// ended its chain here.
    pub fn command(&self) -> Option<&Arc<Command<S>>> {
        self.command.as_ref()
    }

    /// The flags declared on the command terminal at this node, if
    /// any.
    pub fn flags(&self) -> &[CommandFlag<S>] {
        &self.flags
    }

    pub(crate) fn aggregated_permission(&self) -> Option<&Predicate<S>> {
        self.aggregated_permission.as_ref()
    }

    pub(crate) fn aggregated_sender_type(&self) -> Option<&Predicate<S>> {
        self.aggregated_sender_type.as_ref()
    }

    /// `true` if the aggregated predicates do not already exclude
    /// `sender`, i.e. some reachable terminal might still accept them.
    pub(crate) fn is_reachable_by(&self, sender: &S) -> bool {
        self.aggregated_permission
            .as_ref()
            .map_or(true, |predicate| predicate(sender))
            && self
                .aggregated_sender_type
                .as_ref()
                .map_or(true, |predicate| predicate(sender))
    }

    /// This node's literal children, in registration/priority order.
    pub fn literal_children(&self) -> impl Iterator<Item = &CommandNode<S>> {
        self.literal_children.values()
    }

    /// This node's single argument child, if it has one.
    pub fn argument_child(&self) -> Option<&CommandNode<S>> {
        self.argument_child.as_deref()
    }

    pub(crate) fn find_literal_child(&self, token: &str) -> Option<&CommandNode<S>> {
        if let Some(node) = self.literal_children.get(token) {
            return Some(node);
        }
        let primary = self.alias_to_primary.get(token)?;
        self.literal_children.get(primary)
    }

    fn has_reachable_command(&self) -> bool {
        self.command.is_some()
            || self.literal_children.values().any(|c| c.has_reachable_command())
            || self
                .argument_child
                .as_deref()
                .map_or(false, |c| c.has_reachable_command())
    }

    /// Insert (or descend into an equivalent existing) literal child.
    pub(crate) fn insert_literal(
        &mut self,
        literal: LiteralComponent,
    ) -> Result<&mut CommandNode<S>, RegistrationError> {
        if let Some(existing) = self.literal_children.get(&literal.name) {
            if existing.literal().map_or(false, |l| l.same_as(&literal)) {
                return Ok(self.literal_children.get_mut(&literal.name).unwrap());
            }
            return Err(RegistrationError::DuplicateCommandChain(literal.name));
        }
        for existing in self.literal_children.values() {
            if let Some(existing_literal) = existing.literal() {
                for name in literal.all_names() {
                    if existing_literal.all_names().any(|n| n == name) {
                        return Err(RegistrationError::DuplicateCommandChain(name.to_string()));
                    }
                }
            }
        }
        let primary = literal.name.clone();
        for alias in &literal.aliases {
            self.alias_to_primary.insert(alias.clone(), primary.clone());
        }
        self.literal_children
            .insert(primary.clone(), CommandNode::new(NodeKind::Literal(literal)));
        Ok(self.literal_children.get_mut(&primary).unwrap())
    }

    /// Insert (or descend into the existing) argument child.
    ///
    /// Two argument components merge when they share a binding name,
    /// regardless of whether their parsers are the same concrete
    /// type; see the open question recorded in `DESIGN.md`.
    pub(crate) fn insert_argument(
        &mut self,
        argument: ArgumentComponent<S>,
    ) -> Result<&mut CommandNode<S>, RegistrationError> {
        if self.argument_child.is_some() {
            let same_name = self
                .argument_child
                .as_ref()
                .unwrap()
                .argument()
                .map_or(false, |a| a.name == argument.name);
            if !same_name {
                return Err(RegistrationError::AmbiguousNode(argument.name));
            }
            let existing_tag = self
                .argument_child
                .as_ref()
                .unwrap()
                .argument()
                .unwrap()
                .parser
                .type_tag();
            let new_tag = argument.parser.type_tag();
            if existing_tag != new_tag {
                log::warn!(
                    "merging argument node '{}' whose parsers differ ('{}' vs '{}')",
                    argument.name,
                    existing_tag,
                    new_tag
                );
            }
            return Ok(self.argument_child.as_mut().unwrap());
        }
        self.argument_child = Some(Box::new(CommandNode::new(NodeKind::Argument(argument))));
        Ok(self.argument_child.as_mut().unwrap())
    }

    /// Attach this command's flags to a terminal node, failing if any
    /// collide by name with flags already attached there.
    pub(crate) fn attach_flags(
        &mut self,
        flags: Vec<CommandFlag<S>>,
    ) -> Result<(), RegistrationError> {
        for flag in flags {
            if self.flags.iter().any(|f| f.name() == flag.name()) {
                return Err(RegistrationError::DuplicateCommandChain(
                    flag.name().to_string(),
                ));
            }
            self.flags.push(flag);
        }
        Ok(())
    }

    pub(crate) fn set_terminal(
        &mut self,
        command: Arc<Command<S>>,
    ) -> Result<(), RegistrationError> {
        if self.command.is_some() {
            return Err(RegistrationError::DuplicateCommand(command.name().to_string()));
        }
        self.command = Some(command);
        Ok(())
    }

    /// Recompute `aggregated_permission`/`aggregated_sender_type`
    /// bottom-up. Called after every registration.
    pub(crate) fn recompute_aggregates(&mut self) {
        for child in self.literal_children.values_mut() {
            child.recompute_aggregates();
        }
        if let Some(argument) = &mut self.argument_child {
            argument.recompute_aggregates();
        }

        let mut permissions = Vec::new();
        let mut sender_types = Vec::new();

        if let Some(command) = &self.command {
            permissions.push(command.permission().cloned());
            sender_types.push(command.sender_type().cloned());
        }
        for child in self.literal_children.values() {
            if child.has_reachable_command() {
                permissions.push(child.aggregated_permission.clone());
                sender_types.push(child.aggregated_sender_type.clone());
            }
        }
        if let Some(argument) = &self.argument_child {
            if argument.has_reachable_command() {
                permissions.push(argument.aggregated_permission.clone());
                sender_types.push(argument.aggregated_sender_type.clone());
            }
        }

        self.aggregated_permission = combine_or(permissions);
        self.aggregated_sender_type = combine_or(sender_types);
    }
}

/// Disjunction of a set of predicate contributions. `None` means
/// "unrestricted" and absorbs the whole union; an empty contribution
/// list means there was nothing reachable to aggregate.
fn combine_or<S>(contributions: Vec<Option<Predicate<S>>>) -> Option<Predicate<S>> {
    if contributions.is_empty() {
        return None;
    }
    if contributions.iter().any(Option::is_none) {
        return None;
    }
    let predicates: Vec<Predicate<S>> = contributions.into_iter().map(|c| c.unwrap()).collect();
    Some(Arc::new(move |sender: &S| predicates.iter().any(|p| p(sender))) as Predicate<S>)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::CommandBuilder;
    use crate::errors::CommandExecutionError;

    fn noop_command(name: &str) -> Arc<Command<()>> {
        Arc::new(
            CommandBuilder::<()>::new(name).handle(|_ctx| async { Ok::<(), CommandExecutionError>(()) }),
        )
    }

    #[test]
    fn inserting_same_literal_twice_reuses_node() {
        let mut root = CommandNode::<()>::root();
        root.insert_literal(LiteralComponent::new("test")).unwrap();
        let child = root.insert_literal(LiteralComponent::new("test")).unwrap();
        assert!(child.literal().is_some());
        assert_eq!(root.literal_children.len(), 1);
    }

    #[test]
    fn colliding_alias_is_rejected() {
        let mut root = CommandNode::<()>::root();
        root.insert_literal(LiteralComponent::new("one").alias("shared"))
            .unwrap();
        let result = root.insert_literal(LiteralComponent::new("two").alias("shared"));
        assert!(matches!(
            result,
            Err(RegistrationError::DuplicateCommandChain(_))
        ));
    }

    #[test]
    fn second_distinct_argument_is_ambiguous() {
        use crate::parsers::StringParser;
        let mut root = CommandNode::<()>::root();
        root.insert_argument(ArgumentComponent::new("a", Arc::new(StringParser)))
            .unwrap();
        let result = root.insert_argument(ArgumentComponent::new("b", Arc::new(StringParser)));
        assert!(matches!(result, Err(RegistrationError::AmbiguousNode(_))));
    }

    #[test]
    fn duplicate_terminal_is_rejected() {
        let mut root = CommandNode::<()>::root();
        root.set_terminal(noop_command("first")).unwrap();
        let result = root.set_terminal(noop_command("second"));
        assert!(matches!(result, Err(RegistrationError::DuplicateCommand(_))));
    }
}
