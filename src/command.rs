// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A registered command and the builder used to assemble one.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::component::{ArgumentComponent, CommandComponent, CommandFlag, LiteralComponent};
use crate::context::CommandContext;
use crate::errors::CommandExecutionError;

pub use crate::component::Predicate;

/// A command's handler: given the context built up by a successful
/// parse, run to completion (or failure) asynchronously.
pub type CommandHandler<S> =
    Arc<dyn Fn(CommandContext<S>) -> BoxFuture<'static, Result<(), CommandExecutionError>> + Send + Sync>;

/// An immutable, registered command: a component chain, an optional
/// flag group, and a handler.
pub struct Command<S> {
    name: String,
    components: Vec<CommandComponent<S>>,
    flags: Vec<CommandFlag<S>>,
    handler: CommandHandler<S>,
    permission: Option<Predicate<S>>,
    sender_type: Option<Predicate<S>>,
    hidden: bool,
    help: Option<String>,
}

impl<S> Command<S> {
    /// A name for this command, used in error messages and for
    /// disambiguating duplicate-terminal registration errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The component chain, in registration order.
    pub fn components(&self) -> &[CommandComponent<S>] {
        &self.components
    }

    /// The flags declared on this command, if any.
    pub fn flags(&self) -> &[CommandFlag<S>] {
        &self.flags
    }

    /// The handler to invoke once this command is resolved.
    pub fn handler(&self) -> &CommandHandler<S> {
        &self.handler
    }

    /// This command's own permission predicate, checked exactly (not
    /// aggregated) once it is the resolved terminal.
    pub fn permission(&self) -> Option<&Predicate<S>> {
        self.permission.as_ref()
    }

    /// This command's own sender-type predicate.
    pub fn sender_type(&self) -> Option<&Predicate<S>> {
        self.sender_type.as_ref()
    }

    /// `true` if this command should be omitted from suggestions.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// A short help string, if one was given.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Build a proxy command: a new component chain, sharing `target`'s
    /// flags, handler, permission, sender-type constraint, visibility,
    /// and help text by reference. Used by
    /// [`CommandTree::register_proxy`](crate::tree::CommandTree::register_proxy)
    /// to graft a target's chain (minus its own leading literal) under
    /// the proxy's root literal.
    pub(crate) fn from_existing(
        name: String,
        components: Vec<CommandComponent<S>>,
        target: &Command<S>,
    ) -> Command<S> {
        Command {
            name,
            components,
            flags: target.flags.clone(),
            handler: Arc::clone(&target.handler),
            permission: target.permission.clone(),
            sender_type: target.sender_type.clone(),
            hidden: target.hidden,
            help: target.help.clone(),
        }
    }
}

/// Fluent assembly of a [`Command`].
///
/// `CommandBuilder::new` seeds the component chain with a literal
/// matching `name`, so `CommandBuilder::new("test").literal("one")`
/// builds the `test one` chain from the end-to-end scenarios.
pub struct CommandBuilder<S> {
    name: String,
    components: Vec<CommandComponent<S>>,
    flags: Vec<CommandFlag<S>>,
    permission: Option<Predicate<S>>,
    sender_type: Option<Predicate<S>>,
    hidden: bool,
    help: Option<String>,
}

impl<S> CommandBuilder<S> {
    /// Start building a command whose chain begins with the literal
    /// `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        CommandBuilder {
            components: vec![CommandComponent::Literal(LiteralComponent::new(name.clone()))],
            name,
            flags: Vec::new(),
            permission: None,
            sender_type: None,
            hidden: false,
            help: None,
        }
    }

    /// Append another literal to the chain.
    pub fn literal(mut self, literal: LiteralComponent) -> Self {
        self.components.push(CommandComponent::Literal(literal));
        self
    }

    /// Append a typed argument to the chain.
    pub fn argument(mut self, argument: ArgumentComponent<S>) -> Self {
        self.components.push(CommandComponent::Argument(argument));
        self
    }

    /// Declare a flag on this command's flag group.
    pub fn flag(mut self, flag: CommandFlag<S>) -> Self {
        self.flags.push(flag);
        self
    }

    /// Restrict this command to senders satisfying `predicate`.
    pub fn permission(mut self, predicate: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        self.permission = Some(Arc::new(predicate));
        self
    }

    /// Restrict this command to senders satisfying `predicate`,
    /// modeling a sender-type constraint the same way as a permission
    /// (see `DESIGN.md` for why both are unified into one predicate
    /// shape).
    pub fn sender_type(mut self, predicate: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        self.sender_type = Some(Arc::new(predicate));
        self
    }

    /// Hide this command from suggestions.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Attach a short help string.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Finish the command, supplying its handler.
    pub fn handle<F, Fut>(self, handler: F) -> Command<S>
    where
        F: Fn(CommandContext<S>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandExecutionError>> + Send + 'static,
    {
        Command {
            name: self.name,
            components: self.components,
            flags: self.flags,
            handler: Arc::new(move |context| Box::pin(handler(context)) as BoxFuture<'static, _>),
            permission: self.permission,
            sender_type: self.sender_type,
            hidden: self.hidden,
            help: self.help,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_seeds_chain_with_name_literal() {
        let command: Command<()> = CommandBuilder::new("test")
            .handle(|_ctx| async { Ok(()) });
        assert_eq!(command.components().len(), 1);
        match &command.components()[0] {
            CommandComponent::Literal(literal) => assert_eq!(literal.name(), "test"),
            _ => panic!("expected a literal component"),
        }
    }
}
