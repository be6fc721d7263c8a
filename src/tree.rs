// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The command tree: owns the merged trie of registered commands and
//! dispatches parsing and suggestion against it.

use std::sync::Arc;

use crate::command::Command;
use crate::component::CommandComponent;
use crate::context::CommandContext;
use crate::engine;
use crate::errors::{CommandError, RegistrationError};
use crate::input::CommandInput;
use crate::node::CommandNode;
use crate::settings::CommandManagerSettings;
use crate::suggest;
use crate::suggestion::{PrefixSuggestionProcessor, Suggestion, SuggestionProcessor};

/// The merged command tree for one sender type `S`.
///
/// Registration is exclusive (it takes `&mut self`); parsing and
/// suggestion only ever read the tree, which is why
/// [`CommandCoordinator`](crate::executor::CommandCoordinator) holds it
/// behind an `Arc` and can run many parses concurrently against the
/// same tree.
pub struct CommandTree<S> {
    root: CommandNode<S>,
    settings: CommandManagerSettings,
    processor: Arc<dyn SuggestionProcessor>,
}

impl<S> Default for CommandTree<S> {
    fn default() -> Self {
        CommandTree::new()
    }
}

impl<S> CommandTree<S> {
    /// A tree with default settings and the default (prefix) suggestion
    /// processor.
    pub fn new() -> Self {
        CommandTree {
            root: CommandNode::root(),
            settings: CommandManagerSettings::default(),
            processor: Arc::new(PrefixSuggestionProcessor),
        }
    }

    /// A tree with explicit settings.
    pub fn with_settings(settings: CommandManagerSettings) -> Self {
        CommandTree {
            root: CommandNode::root(),
            settings,
            processor: Arc::new(PrefixSuggestionProcessor),
        }
    }

    /// Install a custom suggestion processor, replacing the default
    /// prefix filter.
    pub fn with_suggestion_processor(mut self, processor: Arc<dyn SuggestionProcessor>) -> Self {
        self.processor = processor;
        self
    }

    /// The settings this tree was built with.
    pub fn settings(&self) -> &CommandManagerSettings {
        &self.settings
    }

    /// The tree's root node, for read-only inspection (e.g. building a
    /// help listing).
    pub fn root(&self) -> &CommandNode<S> {
        &self.root
    }

    /// Visit every node in the tree, depth-first, literals before the
    /// argument child, matching the priority order parsing itself
    /// follows.
    pub fn walk(&self, visitor: &mut dyn FnMut(&CommandNode<S>)) {
        fn go<S>(node: &CommandNode<S>, visitor: &mut dyn FnMut(&CommandNode<S>)) {
            visitor(node);
            for child in node.literal_children() {
                go(child, visitor);
            }
            if let Some(child) = node.argument_child() {
                go(child, visitor);
            }
        }
        go(&self.root, visitor);
    }

    /// Insert `command`'s component chain into the tree, merging with
    /// any existing chain that shares a prefix.
    pub fn register(&mut self, command: Command<S>) -> Result<(), RegistrationError> {
        let command = Arc::new(command);
        let mut node = &mut self.root;
        for component in command.components() {
            node = match component.clone() {
                CommandComponent::Literal(literal) => node.insert_literal(literal)?,
                CommandComponent::Argument(argument) => node.insert_argument(argument)?,
            };
        }
        node.attach_flags(command.flags().to_vec())?;
        node.set_terminal(Arc::clone(&command))?;
        self.root.recompute_aggregates();
        Ok(())
    }

    /// Register a proxy command under `proxy_name`: a new, independent
    /// entry point that reuses `target`'s component chain (minus
    /// `target`'s own leading literal), flags, and handler.
    ///
    /// Useful for aliasing an entire subcommand tree under a second
    /// name without re-declaring every argument and flag.
    pub fn register_proxy(
        &mut self,
        proxy_name: impl Into<String>,
        target: &Command<S>,
    ) -> Result<(), RegistrationError> {
        use crate::component::LiteralComponent;

        let proxy_name = proxy_name.into();
        let mut components = vec![CommandComponent::Literal(LiteralComponent::new(proxy_name.clone()))];
        components.extend(target.components().iter().skip(1).cloned());
        let proxy = Command::from_existing(proxy_name, components, target);
        self.register(proxy)
    }

    /// Parse `input` against the tree, binding arguments and flags into
    /// `context`.
    pub async fn parse(
        &self,
        context: &mut CommandContext<S>,
        input: &mut CommandInput<'_>,
    ) -> Result<Arc<Command<S>>, CommandError>
    where
        S: Send + Sync + 'static,
    {
        engine::parse(&self.root, context, input, &self.settings).await
    }

    /// Collect suggestions for `input`, given the sender state already
    /// loaded into `context`.
    pub async fn suggest(&self, context: &mut CommandContext<S>, input: &mut CommandInput<'_>) -> Vec<Suggestion>
    where
        S: Send + Sync + 'static,
    {
        suggest::suggest(&self.root, context, input, &self.settings, self.processor.as_ref()).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::argument::{ArgumentContext, ArgumentParser, ParsedArgument};
    use crate::command::CommandBuilder;
    use crate::component::ArgumentComponent;
    use crate::errors::CommandExecutionError;
    use crate::parsers::StringParser;
    use futures::executor::block_on;

    fn noop(name: &str) -> Command<()> {
        CommandBuilder::<()>::new(name).handle(|_ctx| async { Ok::<(), CommandExecutionError>(()) })
    }

    #[test]
    fn registers_and_parses_a_bare_literal_command() {
        let mut tree = CommandTree::<()>::new();
        tree.register(noop("test")).unwrap();

        let mut context = CommandContext::new(Arc::new(()));
        let mut input = CommandInput::tokenize("test").unwrap();
        let command = block_on(tree.parse(&mut context, &mut input)).unwrap();
        assert_eq!(command.name(), "test");
    }

    #[test]
    fn unmatched_input_is_invalid_syntax() {
        let mut tree = CommandTree::<()>::new();
        tree.register(noop("test")).unwrap();

        let mut context = CommandContext::new(Arc::new(()));
        let mut input = CommandInput::tokenize("nope").unwrap();
        let result = block_on(tree.parse(&mut context, &mut input));
        assert!(matches!(result, Err(CommandError::InvalidSyntax { .. })));
    }

    #[test]
    fn register_proxy_reuses_target_chain() {
        let mut tree = CommandTree::<()>::new();
        let target = CommandBuilder::<()>::new("give")
            .argument(ArgumentComponent::new("item", Arc::new(StringParser)))
            .handle(|_ctx| async { Ok::<(), CommandExecutionError>(()) });
        tree.register_proxy("g", &target).unwrap();
        tree.register(target).unwrap();

        let mut context = CommandContext::new(Arc::new(()));
        let mut input = CommandInput::tokenize("g diamond").unwrap();
        let command = block_on(tree.parse(&mut context, &mut input)).unwrap();
        assert_eq!(command.name(), "give");
        assert_eq!(context.display("item"), Some("diamond"));
    }

    #[derive(Clone, Copy)]
    struct NumberParser;

    impl ArgumentParser<()> for NumberParser {
        fn parse(
            &self,
            _context: ArgumentContext<()>,
            remaining: String,
        ) -> futures::future::BoxFuture<'static, Result<ParsedArgument, crate::errors::ArgumentParseError>> {
            Box::pin(async move {
                let token = remaining
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| crate::errors::ArgumentParseError::new("expected a value"))?;
                Ok(ParsedArgument::new(token.to_string(), token.len(), token.to_string()))
            })
        }

        fn suggest(
            &self,
            _context: ArgumentContext<()>,
            partial: String,
        ) -> futures::future::BoxFuture<'static, Vec<Suggestion>> {
            Box::pin(async move {
                (0..10)
                    .map(|n| n.to_string())
                    .filter(|s| s.starts_with(&partial))
                    .map(Suggestion::new)
                    .collect()
            })
        }

        fn type_tag(&self) -> &'static str {
            "number"
        }
    }

    #[test]
    fn suggests_child_literals_and_argument_values() {
        let mut tree = CommandTree::<()>::new();
        tree.register(
            CommandBuilder::<()>::new("numbers")
                .argument(ArgumentComponent::new("n", Arc::new(NumberParser)))
                .handle(|_ctx| async { Ok::<(), CommandExecutionError>(()) }),
        )
        .unwrap();

        let mut context = CommandContext::new(Arc::new(()));
        let mut input = CommandInput::tokenize("numbers ").unwrap();
        let suggestions = block_on(tree.suggest(&mut context, &mut input));
        let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }
}
