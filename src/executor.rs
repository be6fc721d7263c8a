// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The execution coordinator: sequences preprocess/parse/postprocess/
//! handler across caller-supplied executors, with an optional
//! single-flight mutex serializing only handler invocation.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::lock::Mutex;

use crate::command::Command;
use crate::context::CommandContext;
use crate::errors::{CommandError, CommandExecutionError};
use crate::input::CommandInput;
use crate::settings::CommandManagerSettings;
use crate::suggestion::Suggestion;
use crate::tree::CommandTree;

/// A submission target for a unit of work.
///
/// `run` is generic per call rather than boxed behind a trait object:
/// this keeps the futures the coordinator builds (which borrow the
/// request's own [`CommandInput`], not `'static` data) usable without
/// forcing every executor hop through a channel. A host that needs to
/// hop threads implements this directly (e.g. by blocking on a
/// thread-pool handle); [`InlineExecutor`] is the identity case.
pub trait Executor: Send + Sync {
    /// Run `future`, returning its result once it resolves.
    fn run<'a, T: Send + 'a>(&self, future: BoxFuture<'a, T>) -> BoxFuture<'a, T>;
}

/// Runs work on the calling task with no executor hop. When driven
/// from a synchronous entry point, a caller wraps the whole pipeline
/// in `futures::executor::block_on`; `InlineExecutor` itself does
/// nothing but hand the future straight back.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn run<'a, T: Send + 'a>(&self, future: BoxFuture<'a, T>) -> BoxFuture<'a, T> {
        future
    }
}

/// Outcome of a coordinated execute request.
pub enum CommandOutcome<S> {
    /// The preprocess hook rejected the request before parsing began.
    RejectedByPreprocess(CommandContext<S>),
    /// Parsing failed.
    ParseFailed(CommandContext<S>, CommandError),
    /// The postprocess hook rejected the request after a successful
    /// parse.
    RejectedByPostprocess(CommandContext<S>, Arc<Command<S>>),
    /// The handler ran and returned an error.
    HandlerFailed(CommandExecutionError),
    /// The handler ran to completion.
    Success,
}

type PreprocessHook<S> = Arc<dyn Fn(&mut CommandContext<S>, &CommandInput<'_>) -> bool + Send + Sync>;
type PostprocessHook<S> = Arc<dyn Fn(&mut CommandContext<S>, &Command<S>) -> bool + Send + Sync>;

/// Sequences the parse → postprocess → handler pipeline (and the
/// parallel suggest pipeline) for one [`CommandTree`].
///
/// The three executor type parameters default to [`InlineExecutor`];
/// swapping one via `with_*_executor` changes the coordinator's type,
/// the same way a typestate builder does.
pub struct CommandCoordinator<S, PE = InlineExecutor, SE = InlineExecutor, EE = InlineExecutor> {
    tree: Arc<CommandTree<S>>,
    parsing_executor: PE,
    suggestions_executor: SE,
    default_execution_executor: EE,
    single_flight: Option<Arc<Mutex<()>>>,
    preprocess: Option<PreprocessHook<S>>,
    postprocess: Option<PostprocessHook<S>>,
}

impl<S> CommandCoordinator<S, InlineExecutor, InlineExecutor, InlineExecutor>
where
    S: Send + Sync + 'static,
{
    /// Build a coordinator over `tree`, with every executor defaulting
    /// to [`InlineExecutor`] and no single-flight mutex.
    pub fn new(tree: Arc<CommandTree<S>>) -> Self {
        CommandCoordinator {
            tree,
            parsing_executor: InlineExecutor,
            suggestions_executor: InlineExecutor,
            default_execution_executor: InlineExecutor,
            single_flight: None,
            preprocess: None,
            postprocess: None,
        }
    }
}

impl<S, PE, SE, EE> CommandCoordinator<S, PE, SE, EE>
where
    S: Send + Sync + 'static,
    PE: Executor,
    SE: Executor,
    EE: Executor,
{
    /// Run parsing on `executor` instead of the default inline one.
    pub fn with_parsing_executor<PE2: Executor>(self, executor: PE2) -> CommandCoordinator<S, PE2, SE, EE> {
        CommandCoordinator {
            tree: self.tree,
            parsing_executor: executor,
            suggestions_executor: self.suggestions_executor,
            default_execution_executor: self.default_execution_executor,
            single_flight: self.single_flight,
            preprocess: self.preprocess,
            postprocess: self.postprocess,
        }
    }

    /// Run suggestion on `executor` instead of the default inline one.
    pub fn with_suggestions_executor<SE2: Executor>(self, executor: SE2) -> CommandCoordinator<S, PE, SE2, EE> {
        CommandCoordinator {
            tree: self.tree,
            parsing_executor: self.parsing_executor,
            suggestions_executor: executor,
            default_execution_executor: self.default_execution_executor,
            single_flight: self.single_flight,
            preprocess: self.preprocess,
            postprocess: self.postprocess,
        }
    }

    /// Run handlers with no more specific executor on `executor`
    /// instead of the default inline one.
    pub fn with_default_execution_executor<EE2: Executor>(self, executor: EE2) -> CommandCoordinator<S, PE, SE, EE2> {
        CommandCoordinator {
            tree: self.tree,
            parsing_executor: self.parsing_executor,
            suggestions_executor: self.suggestions_executor,
            default_execution_executor: executor,
            single_flight: self.single_flight,
            preprocess: self.preprocess,
            postprocess: self.postprocess,
        }
    }

    /// Serialize handler invocation (never parsing or suggestion)
    /// across concurrent requests in arrival order.
    pub fn with_single_flight(mut self) -> Self {
        self.single_flight = Some(Arc::new(Mutex::new(())));
        self
    }

    /// Install a preprocess hook: given the context and the raw input,
    /// return `false` to reject the request before parsing begins.
    pub fn with_preprocess(
        mut self,
        hook: impl Fn(&mut CommandContext<S>, &CommandInput<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.preprocess = Some(Arc::new(hook));
        self
    }

    /// Install a postprocess hook: given the context and the resolved
    /// command, return `false` to reject the request after a
    /// successful parse but before the handler runs.
    pub fn with_postprocess(
        mut self,
        hook: impl Fn(&mut CommandContext<S>, &Command<S>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.postprocess = Some(Arc::new(hook));
        self
    }

    /// This coordinator's settings, read off the underlying tree.
    pub fn settings(&self) -> &CommandManagerSettings {
        self.tree.settings()
    }

    /// Run the full execute pipeline: preprocess, parse (on
    /// `parsing_executor`), postprocess, then an optionally
    /// single-flighted handler invocation (on
    /// `default_execution_executor`).
    pub async fn execute(&self, mut context: CommandContext<S>, mut input: CommandInput<'_>) -> CommandOutcome<S> {
        if let Some(preprocess) = &self.preprocess {
            if !preprocess(&mut context, &input) {
                return CommandOutcome::RejectedByPreprocess(context);
            }
        }

        let tree = Arc::clone(&self.tree);
        let (mut context, result) = self
            .parsing_executor
            .run(Box::pin(async move {
                let result = tree.parse(&mut context, &mut input).await;
                (context, result)
            }))
            .await;
        let command = match result {
            Ok(command) => command,
            Err(error) => return CommandOutcome::ParseFailed(context, error),
        };

        if let Some(postprocess) = &self.postprocess {
            if !postprocess(&mut context, &command) {
                return CommandOutcome::RejectedByPostprocess(context, command);
            }
        }

        let guard = match &self.single_flight {
            Some(mutex) => Some(mutex.lock().await),
            None => None,
        };

        let handler = Arc::clone(command.handler());
        let result = self
            .default_execution_executor
            .run(Box::pin(async move { handler(context).await }))
            .await;
        drop(guard);

        match result {
            Ok(()) => CommandOutcome::Success,
            Err(error) => CommandOutcome::HandlerFailed(error),
        }
    }

    /// Run the suggest pipeline: preprocess, then the Suggestion
    /// Engine on `suggestions_executor`. The `force_suggestion` policy
    /// is applied inside the engine itself (see `DESIGN.md`).
    pub async fn suggest(&self, mut context: CommandContext<S>, mut input: CommandInput<'_>) -> Vec<Suggestion> {
        if let Some(preprocess) = &self.preprocess {
            if !preprocess(&mut context, &input) {
                return Vec::new();
            }
        }

        let tree = Arc::clone(&self.tree);
        self.suggestions_executor
            .run(Box::pin(async move { tree.suggest(&mut context, &mut input).await }))
            .await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::CommandBuilder;
    use futures::executor::block_on;

    #[test]
    fn execute_runs_handler_on_success() {
        let mut tree = CommandTree::<()>::new();
        tree.register(
            CommandBuilder::<()>::new("ping").handle(|_ctx| async { Ok::<(), CommandExecutionError>(()) }),
        )
        .unwrap();
        let coordinator = CommandCoordinator::new(Arc::new(tree));

        let context = CommandContext::new(Arc::new(()));
        let input = CommandInput::tokenize("ping").unwrap();
        let outcome = block_on(coordinator.execute(context, input));
        assert!(matches!(outcome, CommandOutcome::Success));
    }

    #[test]
    fn execute_reports_parse_failure() {
        let mut tree = CommandTree::<()>::new();
        tree.register(
            CommandBuilder::<()>::new("ping").handle(|_ctx| async { Ok::<(), CommandExecutionError>(()) }),
        )
        .unwrap();
        let coordinator = CommandCoordinator::new(Arc::new(tree));

        let context = CommandContext::new(Arc::new(()));
        let input = CommandInput::tokenize("pong").unwrap();
        let outcome = block_on(coordinator.execute(context, input));
        assert!(matches!(outcome, CommandOutcome::ParseFailed(_, CommandError::InvalidSyntax { .. })));
    }

    #[test]
    fn preprocess_hook_can_reject_before_parsing() {
        let mut tree = CommandTree::<()>::new();
        tree.register(
            CommandBuilder::<()>::new("ping").handle(|_ctx| async { Ok::<(), CommandExecutionError>(()) }),
        )
        .unwrap();
        let coordinator = CommandCoordinator::new(Arc::new(tree)).with_preprocess(|_ctx, _input| false);

        let context = CommandContext::new(Arc::new(()));
        let input = CommandInput::tokenize("ping").unwrap();
        let outcome = block_on(coordinator.execute(context, input));
        assert!(matches!(outcome, CommandOutcome::RejectedByPreprocess(_)));
    }

    #[test]
    fn handler_failure_is_reported() {
        let mut tree = CommandTree::<()>::new();
        tree.register(CommandBuilder::<()>::new("boom").handle(|_ctx| async {
            Err(CommandExecutionError::new("kaboom"))
        }))
        .unwrap();
        let coordinator = CommandCoordinator::new(Arc::new(tree));

        let context = CommandContext::new(Arc::new(()));
        let input = CommandInput::tokenize("boom").unwrap();
        let outcome = block_on(coordinator.execute(context, input));
        assert!(matches!(outcome, CommandOutcome::HandlerFailed(_)));
    }
}
