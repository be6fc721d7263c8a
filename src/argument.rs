// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The argument parser protocol.
//!
//! Every typed argument in a command chain is backed by a value
//! implementing [`ArgumentParser`]. Parsers operate on owned,
//! cloneable data rather than borrowing the live cursor or context
//! directly: this keeps the futures they return `'static`, which is
//! what is needed to hand them off to a caller-supplied
//! [`Executor`](crate::executor::Executor) without entangling
//! lifetimes between the tree, the input string, and the in-flight
//! parse. The engine applies the parser's answer (how many bytes of
//! `remaining` were consumed, and what value resulted) back onto the
//! live cursor and context itself.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::errors::ArgumentParseError;
use crate::suggestion::Suggestion;

/// A snapshot of everything an argument parser may need to know about
/// the invocation it is parsing within: the sender, and the string
/// form of every argument bound so far (for parsers whose acceptable
/// range depends on an earlier argument).
#[derive(Clone)]
pub struct ArgumentContext<S> {
    sender: Arc<S>,
    bound: Arc<HashMap<String, String>>,
}

impl<S> ArgumentContext<S> {
    /// Construct a context snapshot.
    pub fn new(sender: Arc<S>, bound: Arc<HashMap<String, String>>) -> Self {
        ArgumentContext { sender, bound }
    }

    /// The sender executing (or completing) the command.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// The display form of a previously bound argument, if any.
    pub fn bound(&self, name: &str) -> Option<&str> {
        self.bound.get(name).map(|s| s.as_str())
    }
}

/// The outcome of a successful parse: the typed value (type-erased so
/// that parsers of differing output types can share a node's child
/// slot), how much of the input it consumed, and its display form for
/// downstream parsers and suggestion providers.
pub struct ParsedArgument {
    /// The parsed value, downcastable by the caller who knows which
    /// concrete `ArgumentParser` produced it.
    pub value: Box<dyn Any + Send + Sync>,
    /// The number of bytes of `remaining` (as passed to
    /// [`ArgumentParser::parse`]) that were consumed.
    pub consumed: usize,
    /// The value's display form, visible to later parsers via
    /// [`ArgumentContext::bound`] and used when echoing bindings.
    pub display: String,
}

impl fmt::Debug for ParsedArgument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParsedArgument")
            .field("consumed", &self.consumed)
            .field("display", &self.display)
            .finish()
    }
}

impl ParsedArgument {
    /// Construct a `ParsedArgument` from a concrete, `'static` value.
    pub fn new<T: Send + Sync + 'static>(value: T, consumed: usize, display: impl Into<String>) -> Self {
        ParsedArgument {
            value: Box::new(value),
            consumed,
            display: display.into(),
        }
    }
}

/// A leaf parser for one argument component.
///
/// Implementations must consume only a prefix of `remaining` that
/// they accept, reporting exactly how many bytes via
/// [`ParsedArgument::consumed`]; they must not mutate anything beyond
/// their own return value, since a failed speculative match must be
/// undoable by the engine with no side effects.
pub trait ArgumentParser<S>: Send + Sync {
    /// Parse as much of `remaining` as this argument accepts.
    fn parse(
        &self,
        context: ArgumentContext<S>,
        remaining: String,
    ) -> BoxFuture<'static, Result<ParsedArgument, ArgumentParseError>>;

    /// Offer completions for the partially-typed token `partial`.
    /// The default implementation offers nothing.
    fn suggest(
        &self,
        context: ArgumentContext<S>,
        partial: String,
    ) -> BoxFuture<'static, Vec<Suggestion>> {
        let _ = (context, partial);
        Box::pin(async { Vec::new() })
    }

    /// A short, stable name identifying the concrete parser type, used
    /// only to detect (and log) cases where two commands are merged at
    /// an argument node with the same name but different parsers; see
    /// the tree merge notes in `DESIGN.md`.
    fn type_tag(&self) -> &'static str;

    /// `true` for a greedy parser that should stop short of a flag
    /// token rather than swallow it, when the node it is bound to also
    /// carries a flag group. The default (`false`) is correct for any
    /// parser that only ever consumes a single token.
    fn is_flag_yielding(&self) -> bool {
        false
    }

    /// `true` if this parser's result depends only on its input token,
    /// never on the sender or on arguments bound earlier in the same
    /// parse. Host applications may use this to cache parse/suggest
    /// results across invocations; the core itself never reads this
    /// bit. Defaults to `false` (the conservative answer).
    fn context_free(&self) -> bool {
        false
    }
}
