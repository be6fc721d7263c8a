// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types surfaced by tree registration, parsing, and execution.

use thiserror::Error;

/// Failure while inserting a [`Command`](crate::command::Command) into a
/// [`CommandTree`](crate::tree::CommandTree).
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The component chain being registered ends at a node that is
    /// already terminal for another command.
    #[error("a command is already registered at '{0}'")]
    DuplicateCommand(String),
    /// Inserting this argument would create a second argument child
    /// among the siblings of an existing node.
    #[error("'{0}' would be ambiguous with an existing argument at this position")]
    AmbiguousNode(String),
    /// Two literal siblings share a name or alias without being the
    /// same literal.
    #[error("literal '{0}' collides with an existing literal or alias at this position")]
    DuplicateCommandChain(String),
}

/// Failure while parsing a `--flag`/`-f` token at a flag group.
#[derive(Debug, Error)]
pub enum FlagError {
    /// No flag with this name or short form is declared on the group.
    #[error("unknown flag '{0}'")]
    Unknown(String),
    /// A presence flag was given `=value` or a following token meant
    /// for a value flag.
    #[error("flag '{0}' does not take a value")]
    UnexpectedValue(String),
    /// A value flag was named with no following token to consume.
    #[error("flag '{0}' requires a value")]
    MissingValue(String),
    /// A non-repeatable flag appeared more than once.
    #[error("flag '{0}' was given more than once")]
    Duplicate(String),
}

/// Failure returned by an [`ArgumentParser`](crate::argument::ArgumentParser).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ArgumentParseError {
    /// Human-readable description of why the input was rejected.
    pub message: String,
}

impl ArgumentParseError {
    /// Construct an `ArgumentParseError` from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        ArgumentParseError {
            message: message.into(),
        }
    }
}

/// Failure returned by a command handler.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandExecutionError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl CommandExecutionError {
    /// Construct a `CommandExecutionError` from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        CommandExecutionError {
            message: message.into(),
        }
    }
}

/// Failure while parsing or executing a full command line.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No child of the current node accepted the next token.
    #[error("no command matched the input at '{token}'")]
    InvalidSyntax {
        /// The token (or empty string, at end of input) that could not
        /// be matched.
        token: String,
    },
    /// A node was reached whose aggregated permission excludes the
    /// sender.
    #[error("sender does not have permission to run this command")]
    NoPermission,
    /// A node was reached whose sender-type constraint excludes the
    /// sender.
    #[error("sender type is not valid for this command")]
    SenderType,
    /// An argument parser rejected its input.
    #[error("argument '{name}': {source}")]
    ArgumentParse {
        /// The name of the argument component that failed.
        name: String,
        /// The underlying parser failure.
        #[source]
        source: ArgumentParseError,
    },
    /// A flag token could not be parsed.
    #[error(transparent)]
    Flag(#[from] FlagError),
    /// A required parameter had no binding after a successful parse.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),
    /// The handler itself failed.
    #[error(transparent)]
    Execution(#[from] CommandExecutionError),
    /// The input could not be tokenized.
    #[error(transparent)]
    Tokenizer(#[from] crate::tokenizer::TokenizerError),
}
