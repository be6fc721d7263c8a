// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Commands
//!
//! This crate provides an embeddable command framework for use in Rust.
//!
//! It compiles declarative command specifications into a routing tree
//! ([`CommandTree`]), parses textual input into typed argument
//! bindings (the Parser Engine, behind [`CommandTree::parse`]),
//! produces context-sensitive completion suggestions
//! ([`CommandTree::suggest`]), and coordinates the asynchronous
//! parse/postprocess/execute pipeline ([`CommandCoordinator`]). It is
//! host-agnostic: callers supply the "sender" type, the permission
//! model, and the I/O loop around it. This is inspired by elements of
//! the Lisp Machine, the Common Lisp Interface Manager (CLIM), router
//! command line interfaces, and the TOPS-20 command line among other
//! things.
//!
//! * Commands are assembled with [`CommandBuilder`] and merged into a
//!   shared prefix trie by [`CommandTree::register`].
//! * A small catalog of standard argument parsers ([`parsers`]) and a
//!   minimal builder surface are shipped so the tree is independently
//!   testable; a host application is expected to bring its own richer
//!   catalog on top of [`ArgumentParser`](argument::ArgumentParser).
//!
//! This library is in the early stages of development and
//! not everything works yet.

#![warn(missing_docs)]
#![deny(trivial_numeric_casts,
        unsafe_code, unstable_features,
        unused_import_braces, unused_qualifications)]

pub mod argument;
pub mod command;
pub mod component;
pub mod context;
mod engine;
pub mod errors;
pub mod executor;
pub mod input;
pub mod node;
pub mod parsers;
pub mod settings;
mod suggest;
pub mod suggestion;
pub mod tokenizer;
pub mod tree;
pub mod util;

pub use command::{Command, CommandBuilder};
pub use context::CommandContext;
pub use executor::{CommandCoordinator, CommandOutcome, Executor, InlineExecutor};
pub use input::CommandInput;
pub use node::CommandNode;
pub use settings::CommandManagerSettings;
pub use suggestion::Suggestion;
pub use tree::CommandTree;
