// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The per-invocation context threaded through a parse.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// How a flag was recorded: a presence count, or the ordered list of
/// values given to a value flag.
#[derive(Clone, Debug)]
pub enum FlagValue {
    /// The number of times a presence flag was given.
    Presence(u32),
    /// The values given to a (possibly repeatable) value flag, in the
    /// order they appeared.
    Values(Vec<String>),
}

/// The bag of state built up while parsing one command line, and
/// handed to the resolved command's handler.
pub struct CommandContext<S> {
    sender: Arc<S>,
    bindings: HashMap<String, Box<dyn Any + Send + Sync>>,
    display: HashMap<String, String>,
    flags: HashMap<String, FlagValue>,
    scratch: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl<S> CommandContext<S> {
    /// Construct a fresh, empty context for `sender`.
    pub fn new(sender: Arc<S>) -> Self {
        CommandContext {
            sender,
            bindings: HashMap::new(),
            display: HashMap::new(),
            flags: HashMap::new(),
            scratch: HashMap::new(),
        }
    }

    /// The sender this invocation is running (or being completed) on
    /// behalf of.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// A clone of the shared sender handle, suitable for handing to an
    /// [`ArgumentContext`](crate::argument::ArgumentContext) snapshot.
    pub fn sender_handle(&self) -> Arc<S> {
        self.sender.clone()
    }

    /// Bind a parsed argument's value under `name`.
    pub fn bind(&mut self, name: impl Into<String>, value: Box<dyn Any + Send + Sync>, display: String) {
        let name = name.into();
        self.display.insert(name.clone(), display);
        self.bindings.insert(name, value);
    }

    /// Retrieve a previously bound argument, downcast to `T`.
    ///
    /// Returns `None` if no argument was bound under `name`, or if it
    /// was bound with a different concrete type.
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.bindings.get(name)?.downcast_ref::<T>()
    }

    /// The display (string) form of a previously bound argument.
    pub fn display(&self, name: &str) -> Option<&str> {
        self.display.get(name).map(|s| s.as_str())
    }

    /// A snapshot of every argument's display form bound so far, for
    /// handing to context-dependent parsers.
    pub fn bound_display_snapshot(&self) -> Arc<HashMap<String, String>> {
        Arc::new(self.display.clone())
    }

    pub(crate) fn record_presence_flag(&mut self, name: &str) {
        match self.flags.get_mut(name) {
            Some(FlagValue::Presence(count)) => *count += 1,
            _ => {
                self.flags.insert(name.to_string(), FlagValue::Presence(1));
            }
        }
    }

    /// Record a value flag's occurrence, and also bind its display
    /// form under `name` the same way a parsed argument would, so that
    /// `display(name)` reflects the flag's (most recent) value.
    pub(crate) fn record_value_flag(&mut self, name: &str, value: String) {
        self.display.insert(name.to_string(), value.clone());
        match self.flags.get_mut(name) {
            Some(FlagValue::Values(values)) => values.push(value),
            _ => {
                self.flags
                    .insert(name.to_string(), FlagValue::Values(vec![value]));
            }
        }
    }

    /// The number of times a presence flag was given (`0` if absent or
    /// if it is a value flag).
    pub fn flag_count(&self, name: &str) -> u32 {
        match self.flags.get(name) {
            Some(FlagValue::Presence(count)) => *count,
            _ => 0,
        }
    }

    /// The ordered values given to a value flag (empty if absent or if
    /// it is a presence flag).
    pub fn flag_values(&self, name: &str) -> &[String] {
        match self.flags.get(name) {
            Some(FlagValue::Values(values)) => values,
            _ => &[],
        }
    }

    /// `true` if a flag with this name was given at all.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Store a scratch value under `key`, for use by compound parsers
    /// that need to stash intermediate state across their own parse
    /// steps.
    pub fn set_scratch(&mut self, key: impl Into<String>, value: Box<dyn Any + Send + Sync>) {
        self.scratch.insert(key.into(), value);
    }

    /// Retrieve a scratch value, downcast to `T`.
    pub fn scratch<T: 'static>(&self, key: &str) -> Option<&T> {
        self.scratch.get(key)?.downcast_ref::<T>()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn records_repeated_value_flag() {
        let mut ctx = CommandContext::new(Arc::new(()));
        ctx.record_value_flag("flag", "one".to_string());
        ctx.record_value_flag("flag", "two".to_string());
        assert_eq!(ctx.flag_values("flag"), &["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn records_repeated_presence_flag() {
        let mut ctx = CommandContext::new(Arc::new(()));
        ctx.record_presence_flag("flag");
        ctx.record_presence_flag("flag");
        ctx.record_presence_flag("flag");
        assert_eq!(ctx.flag_count("flag"), 3);
    }

    #[test]
    fn binds_and_retrieves_typed_value() {
        let mut ctx = CommandContext::new(Arc::new(()));
        ctx.bind("num", Box::new(42i64), "42".to_string());
        assert_eq!(ctx.get::<i64>("num"), Some(&42));
        assert_eq!(ctx.display("num"), Some("42"));
    }
}
