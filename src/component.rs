// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The building blocks of a command's component chain.

use std::sync::Arc;

use crate::argument::ArgumentParser;

/// A predicate evaluated against a sender, used both for a command's
/// own permission/sender-type constraints and, aggregated, for
/// pruning whole branches of the tree during suggestion.
pub type Predicate<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// A fixed token, matched exactly (including any of its aliases).
#[derive(Clone, Debug)]
pub struct LiteralComponent {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
}

impl LiteralComponent {
    /// Construct a literal with no aliases.
    pub fn new(name: impl Into<String>) -> Self {
        LiteralComponent {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// Add an alias, which will match exactly the same as the primary
    /// name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// The primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every name this literal matches: the primary name followed by
    /// its aliases.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(|s| s.as_str()))
    }

    /// `true` if `token` equals the primary name or any alias.
    pub fn matches_token(&self, token: &str) -> bool {
        self.all_names().any(|name| name == token)
    }

    /// Two literals are the merge-equivalent per the tree's merge
    /// rules: the same primary name and the same alias set.
    pub fn same_as(&self, other: &LiteralComponent) -> bool {
        self.name == other.name && self.aliases == other.aliases
    }
}

/// Where an optional argument's value comes from when the caller
/// omits it.
#[derive(Clone, Debug)]
pub enum DefaultValue {
    /// The value's display form is used directly, with no parser
    /// invocation.
    Constant(String),
    /// The default is re-parsed through the argument's own parser
    /// when it is selected, the same as if the caller had typed it.
    Parse(String),
}

/// A typed, named slot consumed by an [`ArgumentParser`].
pub struct ArgumentComponent<S> {
    pub(crate) name: String,
    pub(crate) parser: Arc<dyn ArgumentParser<S>>,
    pub(crate) required: bool,
    pub(crate) default: Option<DefaultValue>,
}

impl<S> Clone for ArgumentComponent<S> {
    fn clone(&self) -> Self {
        ArgumentComponent {
            name: self.name.clone(),
            parser: self.parser.clone(),
            required: self.required,
            default: self.default.clone(),
        }
    }
}

impl<S> ArgumentComponent<S> {
    /// Construct a required argument component.
    pub fn new(name: impl Into<String>, parser: Arc<dyn ArgumentParser<S>>) -> Self {
        ArgumentComponent {
            name: name.into(),
            parser,
            required: true,
            default: None,
        }
    }

    /// Make the argument optional, with a default used when the
    /// caller does not supply it.
    pub fn optional(mut self, default: DefaultValue) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    /// The binding name used in the [`CommandContext`](crate::context::CommandContext).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if the caller must supply this argument.
    pub fn required(&self) -> bool {
        self.required
    }
}

/// One slot in a command's chain: a fixed literal or a typed,
/// variable argument.
pub enum CommandComponent<S> {
    /// A literal token.
    Literal(LiteralComponent),
    /// A typed argument.
    Argument(ArgumentComponent<S>),
}

impl<S> Clone for CommandComponent<S> {
    fn clone(&self) -> Self {
        match self {
            CommandComponent::Literal(literal) => CommandComponent::Literal(literal.clone()),
            CommandComponent::Argument(argument) => CommandComponent::Argument(argument.clone()),
        }
    }
}

/// A `--name`/`-x` flag declared on a flag group.
pub struct CommandFlag<S> {
    pub(crate) name: String,
    pub(crate) short_aliases: Vec<char>,
    pub(crate) value_parser: Option<Arc<dyn ArgumentParser<S>>>,
    pub(crate) repeatable: bool,
    pub(crate) permission: Option<Predicate<S>>,
}

impl<S> Clone for CommandFlag<S> {
    fn clone(&self) -> Self {
        CommandFlag {
            name: self.name.clone(),
            short_aliases: self.short_aliases.clone(),
            value_parser: self.value_parser.clone(),
            repeatable: self.repeatable,
            permission: self.permission.clone(),
        }
    }
}

impl<S> CommandFlag<S> {
    /// A presence flag: recording only whether, or how many times, it
    /// was given.
    pub fn presence(name: impl Into<String>) -> Self {
        CommandFlag {
            name: name.into(),
            short_aliases: Vec::new(),
            value_parser: None,
            repeatable: false,
            permission: None,
        }
    }

    /// A value flag: `--name value`, parsed with `parser`.
    pub fn value(name: impl Into<String>, parser: Arc<dyn ArgumentParser<S>>) -> Self {
        CommandFlag {
            name: name.into(),
            short_aliases: Vec::new(),
            value_parser: Some(parser),
            repeatable: false,
            permission: None,
        }
    }

    /// Add a single-character short form, usable alone (`-f`) or
    /// clustered with other presence flags (`-xyz`).
    pub fn short(mut self, alias: char) -> Self {
        self.short_aliases.push(alias);
        self
    }

    /// Allow this flag to be given more than once: a presence flag
    /// accumulates a count, a value flag accumulates a list.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Restrict this flag to senders satisfying `predicate`. A sender
    /// that fails the check is treated the same as if the flag did not
    /// exist, both when parsing (`UnknownFlag`, unless liberal flag
    /// parsing yields instead) and when suggesting completions.
    pub fn permission(mut self, predicate: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        self.permission = Some(Arc::new(predicate));
        self
    }

    /// The flag's primary (long-form) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if this flag takes a value.
    pub fn takes_value(&self) -> bool {
        self.value_parser.is_some()
    }

    /// `true` if this flag may be given more than once.
    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// `true` if `alias` is one of this flag's short forms.
    pub fn has_short(&self, alias: char) -> bool {
        self.short_aliases.contains(&alias)
    }

    /// `true` if this flag's own permission (if any) does not already
    /// exclude `sender`.
    pub(crate) fn is_reachable_by(&self, sender: &S) -> bool {
        self.permission.as_ref().map_or(true, |predicate| predicate(sender))
    }
}
