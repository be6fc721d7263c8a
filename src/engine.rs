// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The parser engine: walks the command tree against a [`CommandInput`]
//! cursor, producing either a resolved [`Command`] (with its
//! [`CommandContext`] populated) or a typed [`CommandError`].
//!
//! Recursion into child nodes crosses an `await` point (argument
//! parsers and value-flag parsers are asynchronous), so every
//! recursive step is boxed with [`futures::future::BoxFuture`] rather
//! than written as a plain `async fn` calling itself.

use std::any::Any;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::argument::ArgumentContext;
use crate::command::Command;
use crate::component::{ArgumentComponent, DefaultValue};
use crate::context::CommandContext;
use crate::errors::{CommandError, FlagError};
use crate::input::CommandInput;
use crate::node::CommandNode;
use crate::settings::CommandManagerSettings;

/// Parse `input` against `root`, binding argument and flag values into
/// `context` as it goes.
pub(crate) fn parse<'a, 'text, S>(
    root: &'a CommandNode<S>,
    context: &'a mut CommandContext<S>,
    input: &'a mut CommandInput<'text>,
    settings: &'a CommandManagerSettings,
) -> BoxFuture<'a, Result<Arc<Command<S>>, CommandError>>
where
    S: Send + Sync + 'static,
    'text: 'a,
{
    walk(root, context, input, settings)
}

fn walk<'a, 'text, S>(
    node: &'a CommandNode<S>,
    context: &'a mut CommandContext<S>,
    input: &'a mut CommandInput<'text>,
    settings: &'a CommandManagerSettings,
) -> BoxFuture<'a, Result<Arc<Command<S>>, CommandError>>
where
    S: Send + Sync + 'static,
    'text: 'a,
{
    async move {
        loop {
            input.skip_whitespace();
            if input.is_empty() {
                return finish(node, context).await;
            }
            let token = input.peek_word().unwrap().to_string();

            if let Some(child) = node.find_literal_child(&token) {
                check_reachable(child, context)?;
                input.read_word();
                return walk(child, context, input, settings).await;
            }

            if let Some(arg_child) = node.argument_child() {
                if check_reachable(arg_child, context).is_ok() {
                    let argument = arg_child.argument().expect("argument child has an argument");
                    let checkpoint = input.checkpoint();
                    let remaining = remaining_for(argument, arg_child, input);
                    let actx = ArgumentContext::new(context.sender_handle(), context.bound_display_snapshot());
                    match argument.parser.parse(actx, remaining).await {
                        Ok(parsed) => {
                            input.advance_to_relative_byte(parsed.consumed);
                            context.bind(argument.name.clone(), parsed.value, parsed.display);
                            return walk(arg_child, context, input, settings).await;
                        }
                        Err(_) => {
                            input.restore(checkpoint);
                        }
                    }
                }
            }

            if token.starts_with('-') && token != "-" && !node.flags().is_empty() {
                let before = input.checkpoint();
                parse_flags(node, context, input, settings).await?;
                if input.checkpoint() != before {
                    continue;
                }
            }

            return Err(CommandError::InvalidSyntax { token });
        }
    }
    .boxed()
}

fn finish<'a, S>(
    node: &'a CommandNode<S>,
    context: &'a mut CommandContext<S>,
) -> BoxFuture<'a, Result<Arc<Command<S>>, CommandError>>
where
    S: Send + Sync + 'static,
{
    async move {
        if let Some(command) = node.command() {
            if let Some(sender_type) = command.sender_type() {
                if !sender_type(context.sender()) {
                    return Err(CommandError::SenderType);
                }
            }
            if let Some(permission) = command.permission() {
                if !permission(context.sender()) {
                    return Err(CommandError::NoPermission);
                }
            }
            return Ok(Arc::clone(command));
        }

        if let Some(arg_child) = node.argument_child() {
            let argument = arg_child.argument().expect("argument child has an argument");
            if !argument.required {
                if let Some(default) = argument.default.clone() {
                    bind_default(argument, &default, context).await?;
                    return finish(arg_child, context).await;
                }
            }
        }

        Err(CommandError::InvalidSyntax { token: String::new() })
    }
    .boxed()
}

async fn bind_default<S: Send + Sync + 'static>(
    argument: &ArgumentComponent<S>,
    default: &DefaultValue,
    context: &mut CommandContext<S>,
) -> Result<(), CommandError> {
    match default {
        DefaultValue::Constant(value) => {
            context.bind(
                argument.name.clone(),
                Box::new(value.clone()) as Box<dyn Any + Send + Sync>,
                value.clone(),
            );
            Ok(())
        }
        DefaultValue::Parse(raw) => {
            let actx = ArgumentContext::new(context.sender_handle(), context.bound_display_snapshot());
            let parsed = argument
                .parser
                .parse(actx, raw.clone())
                .await
                .map_err(|source| CommandError::ArgumentParse {
                    name: argument.name.clone(),
                    source,
                })?;
            context.bind(argument.name.clone(), parsed.value, parsed.display);
            Ok(())
        }
    }
}

fn check_reachable<S>(node: &CommandNode<S>, context: &CommandContext<S>) -> Result<(), CommandError> {
    if let Some(permission) = node.aggregated_permission() {
        if !permission(context.sender()) {
            return Err(CommandError::NoPermission);
        }
    }
    if let Some(sender_type) = node.aggregated_sender_type() {
        if !sender_type(context.sender()) {
            return Err(CommandError::SenderType);
        }
    }
    Ok(())
}

/// The text handed to an argument's parser: the full remaining input,
/// unless the parser is flag-yielding and the node it would bind to
/// also carries a flag group, in which case it is truncated at the
/// next token that looks like a flag.
fn remaining_for<S>(argument: &ArgumentComponent<S>, arg_child: &CommandNode<S>, input: &CommandInput<'_>) -> String {
    if argument.parser.is_flag_yielding() && !arg_child.flags().is_empty() {
        if let Some(boundary) = input.next_flag_boundary() {
            return input.remaining_raw()[..boundary].to_string();
        }
    }
    input.remaining_raw().to_string()
}

/// Consume as many consecutive flag tokens as possible at `node`,
/// recording their values/occurrences into `context`. Stops (without
/// error) at the first non-flag token, or, under
/// [`CommandManagerSettings::liberal_flag_parsing`], at the first
/// unrecognized or misplaced flag.
pub(crate) async fn parse_flags<S: Send + Sync + 'static>(
    node: &CommandNode<S>,
    context: &mut CommandContext<S>,
    input: &mut CommandInput<'_>,
    settings: &CommandManagerSettings,
) -> Result<(), FlagError> {
    loop {
        input.skip_whitespace();
        let token = match input.peek_word() {
            Some(token) => token,
            None => return Ok(()),
        };
        if !token.starts_with('-') || token == "-" {
            return Ok(());
        }

        if let Some(rest) = token.strip_prefix("--") {
            if rest.is_empty() {
                // A bare "--" is not a parser-level separator here; it
                // has nothing left to offer the flag group.
                return Ok(());
            }
            let flag = node
                .flags()
                .iter()
                .find(|f| f.name() == rest && f.is_reachable_by(context.sender()))
                .cloned();
            match flag {
                Some(flag) => {
                    if !flag.is_repeatable() && context.has_flag(flag.name()) {
                        if settings.liberal_flag_parsing {
                            return Ok(());
                        }
                        return Err(FlagError::Duplicate(flag.name().to_string()));
                    }
                    input.read_word();
                    if let Some(value_parser) = flag.value_parser.clone() {
                        input.skip_whitespace();
                        let checkpoint = input.checkpoint();
                        let remaining = input.remaining_raw().to_string();
                        let actx = ArgumentContext::new(context.sender_handle(), context.bound_display_snapshot());
                        match value_parser.parse(actx, remaining).await {
                            Ok(parsed) => {
                                input.advance_to_relative_byte(parsed.consumed);
                                context.record_value_flag(flag.name(), parsed.display);
                            }
                            Err(_) => {
                                input.restore(checkpoint);
                                return Err(FlagError::MissingValue(flag.name().to_string()));
                            }
                        }
                    } else {
                        context.record_presence_flag(flag.name());
                    }
                }
                None => {
                    if settings.liberal_flag_parsing {
                        return Ok(());
                    }
                    return Err(FlagError::Unknown(rest.to_string()));
                }
            }
        } else {
            let chars: Vec<char> = token[1..].chars().collect();
            for &ch in &chars {
                match node
                    .flags()
                    .iter()
                    .find(|f| f.has_short(ch) && f.is_reachable_by(context.sender()))
                {
                    Some(flag) if flag.takes_value() => {
                        return Err(FlagError::UnexpectedValue(flag.name().to_string()));
                    }
                    Some(_) => {}
                    None => {
                        if settings.liberal_flag_parsing {
                            return Ok(());
                        }
                        return Err(FlagError::Unknown(ch.to_string()));
                    }
                }
            }
            for ch in chars {
                let flag = node
                    .flags()
                    .iter()
                    .find(|f| f.has_short(ch) && f.is_reachable_by(context.sender()))
                    .unwrap()
                    .clone();
                if !flag.is_repeatable() && context.has_flag(flag.name()) {
                    if settings.liberal_flag_parsing {
                        continue;
                    }
                    return Err(FlagError::Duplicate(flag.name().to_string()));
                }
                context.record_presence_flag(flag.name());
            }
            input.read_word();
        }
    }
}
