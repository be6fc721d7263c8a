// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The suggestion engine: replays the same tree walk as
//! [`crate::engine`], diverging at the token under the cursor to
//! gather completions instead of committing to a match.

use futures::future::{BoxFuture, FutureExt};

use crate::argument::ArgumentContext;
use crate::context::CommandContext;
use crate::engine::parse_flags;
use crate::input::CommandInput;
use crate::node::CommandNode;
use crate::settings::CommandManagerSettings;
use crate::suggestion::{Suggestion, SuggestionProcessor};

/// Walk `root` against `input`, returning every suggestion offered by
/// the node the cursor sits within, filtered by `processor`.
pub(crate) fn suggest<'a, 'text, S>(
    root: &'a CommandNode<S>,
    context: &'a mut CommandContext<S>,
    input: &'a mut CommandInput<'text>,
    settings: &'a CommandManagerSettings,
    processor: &'a dyn SuggestionProcessor,
) -> BoxFuture<'a, Vec<Suggestion>>
where
    S: Send + Sync + 'static,
    'text: 'a,
{
    async move {
        let (candidates, partial) = walk(root, context, input, settings).await;
        let mut result = processor.process(&partial, candidates);
        if result.is_empty() && settings.force_suggestion {
            result.push(Suggestion::new(String::new()));
        }
        result
    }
    .boxed()
}

/// Walk one level, returning the candidates collected at the node the
/// cursor ultimately sits within, along with the partial word (empty
/// if the cursor sits between tokens) they were collected for.
fn walk<'a, 'text, S>(
    node: &'a CommandNode<S>,
    context: &'a mut CommandContext<S>,
    input: &'a mut CommandInput<'text>,
    settings: &'a CommandManagerSettings,
) -> BoxFuture<'a, (Vec<Suggestion>, String)>
where
    S: Send + Sync + 'static,
    'text: 'a,
{
    async move {
        input.skip_whitespace();
        if input.is_empty() {
            return (collect(node, context, "").await, String::new());
        }

        if input.is_last_word() && !input.full_text_ends_with_whitespace() {
            let word = input.peek_word().unwrap().to_string();
            let candidates = collect(node, context, &word).await;
            return (candidates, word);
        }

        let token = input.peek_word().unwrap().to_string();

        if let Some(child) = node.find_literal_child(&token) {
            if !reachable(child, context) {
                return (Vec::new(), String::new());
            }
            input.read_word();
            return walk(child, context, input, settings).await;
        }

        if let Some(arg_child) = node.argument_child() {
            if reachable(arg_child, context) {
                let argument = arg_child.argument().expect("argument child has an argument");
                let checkpoint = input.checkpoint();
                let actx = ArgumentContext::new(context.sender_handle(), context.bound_display_snapshot());
                let remaining = input.remaining_raw().to_string();
                if let Ok(parsed) = argument.parser.parse(actx, remaining).await {
                    input.advance_to_relative_byte(parsed.consumed);
                    context.bind(argument.name.clone(), parsed.value, parsed.display);
                    return walk(arg_child, context, input, settings).await;
                }
                input.restore(checkpoint);
            }
        }

        if token.starts_with('-') && token != "-" && !node.flags().is_empty() {
            let before = input.checkpoint();
            if parse_flags(node, context, input, settings).await.is_ok() && input.checkpoint() != before {
                return walk(node, context, input, settings).await;
            }
        }

        (Vec::new(), String::new())
    }
    .boxed()
}

async fn collect<S: Send + Sync + 'static>(
    node: &CommandNode<S>,
    context: &CommandContext<S>,
    partial: &str,
) -> Vec<Suggestion> {
    let mut out = Vec::new();

    for child in node.literal_children() {
        if !reachable(child, context) {
            continue;
        }
        let literal = child.literal().expect("literal child has a literal");
        for name in literal.all_names() {
            out.push(Suggestion::new(name.to_string()));
        }
    }

    if let Some(arg_child) = node.argument_child() {
        if reachable(arg_child, context) {
            let argument = arg_child.argument().expect("argument child has an argument");
            let actx = ArgumentContext::new(context.sender_handle(), context.bound_display_snapshot());
            out.extend(argument.parser.suggest(actx, partial.to_string()).await);
        }
    }

    if !node.flags().is_empty() {
        out.extend(flag_suggestions(node, context, partial));
    }

    out
}

/// Completions offered by the flag group hosted on `node`: remaining
/// long-form names when `partial` looks like `--...`, remaining short
/// forms (bare, for clustering) when it looks like `-...`. "Remaining"
/// excludes flags the sender cannot reach and, per §4.5, excludes
/// non-repeatable flags already given in this invocation (a
/// repeatable flag always stays offered).
fn flag_suggestions<S>(node: &CommandNode<S>, context: &CommandContext<S>, partial: &str) -> Vec<Suggestion> {
    let remaining = |flag: &&crate::component::CommandFlag<S>| {
        flag.is_reachable_by(context.sender()) && (flag.is_repeatable() || !context.has_flag(flag.name()))
    };

    if let Some(rest) = partial.strip_prefix("--") {
        return node
            .flags()
            .iter()
            .filter(remaining)
            .map(|flag| format!("--{}", flag.name()))
            .filter(|candidate| candidate[2..].starts_with(rest))
            .map(Suggestion::new)
            .collect();
    }
    if partial.starts_with('-') {
        return node
            .flags()
            .iter()
            .filter(remaining)
            .filter(|flag| !flag.takes_value())
            .flat_map(|flag| flag.short_aliases.iter().map(move |alias| format!("-{}", alias)))
            .map(Suggestion::new)
            .collect();
    }
    node.flags()
        .iter()
        .filter(remaining)
        .map(|flag| format!("--{}", flag.name()))
        .map(Suggestion::new)
        .collect()
}

fn reachable<S>(node: &CommandNode<S>, context: &CommandContext<S>) -> bool {
    node.is_reachable_by(context.sender())
}
