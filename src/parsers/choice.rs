// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A parser over a fixed, case-sensitive set of string literals.

use futures::future::BoxFuture;

use crate::argument::{ArgumentContext, ArgumentParser, ParsedArgument};
use crate::errors::ArgumentParseError;
use crate::suggestion::Suggestion;

/// Parses one of a fixed set of string literals into an associated
/// value, such as an enum variant.
#[derive(Clone)]
pub struct ChoiceParser<T> {
    choices: Vec<(String, T)>,
}

impl<T: Clone + Send + Sync + 'static> ChoiceParser<T> {
    /// Build a parser from `(literal, value)` pairs.
    pub fn new<N: Into<String>>(choices: impl IntoIterator<Item = (N, T)>) -> Self {
        ChoiceParser {
            choices: choices.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    fn first_token(text: &str) -> &str {
        let trimmed = text.trim_start();
        match trimmed.find(char::is_whitespace) {
            Some(index) => &trimmed[..index],
            None => trimmed,
        }
    }
}

impl<S, T> ArgumentParser<S> for ChoiceParser<T>
where
    S: Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn parse(
        &self,
        _context: ArgumentContext<S>,
        remaining: String,
    ) -> BoxFuture<'static, Result<ParsedArgument, ArgumentParseError>> {
        let choices = self.choices.clone();
        Box::pin(async move {
            let token = ChoiceParser::<T>::first_token(&remaining);
            if token.is_empty() {
                return Err(ArgumentParseError::new("expected one of a fixed set of values"));
            }
            match choices.iter().find(|(name, _)| name == token) {
                Some((name, value)) => {
                    Ok(ParsedArgument::new(value.clone(), name.len(), name.clone()))
                }
                None => Err(ArgumentParseError::new(format!(
                    "'{}' is not one of the accepted values",
                    token
                ))),
            }
        })
    }

    fn suggest(
        &self,
        _context: ArgumentContext<S>,
        partial: String,
    ) -> BoxFuture<'static, Vec<Suggestion>> {
        let choices = self.choices.clone();
        Box::pin(async move {
            choices
                .into_iter()
                .map(|(name, _)| name)
                .filter(|name| name.starts_with(&partial))
                .map(Suggestion::new)
                .collect()
        })
    }

    fn type_tag(&self) -> &'static str {
        "choice"
    }

    fn context_free(&self) -> bool {
        true
    }
}
