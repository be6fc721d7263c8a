// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Single-token and "rest of input" string arguments.

use futures::future::BoxFuture;

use crate::argument::{ArgumentContext, ArgumentParser, ParsedArgument};
use crate::errors::ArgumentParseError;
use crate::suggestion::Suggestion;
use crate::tokenizer::unquote;

/// Consumes a single whitespace-delimited token, honoring the same
/// quoting rules as the rest of the command line.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringParser;

impl<S: Send + Sync + 'static> ArgumentParser<S> for StringParser {
    fn parse(
        &self,
        _context: ArgumentContext<S>,
        remaining: String,
    ) -> BoxFuture<'static, Result<ParsedArgument, ArgumentParseError>> {
        Box::pin(async move {
            let raw = match first_token(&remaining) {
                Some(raw) => raw,
                None => return Err(ArgumentParseError::new("expected a value")),
            };
            let value = unquote(raw);
            Ok(ParsedArgument::new(value.clone(), raw.len(), value))
        })
    }

    fn suggest(
        &self,
        _context: ArgumentContext<S>,
        partial: String,
    ) -> BoxFuture<'static, Vec<Suggestion>> {
        Box::pin(async move {
            if partial.is_empty() {
                Vec::new()
            } else {
                vec![Suggestion::new(partial)]
            }
        })
    }

    fn type_tag(&self) -> &'static str {
        "string"
    }

    fn context_free(&self) -> bool {
        true
    }
}

/// Consumes the entire remainder of the input as a single value,
/// preserving internal whitespace. Yields to a following flag group:
/// if a later token begins with `-`, only the text up to that token is
/// consumed.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyStringParser;

impl<S: Send + Sync + 'static> ArgumentParser<S> for GreedyStringParser {
    fn parse(
        &self,
        _context: ArgumentContext<S>,
        remaining: String,
    ) -> BoxFuture<'static, Result<ParsedArgument, ArgumentParseError>> {
        Box::pin(async move {
            if remaining.trim().is_empty() {
                return Err(ArgumentParseError::new("expected a value"));
            }
            Ok(ParsedArgument::new(
                remaining.clone(),
                remaining.len(),
                remaining,
            ))
        })
    }

    fn type_tag(&self) -> &'static str {
        "greedy_string"
    }

    fn is_flag_yielding(&self) -> bool {
        true
    }

    fn context_free(&self) -> bool {
        true
    }
}

fn first_token(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut in_double = false;
    let mut in_single = false;
    let mut escaped = false;
    while end < bytes.len() {
        let c = bytes[end] as char;
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if in_double {
            if c == '"' {
                in_double = false;
            }
        } else if in_single {
            if c == '\'' {
                in_single = false;
            }
        } else if c == '"' {
            in_double = true;
        } else if c == '\'' {
            in_single = true;
        } else if c.is_whitespace() {
            break;
        }
        end += 1;
    }
    Some(&trimmed[..end])
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn ctx() -> ArgumentContext<()> {
        ArgumentContext::new(Arc::new(()), Arc::new(HashMap::new()))
    }

    #[test]
    fn string_parser_consumes_single_token() {
        let result = futures::executor::block_on(ArgumentParser::<()>::parse(
            &StringParser,
            ctx(),
            "hello world".to_string(),
        ))
        .unwrap();
        assert_eq!(result.display, "hello");
        assert_eq!(result.consumed, "hello".len());
    }

    #[test]
    fn string_parser_unquotes_quoted_token() {
        let result = futures::executor::block_on(ArgumentParser::<()>::parse(
            &StringParser,
            ctx(),
            r#""hello world" rest"#.to_string(),
        ))
        .unwrap();
        assert_eq!(result.display, "hello world");
    }

    #[test]
    fn greedy_string_consumes_remainder() {
        let result = futures::executor::block_on(ArgumentParser::<()>::parse(
            &GreedyStringParser,
            ctx(),
            "hello there world".to_string(),
        ))
        .unwrap();
        assert_eq!(result.display, "hello there world");
    }
}
