// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An `i64` argument, optionally bounded to an inclusive range.

use futures::future::BoxFuture;

use crate::argument::{ArgumentContext, ArgumentParser, ParsedArgument};
use crate::errors::ArgumentParseError;
use crate::suggestion::Suggestion;

/// Parses a signed integer token, optionally restricted to an
/// inclusive `min..=max` range.
#[derive(Clone, Debug)]
pub struct IntegerParser {
    min: i64,
    max: i64,
}

impl IntegerParser {
    /// An unbounded integer parser.
    pub fn new() -> Self {
        IntegerParser {
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    /// An integer parser bounded to `min..=max`.
    pub fn bounded(min: i64, max: i64) -> Self {
        IntegerParser { min, max }
    }

    fn leading_integer(text: &str) -> Option<(&str, i64)> {
        let mut end = 0;
        let bytes = text.as_bytes();
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == digits_start {
            return None;
        }
        let slice = &text[..end];
        slice.parse::<i64>().ok().map(|value| (slice, value))
    }
}

impl Default for IntegerParser {
    fn default() -> Self {
        IntegerParser::new()
    }
}

impl<S: Send + Sync + 'static> ArgumentParser<S> for IntegerParser {
    fn parse(
        &self,
        _context: ArgumentContext<S>,
        remaining: String,
    ) -> BoxFuture<'static, Result<ParsedArgument, ArgumentParseError>> {
        let min = self.min;
        let max = self.max;
        Box::pin(async move {
            match IntegerParser::leading_integer(&remaining) {
                Some((consumed, value)) if value >= min && value <= max => {
                    Ok(ParsedArgument::new(value, consumed.len(), value.to_string()))
                }
                Some((_, value)) => Err(ArgumentParseError::new(format!(
                    "{} is not between {} and {}",
                    value, min, max
                ))),
                None => Err(ArgumentParseError::new("expected an integer")),
            }
        })
    }

    fn suggest(
        &self,
        _context: ArgumentContext<S>,
        partial: String,
    ) -> BoxFuture<'static, Vec<Suggestion>> {
        let min = self.min;
        let max = self.max;
        Box::pin(async move {
            let mut suggestions = Vec::new();
            if !partial.is_empty() {
                if let Ok(value) = partial.parse::<i64>() {
                    if value >= min && value <= max {
                        suggestions.push(Suggestion::new(partial.clone()));
                    }
                }
            }
            for digit in 0..=9 {
                let candidate = format!("{}{}", partial, digit);
                if let Ok(value) = candidate.parse::<i64>() {
                    if value >= min && value <= max {
                        suggestions.push(Suggestion::new(candidate));
                    }
                }
            }
            suggestions
        })
    }

    fn type_tag(&self) -> &'static str {
        "integer"
    }

    fn context_free(&self) -> bool {
        true
    }
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
    fn parses_plain_integer() {
        let parser = IntegerParser::new();
        let result = futures::executor::block_on(
            ArgumentParser::<()>::parse(&parser, ctx(), "42 rest".to_string()),
        )
        .unwrap();
        assert_eq!(result.consumed, 2);
        assert_eq!(result.display, "42");
    }

    #[test]
    fn rejects_out_of_range() {
        let parser = IntegerParser::bounded(5, 100);
        let result = futures::executor::block_on(ArgumentParser::<()>::parse(
            &parser,
            ctx(),
            "4".to_string(),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn suggests_bounded_starting_digits() {
        let parser = IntegerParser::bounded(5, 100);
        let suggestions = futures::executor::block_on(ArgumentParser::<()>::suggest(
            &parser,
            ctx(),
            String::new(),
        ));
        let values: Vec<String> = suggestions.into_iter().map(|s| s.value).collect();
        assert!(values.contains(&"5".to_string()));
        assert!(values.contains(&"9".to_string()));
    }
}
