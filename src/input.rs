// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The command input cursor.
//!
//! `CommandInput` wraps a tokenized command line and a position within
//! it. Snapshotting and restoring the position is a cheap value copy
//! (an index), which is what the parser engine relies on for
//! lookahead: an argument child can be tried speculatively and undone
//! without re-tokenizing.

use std::sync::Arc;

use crate::tokenizer::{tokenize, Token, TokenType, TokenizerError};

/// A restartable cursor over a tokenized command line.
#[derive(Clone, Debug)]
pub struct CommandInput<'text> {
    text: &'text str,
    tokens: Arc<[Token<'text>]>,
    position: usize,
}

/// Where the cursor sits relative to suggestion-worthy input: either
/// there is a partially-typed word to complete, or the cursor sits
/// between two tokens (or at the very start/end) and any suggestion
/// is for a brand new, empty word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionPoint<'text> {
    /// The word under the cursor is still being typed; suggestions
    /// should be filtered to those starting with it.
    Partial(&'text str),
    /// The cursor is between tokens; suggestions should be offered
    /// for an empty prefix.
    Empty,
}

impl<'text> CommandInput<'text> {
    /// Tokenize `text` and build a cursor positioned at its start.
    pub fn tokenize(text: &'text str) -> Result<Self, TokenizerError> {
        let tokens = tokenize(text)?;
        Ok(CommandInput {
            text,
            tokens: Arc::from(tokens),
            position: 0,
        })
    }

    /// The full original input this cursor was built from.
    pub fn full_text(&self) -> &'text str {
        self.text
    }

    fn skip_whitespace_from(&self, mut position: usize) -> usize {
        while self
            .tokens
            .get(position)
            .map(|t| t.token_type)
            .map_or(false, |t| t == TokenType::Whitespace)
        {
            position += 1;
        }
        position
    }

    /// Advance past any whitespace token at the current position.
    pub fn skip_whitespace(&mut self) {
        self.position = self.skip_whitespace_from(self.position);
    }

    /// `true` if no word tokens remain, once whitespace is skipped.
    pub fn is_empty(&self) -> bool {
        self.skip_whitespace_from(self.position) >= self.tokens.len()
    }

    /// Look at the next word token, without consuming it.
    pub fn peek_word(&self) -> Option<&'text str> {
        let position = self.skip_whitespace_from(self.position);
        self.tokens.get(position).map(|t| t.text)
    }

    /// Consume and return the next word token.
    pub fn read_word(&mut self) -> Option<&'text str> {
        self.position = self.skip_whitespace_from(self.position);
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token.text)
    }

    /// `true` if the next word token (if any) is the last one in the
    /// input.
    pub fn is_last_word(&self) -> bool {
        let position = self.skip_whitespace_from(self.position);
        match self.tokens.get(position) {
            Some(_) => self.skip_whitespace_from(position + 1) >= self.tokens.len(),
            None => false,
        }
    }

    /// `true` if the original input text ends with whitespace (so a
    /// trailing, not-yet-started word is implied).
    pub fn full_text_ends_with_whitespace(&self) -> bool {
        self.text.chars().last().map_or(true, char::is_whitespace)
    }

    /// The raw remaining text from the current (post-whitespace)
    /// position to the end of input, quotes and escapes intact. Used
    /// by greedy parsers that consume more than one token.
    pub fn remaining_raw(&self) -> &'text str {
        let position = self.skip_whitespace_from(self.position);
        match self.tokens.get(position) {
            Some(token) => &self.text[token.location.start.byte..],
            None => "",
        }
    }

    /// The byte offset, within [`remaining_raw`](Self::remaining_raw),
    /// of the start of the first word token whose raw text begins
    /// with `-` at or after the current position. Used by
    /// flag-yielding greedy parsers to stop before a following flag
    /// group.
    pub fn next_flag_boundary(&self) -> Option<usize> {
        let mut position = self.skip_whitespace_from(self.position);
        let base = self.tokens.get(position)?.location.start.byte;
        // Skip the first word; a greedy parser always consumes at
        // least the first token of its span.
        position += 1;
        loop {
            position = self.skip_whitespace_from(position);
            match self.tokens.get(position) {
                Some(token) if token.text.starts_with('-') && token.text != "-" => {
                    return Some(token.location.start.byte - base);
                }
                Some(_) => position += 1,
                None => return None,
            }
        }
    }

    /// An opaque checkpoint of the current position, restorable with
    /// [`restore`](Self::restore).
    pub fn checkpoint(&self) -> usize {
        self.position
    }

    /// Restore a previously taken checkpoint.
    pub fn restore(&mut self, checkpoint: usize) {
        self.position = checkpoint;
    }

    /// Advance the cursor to directly follow the given byte offset
    /// within [`remaining_raw`](Self::remaining_raw) at the time the
    /// offset was computed, re-synchronizing to the nearest token
    /// boundary. Used after a greedy parser has decided how many
    /// bytes of the remaining input it consumed.
    pub fn advance_to_relative_byte(&mut self, relative_byte: usize) {
        let position = self.skip_whitespace_from(self.position);
        let base = match self.tokens.get(position) {
            Some(token) => token.location.start.byte,
            None => return,
        };
        let target = base + relative_byte;
        let mut index = position;
        while let Some(token) = self.tokens.get(index) {
            if token.location.end.byte <= target {
                index += 1;
            } else {
                break;
            }
        }
        self.position = index;
    }

    /// Compute the suggestion point for the cursor's current position.
    pub fn suggestion_point(&self) -> SuggestionPoint<'text> {
        match self.peek_word() {
            Some(word) if self.is_last_word() && !self.full_text_ends_with_whitespace() => {
                SuggestionPoint::Partial(word)
            }
            Some(_) => SuggestionPoint::Empty,
            None => SuggestionPoint::Empty,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_words_skipping_whitespace() {
        let mut input = CommandInput::tokenize("  test one  two").unwrap();
        assert_eq!(input.read_word(), Some("test"));
        assert_eq!(input.read_word(), Some("one"));
        assert_eq!(input.read_word(), Some("two"));
        assert_eq!(input.read_word(), None);
    }

    #[test]
    fn checkpoint_and_restore_rewinds() {
        let mut input = CommandInput::tokenize("a b c").unwrap();
        input.read_word();
        let checkpoint = input.checkpoint();
        input.read_word();
        input.restore(checkpoint);
        assert_eq!(input.read_word(), Some("b"));
    }

    #[test]
    fn remaining_raw_preserves_quoting() {
        let mut input = CommandInput::tokenize(r#"say "hello world""#).unwrap();
        input.read_word();
        assert_eq!(input.remaining_raw(), r#""hello world""#);
    }

    #[test]
    fn suggestion_point_partial_when_no_trailing_space() {
        let input = CommandInput::tokenize("test o").unwrap();
        let mut cursor = input.clone();
        cursor.read_word();
        match cursor.suggestion_point() {
            SuggestionPoint::Partial(word) => assert_eq!(word, "o"),
            SuggestionPoint::Empty => panic!("expected a partial suggestion point"),
        }
    }

    #[test]
    fn suggestion_point_empty_when_trailing_space() {
        let input = CommandInput::tokenize("test ").unwrap();
        let mut cursor = input.clone();
        cursor.read_word();
        assert_eq!(cursor.suggestion_point(), SuggestionPoint::Empty);
    }

    #[test]
    fn next_flag_boundary_finds_following_flag() {
        let input = CommandInput::tokenize("hello world --flag value").unwrap();
        assert_eq!(input.next_flag_boundary(), Some("hello world ".len()));
    }
}
