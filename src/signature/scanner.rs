//! @acp:module "Source Scanner"
//! @acp:summary "Bracket- and quote-aware single-pass scanner over source text"
//! @acp:domain core
//! @acp:layer parser
//!
//! The scanner is a small state machine with three states (`Normal`,
//! `InSingleQuote`, `InDoubleQuote`) and a nesting depth counter. Every
//! character is reported together with the depth it sits at, so callers
//! can look for separators at depth 0 outside of quotes.

use std::str::CharIndices;

/// @acp:summary "Quote state of the scanner"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Normal,
    InSingleQuote,
    InDoubleQuote,
}

/// @acp:summary "One scanned character with its nesting context"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanEvent {
    pub index: usize,
    pub ch: char,
    /// Depth of the enclosing brackets; a bracket pair shares its outer depth
    pub depth: usize,
    /// Part of a string literal, delimiters included
    pub quoted: bool,
}

impl ScanEvent {
    /// Outside every bracket and string literal
    pub fn is_top_level(&self) -> bool {
        self.depth == 0 && !self.quoted
    }
}

/// @acp:summary "Iterator of scan events over a source string"
pub struct Scanner<'a> {
    chars: CharIndices<'a>,
    state: ScanState,
    depth: usize,
    escaped: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices(),
            state: ScanState::Normal,
            depth: 0,
            escaped: false,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        let (index, ch) = self.chars.next()?;

        let event = match self.state {
            ScanState::InSingleQuote | ScanState::InDoubleQuote => {
                let closing = if self.state == ScanState::InSingleQuote { '\'' } else { '"' };
                if self.escaped {
                    self.escaped = false;
                } else if ch == '\\' {
                    self.escaped = true;
                } else if ch == closing {
                    self.state = ScanState::Normal;
                }
                ScanEvent {
                    index,
                    ch,
                    depth: self.depth,
                    quoted: true,
                }
            }
            ScanState::Normal => match ch {
                '\'' | '"' => {
                    self.state = if ch == '\'' {
                        ScanState::InSingleQuote
                    } else {
                        ScanState::InDoubleQuote
                    };
                    ScanEvent {
                        index,
                        ch,
                        depth: self.depth,
                        quoted: true,
                    }
                }
                '{' | '[' | '(' => {
                    let event = ScanEvent {
                        index,
                        ch,
                        depth: self.depth,
                        quoted: false,
                    };
                    self.depth += 1;
                    event
                }
                '}' | ']' | ')' => {
                    self.depth = self.depth.saturating_sub(1);
                    ScanEvent {
                        index,
                        ch,
                        depth: self.depth,
                        quoted: false,
                    }
                }
                _ => ScanEvent {
                    index,
                    ch,
                    depth: self.depth,
                    quoted: false,
                },
            },
        };

        Some(event)
    }
}

/// Split on a separator that sits at depth 0 outside of quotes
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for event in Scanner::new(text) {
        if event.is_top_level() && event.ch == separator {
            parts.push(&text[start..event.index]);
            start = event.index + event.ch.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Byte index of the first top-level occurrence of `target`
pub fn find_top_level(text: &str, target: char) -> Option<usize> {
    Scanner::new(text)
        .find(|event| event.is_top_level() && event.ch == target)
        .map(|event| event.index)
}
