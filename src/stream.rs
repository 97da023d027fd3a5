//! Character stream cursor over a single line of source text.
//!
//! Every token request operates through a [`StreamCursor`]: a cursor over one
//! line exposing lookahead, conditional consumption, anchored string/regex
//! matching, and tab-aware column bookkeeping. The cursor never crosses line
//! boundaries; multi-line constructs are carried across lines by the mode's
//! persisted state instead.
//!
//! All consuming operations advance the position monotonically within a token
//! request (with [`back_up`](StreamCursor::back_up) as the explicit rewind
//! escape hatch). The span consumed since the last token boundary is available
//! through [`current`](StreamCursor::current); the driver calls
//! [`start_token`](StreamCursor::start_token) before each token request to
//! reset that baseline.

use regex::Regex;

/// Horizontal whitespace as the tokenizer sees it (never newlines; the cursor
/// is line-local by construction).
pub fn is_line_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{000B}' | '\u{000C}')
}

/// Tab-expanded width of `text` starting at column `start`.
fn count_column(text: &str, start: usize, tab_size: usize) -> usize {
    let mut col = start;
    for ch in text.chars() {
        if ch == '\t' {
            col += tab_size - col % tab_size;
        } else {
            col += 1;
        }
    }
    col
}

/// Cursor over a single line of text.
#[derive(Debug, Clone)]
pub struct StreamCursor<'a> {
    text: &'a str,
    pos: usize,
    token_start: usize,
    tab_size: usize,
}

impl<'a> StreamCursor<'a> {
    /// A `tab_size` of 0 is treated as 1.
    pub fn new(text: &'a str, tab_size: usize) -> Self {
        StreamCursor {
            text,
            pos: 0,
            token_start: 0,
            tab_size: tab_size.max(1),
        }
    }

    /// Byte offset into the line.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// True at end of line.
    pub fn eol(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// True at start of line.
    pub fn sol(&self) -> bool {
        self.pos == 0
    }

    /// Look at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Consume and return the next character, or `None` at end of line.
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume the next character if the predicate accepts it.
    pub fn eat(&mut self, pred: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.pos += ch.len_utf8();
                Some(ch)
            }
            _ => None,
        }
    }

    /// Consume the next character if it equals `expected`.
    pub fn eat_char(&mut self, expected: char) -> bool {
        self.eat(|ch| ch == expected).is_some()
    }

    /// Greedily consume characters matching the predicate. Returns whether at
    /// least one character was consumed.
    pub fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> bool {
        let start = self.pos;
        while self.eat(&mut pred).is_some() {}
        self.pos > start
    }

    /// Consume a run of horizontal whitespace.
    pub fn eat_space(&mut self) -> bool {
        self.eat_while(is_line_whitespace)
    }

    /// Match `s` at the current position. On match, consumes it when
    /// `consume` is set.
    pub fn match_str(&mut self, s: &str, consume: bool) -> bool {
        if self.text[self.pos..].starts_with(s) {
            if consume {
                self.pos += s.len();
            }
            true
        } else {
            false
        }
    }

    /// Match `re` anchored at the current position. On match, consumes the
    /// matched span when `consume` is set.
    pub fn match_regex(&mut self, re: &Regex, consume: bool) -> bool {
        match re.find_at(self.text, self.pos) {
            Some(m) if m.start() == self.pos => {
                if consume {
                    self.pos = m.end();
                }
                true
            }
            _ => false,
        }
    }

    /// Consume the remainder of the line.
    pub fn skip_to_end(&mut self) {
        self.pos = self.text.len();
    }

    /// Advance to the next occurrence of `ch` (stopping just before it), or
    /// fail without moving.
    pub fn skip_to(&mut self, ch: char) -> bool {
        match self.text[self.pos..].find(ch) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => false,
        }
    }

    /// Rewind by `n` characters, not before the current token boundary.
    pub fn back_up(&mut self, n: usize) {
        for _ in 0..n {
            if self.pos <= self.token_start {
                break;
            }
            let prev = self.text[..self.pos]
                .chars()
                .next_back()
                .map_or(0, char::len_utf8);
            self.pos -= prev;
        }
    }

    /// Tab-expanded column of the current position.
    pub fn column(&self) -> usize {
        count_column(&self.text[..self.pos], 0, self.tab_size)
    }

    /// Tab-expanded width of the line's leading whitespace.
    pub fn indentation(&self) -> usize {
        let ws_end = self
            .text
            .find(|ch| !is_line_whitespace(ch))
            .unwrap_or(self.text.len());
        count_column(&self.text[..ws_end], 0, self.tab_size)
    }

    /// Text consumed since the last token boundary.
    pub fn current(&self) -> &'a str {
        &self.text[self.token_start..self.pos]
    }

    /// Reset the token boundary to the current position. Called by the driver
    /// before each token request.
    pub fn start_token(&mut self) {
        self.token_start = self.pos;
    }

    /// A view of this cursor truncated at byte offset `end`. Used by the
    /// multiplexer to keep a delegate mode from reading past a delimiter.
    pub fn clamped(&self, end: usize) -> StreamCursor<'a> {
        StreamCursor {
            text: &self.text[..end.min(self.text.len())],
            pos: self.pos,
            token_start: self.token_start,
            tab_size: self.tab_size,
        }
    }

    /// Fold a clamped view's consumption back into this cursor.
    pub fn sync(&mut self, clamped: &StreamCursor<'_>) {
        debug_assert!(clamped.pos >= self.pos);
        self.pos = clamped.pos;
    }

    /// The full line text. Delimiter scans in the multiplexer search this
    /// directly rather than consuming.
    pub fn line(&self) -> &'a str {
        self.text
    }
}
