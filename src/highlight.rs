//! Line-by-line tokenization driver with incremental re-highlighting.
//!
//! [`tokenize_line`] runs one mode over one line and returns styled byte
//! spans. [`Highlighter`] layers a per-line state cache on top so an editor
//! can re-tokenize only the lines downstream of an edit: the state a mode
//! carries at a line boundary fully determines everything after it, so
//! cached states for lines above the edit stay valid.

use std::sync::Arc;

use serde::Serialize;

use crate::mode::{Indent, Mode, ModeState};
use crate::stream::StreamCursor;
use crate::style::Style;

/// A styled span of one line, in byte offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub style: Option<Style>,
}

/// Tokenize a single line, mutating `state` to its end-of-line value.
///
/// Empty lines produce no tokens and leave the state untouched. A mode that
/// returns without consuming anything would loop forever; the driver forces
/// one character through as an error token instead.
pub fn tokenize_line(
    mode: &dyn Mode,
    line: &str,
    state: &mut dyn ModeState,
    tab_size: usize,
) -> Vec<Token> {
    let mut tokens = Vec::new();
    if line.is_empty() {
        return tokens;
    }
    let mut cursor = StreamCursor::new(line, tab_size);
    while !cursor.eol() {
        cursor.start_token();
        let start = cursor.pos();
        let mut style = mode.token(&mut cursor, state);
        if cursor.pos() == start {
            cursor.next();
            style = Some(Style::Error);
        }
        tokens.push(Token {
            start,
            end: cursor.pos(),
            style,
        });
    }
    tokens
}

/// Incremental highlighter over a buffer of lines.
///
/// `states[i]` is the mode state at the start of line `i`; entries are
/// computed lazily and discarded from the edit point down when a line
/// changes.
pub struct Highlighter {
    mode: Arc<dyn Mode>,
    lines: Vec<String>,
    states: Vec<Box<dyn ModeState>>,
    tab_size: usize,
}

impl Highlighter {
    pub fn new(mode: Arc<dyn Mode>, text: &str, tab_size: usize) -> Self {
        let lines = text.split('\n').map(str::to_owned).collect();
        let states = vec![mode.start_state()];
        Highlighter {
            mode,
            lines,
            states,
            tab_size,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> &str {
        &self.lines[line]
    }

    /// Compute and cache states up to the start of `line`.
    fn ensure(&mut self, line: usize) {
        while self.states.len() <= line {
            let prev = self.states.len() - 1;
            let mut state = self.mode.copy_state(self.states[prev].as_ref());
            tokenize_line(
                self.mode.as_ref(),
                &self.lines[prev],
                state.as_mut(),
                self.tab_size,
            );
            self.states.push(state);
        }
    }

    /// Tokenize one line, reusing the cached entry state. The resulting
    /// exit state is cached for the next line as a side effect.
    pub fn line_tokens(&mut self, line: usize) -> Vec<Token> {
        self.ensure(line);
        let mut state = self.mode.copy_state(self.states[line].as_ref());
        let tokens = tokenize_line(
            self.mode.as_ref(),
            &self.lines[line],
            state.as_mut(),
            self.tab_size,
        );
        if self.states.len() == line + 1 {
            self.states.push(state);
        }
        tokens
    }

    /// Indentation suggestion for the start of `line`.
    pub fn indent_hint(&mut self, line: usize) -> Indent {
        self.ensure(line);
        self.mode.indent(self.states[line].as_ref())
    }

    /// Replace the text of one line and drop every cached state below it.
    pub fn replace_line(&mut self, line: usize, text: impl Into<String>) {
        self.lines[line] = text.into();
        self.invalidate_from(line);
    }

    /// Discard cached states for `line` and everything after it. The state
    /// at the start of `line` itself is still valid and kept.
    pub fn invalidate_from(&mut self, line: usize) {
        self.states.truncate(line + 1);
    }

    /// Tokenize every line in order.
    pub fn all_tokens(&mut self) -> Vec<Vec<Token>> {
        (0..self.line_count()).map(|i| self.line_tokens(i)).collect()
    }
}
