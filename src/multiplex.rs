//! Mode multiplexer: nests inner tokenizer modes inside delimited regions
//! of an outer mode.
//!
//! A [`Multiplexer`] wraps an outer mode and an ordered list of
//! [`ModeBinding`]s. On each token request it decides whether the cursor is
//! inside a region belonging to one of the bindings and delegates the call
//! accordingly:
//!
//! - entering: bindings are tried **in registration order** and the first
//!   whose open pattern matches at the cursor wins. First match, not longest
//!   match; registration order is the precedence policy.
//! - inside: the inner mode tokenizes, clamped so it can never read past its
//!   own close delimiter; the close delimiter itself is consumed by the
//!   multiplexer and styled with the binding's delimiter style.
//! - outside: the outer mode tokenizes, clamped so it cannot run across a
//!   position where an open pattern would match mid-token.
//!
//! The outer mode's state is paused, never reset, while a region is active:
//! nested regions are transparent to outer-mode state evolution.

use std::ops::Range;
use std::sync::Arc;

use regex::Regex;

use crate::mode::{state_mut, Indent, Mode, ModeError, ModeRegistry, ModeState};
use crate::stream::StreamCursor;
use crate::style::Style;

/// Open/close delimiter pattern: an exact string or an anchored regex.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Pattern {
        Pattern::Literal(text.into())
    }

    /// Compile a regex pattern; failure is a construction-time
    /// configuration error.
    pub fn regex(pattern: &str) -> Result<Pattern, ModeError> {
        Regex::new(pattern)
            .map(Pattern::Regex)
            .map_err(|err| ModeError::BadPattern(err.to_string()))
    }

    /// Earliest match at or after `from`.
    fn find_from(&self, text: &str, from: usize) -> Option<Range<usize>> {
        match self {
            Pattern::Literal(s) => text[from..]
                .find(s.as_str())
                .map(|i| from + i..from + i + s.len()),
            Pattern::Regex(re) => re.find_at(text, from).map(|m| m.start()..m.end()),
        }
    }

    /// Match anchored exactly at `at`; returns the end of the match.
    fn match_at(&self, text: &str, at: usize) -> Option<usize> {
        self.find_from(text, at)
            .filter(|r| r.start == at)
            .map(|r| r.end)
    }
}

/// One (open, close, inner mode) registration.
pub struct ModeBinding {
    pub open: Pattern,
    pub close: Pattern,
    pub mode: Arc<dyn Mode>,
    /// Style for the open/close delimiter spans. With `None` the open span
    /// is an unstyled token and the close is consumed silently before outer
    /// tokenization resumes within the same call.
    pub delim_style: Option<Style>,
}

impl ModeBinding {
    pub fn new(open: Pattern, close: Pattern, mode: Arc<dyn Mode>) -> Self {
        ModeBinding {
            open,
            close,
            mode,
            delim_style: Some(Style::Delimiter),
        }
    }

    /// Resolve the inner mode by name; an unknown name is fatal to
    /// constructing the binding.
    pub fn by_name(
        registry: &ModeRegistry,
        name: &str,
        open: Pattern,
        close: Pattern,
    ) -> Result<Self, ModeError> {
        Ok(ModeBinding::new(open, close, registry.resolve(name)?))
    }

    pub fn delim_style(mut self, style: Option<Style>) -> Self {
        self.delim_style = style;
        self
    }
}

/// Per-line state of the multiplexer. Exactly one of outer/inner is live at
/// any stream position: `inner` is present iff `active` names a binding.
#[derive(Debug, Clone)]
pub struct MultiplexState {
    active: Option<usize>,
    inner: Option<Box<dyn ModeState>>,
    outer: Box<dyn ModeState>,
}

/// A mode that delegates between an outer mode and delimited inner modes.
pub struct Multiplexer {
    name: &'static str,
    outer: Arc<dyn Mode>,
    bindings: Vec<ModeBinding>,
}

impl Multiplexer {
    pub fn new(name: &'static str, outer: Arc<dyn Mode>, bindings: Vec<ModeBinding>) -> Self {
        Multiplexer {
            name,
            outer,
            bindings,
        }
    }

    /// Delegate one token to the outer mode, clamped before the next
    /// position where any open pattern matches.
    fn outer_token(
        &self,
        cursor: &mut StreamCursor<'_>,
        state: &mut MultiplexState,
    ) -> Option<Style> {
        let text = cursor.line();
        let pos = cursor.pos();
        let mut cutoff = text.len();
        for binding in &self.bindings {
            if let Some(range) = binding.open.find_from(text, pos) {
                if range.start > pos {
                    cutoff = cutoff.min(range.start);
                }
            }
        }
        let mut clamped = cursor.clamped(cutoff);
        let style = self.outer.token(&mut clamped, state.outer.as_mut());
        cursor.sync(&clamped);
        style
    }
}

impl Mode for Multiplexer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn start_state(&self) -> Box<dyn ModeState> {
        Box::new(MultiplexState {
            active: None,
            inner: None,
            outer: self.outer.start_state(),
        })
    }

    fn token(&self, cursor: &mut StreamCursor<'_>, state: &mut dyn ModeState) -> Option<Style> {
        let state = state_mut::<MultiplexState>(state, self.name);
        let text = cursor.line();

        loop {
            if let Some(index) = state.active {
                let binding = &self.bindings[index];
                let pos = cursor.pos();
                let close = binding.close.find_from(text, pos);

                if let Some(end) = close.as_ref().filter(|r| r.start == pos).map(|r| r.end) {
                    while cursor.pos() < end {
                        cursor.next();
                    }
                    state.active = None;
                    state.inner = None;
                    if binding.delim_style.is_some() {
                        return binding.delim_style;
                    }
                    if cursor.eol() {
                        return None;
                    }
                    // Silent close: rescan the open patterns before the
                    // outer mode resumes; an adjacent region must still
                    // activate.
                    continue;
                }

                let limit = close.map_or(text.len(), |r| r.start);
                let inner = state
                    .inner
                    .as_mut()
                    .expect("active multiplex binding without inner state");
                let mut clamped = cursor.clamped(limit);
                let style = binding.mode.token(&mut clamped, inner.as_mut());
                cursor.sync(&clamped);
                return style;
            }

            let pos = cursor.pos();
            for (index, binding) in self.bindings.iter().enumerate() {
                if let Some(end) = binding.open.match_at(text, pos) {
                    while cursor.pos() < end {
                        cursor.next();
                    }
                    state.active = Some(index);
                    state.inner = Some(binding.mode.start_state());
                    return binding.delim_style;
                }
            }

            return self.outer_token(cursor, state);
        }
    }

    fn indent(&self, state: &dyn ModeState) -> Indent {
        let state: &MultiplexState = match state.as_any().downcast_ref() {
            Some(concrete) => concrete,
            None => return Indent::Default,
        };
        match (state.active, state.inner.as_ref()) {
            (Some(index), Some(inner)) => self.bindings[index].mode.indent(inner.as_ref()),
            _ => self.outer.indent(state.outer.as_ref()),
        }
    }
}
