//! # glint
//!
//! An incremental, line-oriented tokenizer engine for syntax highlighting.
//!
//! Modes implement the [`mode::Mode`] trait: a tokenizer that consumes one
//! token per call from a [`stream::StreamCursor`] while threading explicit,
//! copyable state. The [`highlight::Highlighter`] drives a mode line by
//! line and caches per-line states so edits only re-tokenize downstream
//! lines. [`multiplex::Multiplexer`] composes modes by nesting delimited
//! regions of one mode inside another.

pub mod highlight;
pub mod mode;
pub mod modes;
pub mod multiplex;
pub mod stream;
pub mod style;

pub use highlight::{tokenize_line, Highlighter, Token};
pub use mode::{Indent, Mode, ModeConfig, ModeError, ModeRegistry, ModeState};
pub use multiplex::{ModeBinding, Multiplexer, Pattern};
pub use stream::StreamCursor;
pub use style::{ScopeKind, Style};
