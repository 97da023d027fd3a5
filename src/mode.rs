//! Mode contract, configuration, errors, and the named mode registry.
//!
//! A *mode* is a complete tokenizer for one language or sub-language: a state
//! machine plus a style vocabulary. The host editor drives a mode one token
//! request at a time through [`Mode::token`], persisting the returned state
//! per line so that re-highlighting after an edit can resume from the nearest
//! unaffected line instead of the top of the document.
//!
//! Modes are registered by name in a [`ModeRegistry`] so that compositions
//! (the multiplexer, template modes) can refer to their inner modes by name.
//! A name that cannot be resolved is a construction-time error
//! ([`ModeError::ModeNotFound`]); nothing in the token path ever fails.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use crate::stream::StreamCursor;
use crate::style::Style;

/// Configuration inputs provided by the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    /// Tab stop width used for column/indentation expansion.
    pub tab_size: usize,
    /// Width of one indentation step; layout keywords open their block this
    /// far past the current line's indentation.
    pub indent_unit: usize,
}

impl Default for ModeConfig {
    fn default() -> Self {
        ModeConfig {
            tab_size: 8,
            indent_unit: 2,
        }
    }
}

/// Suggested indentation for a new line, per [`Mode::indent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Indent to this column.
    Column(usize),
    /// No opinion; the host falls back to its generic indentation.
    Default,
}

/// Per-line lexer state, type-erased so that registries and the multiplexer
/// can hold arbitrary modes. Concrete modes downcast back to their own state
/// type; handing a mode a state it did not produce is a programming error.
///
/// `clone_box` is the deep copy required for speculative re-tokenization: the
/// scope stack and any nested states are owned data, so a `Clone` is a deep
/// copy by construction.
pub trait ModeState: Any + fmt::Debug {
    fn clone_box(&self) -> Box<dyn ModeState>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Clone + fmt::Debug> ModeState for T {
    fn clone_box(&self) -> Box<dyn ModeState> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn ModeState> {
    fn clone(&self) -> Self {
        // Deref past the Box: the blanket `ModeState for T` impl also covers
        // `Box<dyn ModeState>`, and an unqualified `self.clone_box()` would
        // resolve to it and recurse back into this `clone`.
        (**self).clone_box()
    }
}

/// Downcast a state reference to a mode's concrete state type.
pub(crate) fn state_ref<'a, T: 'static>(state: &'a dyn ModeState, mode: &str) -> &'a T {
    match state.as_any().downcast_ref() {
        Some(concrete) => concrete,
        None => panic!("{} mode was handed a state it did not produce", mode),
    }
}

/// Mutable variant of [`state_ref`].
pub(crate) fn state_mut<'a, T: 'static>(state: &'a mut dyn ModeState, mode: &str) -> &'a mut T {
    match state.as_any_mut().downcast_mut() {
        Some(concrete) => concrete,
        None => panic!("{} mode was handed a state it did not produce", mode),
    }
}

/// A complete tokenizer for one language or sub-language.
pub trait Mode: Send + Sync {
    /// Registry name of this mode.
    fn name(&self) -> &'static str;

    /// Fresh state for the start of a document or of a mode run.
    fn start_state(&self) -> Box<dyn ModeState>;

    /// Deep copy of a persisted state. The default clone is already deep.
    fn copy_state(&self, state: &dyn ModeState) -> Box<dyn ModeState> {
        state.clone_box()
    }

    /// Consume some non-empty prefix of the line and classify it. `None`
    /// means the consumed span carries no style. State is mutated in place;
    /// by the time this returns, the state describes how scanning resumes
    /// after the consumed span.
    fn token(&self, cursor: &mut StreamCursor<'_>, state: &mut dyn ModeState) -> Option<Style>;

    /// Suggested indentation for a new line below a line that ended in
    /// `state`.
    fn indent(&self, _state: &dyn ModeState) -> Indent {
        Indent::Default
    }
}

/// Errors that can occur while constructing or resolving modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    /// A nested-mode reference names a mode the registry does not know.
    ModeNotFound(String),
    /// An open/close delimiter pattern failed to compile.
    BadPattern(String),
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::ModeNotFound(name) => write!(f, "Mode '{}' not found", name),
            ModeError::BadPattern(msg) => write!(f, "Bad delimiter pattern: {}", msg),
        }
    }
}

impl std::error::Error for ModeError {}

/// Registry of modes, addressable by name.
#[derive(Clone, Default)]
pub struct ModeRegistry {
    modes: HashMap<String, Arc<dyn Mode>>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        ModeRegistry {
            modes: HashMap::new(),
        }
    }

    /// Register a mode under its own name.
    pub fn register(&mut self, mode: Arc<dyn Mode>) {
        self.modes.insert(mode.name().to_string(), mode);
    }

    /// Get a registered mode by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Mode>> {
        self.modes.get(name).cloned()
    }

    /// Check whether a mode is registered.
    pub fn has(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    /// Resolve a mode by name, surfacing a configuration error when absent.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Mode>, ModeError> {
        self.get(name)
            .ok_or_else(|| ModeError::ModeNotFound(name.to_string()))
    }

    /// Sorted list of registered mode names.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<_> = self.modes.keys().cloned().collect();
        names.sort();
        names
    }

    /// The process-wide registry.
    pub fn global() -> &'static Mutex<ModeRegistry> {
        static REGISTRY: OnceLock<Mutex<ModeRegistry>> = OnceLock::new();
        REGISTRY.get_or_init(|| Mutex::new(ModeRegistry::new()))
    }

    /// Initialize the global registry with the built-in modes.
    pub fn init_defaults(config: ModeConfig) -> Result<(), ModeError> {
        let mut registry = Self::global().lock().unwrap();
        if registry.available().is_empty() {
            crate::modes::register_builtins(&mut registry, config)?;
        }
        Ok(())
    }
}
