//! The closed style-tag vocabulary consumed by the renderer.
//!
//! Every mode classifies its spans with tags from this one enum; the renderer
//! maps tags to colors. A token request that consumes text with no particular
//! classification (whitespace, plain punctuation) yields no style at all
//! (`Option<Style>::None`), which is distinct from [`Style::Error`].

use serde::{Deserialize, Serialize};

/// Whether an indentation scope was opened by a layout keyword (block) or
/// recorded from plain alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeKind {
    Block,
    Plain,
}

/// Style tag for one classified span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    /// Reserved word or reserved operator (exact-match table).
    Keyword,
    /// Lowercase-initial identifier.
    Variable,
    /// Uppercase-initial identifier (constructor / type name).
    TypeName,
    /// Dotted module prefix of a qualified name, e.g. `Data.Map.` in
    /// `Data.Map.lookup`.
    Qualifier,
    /// String or character literal, including continuation lines.
    Str,
    Number,
    Comment,
    /// Pragma-style comment, `{-# ... #-}`.
    Meta,
    Operator,
    /// Operator beginning with `:` (constructor operator).
    TypeOperator,
    /// Unrecognized or malformed input, consumed one unit at a time.
    Error,
    /// Open/close delimiter of a nested-mode region.
    Delimiter,
    /// Route constructor name (routes mode).
    Tag,
    /// Route variable (routes mode).
    Atom,
    /// URL pattern piece (routes mode).
    Path,
    /// Indentation marker emitted while walking open scopes at the start of
    /// an indented line; lets the renderer draw indent guides.
    Indent {
        column: usize,
        kind: ScopeKind,
        closing: bool,
    },
}

impl Style {
    /// Stable lowercase name used by the text output of the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Style::Keyword => "keyword",
            Style::Variable => "variable",
            Style::TypeName => "type",
            Style::Qualifier => "qualifier",
            Style::Str => "string",
            Style::Number => "number",
            Style::Comment => "comment",
            Style::Meta => "meta",
            Style::Operator => "operator",
            Style::TypeOperator => "type-operator",
            Style::Error => "error",
            Style::Delimiter => "delimiter",
            Style::Tag => "tag",
            Style::Atom => "atom",
            Style::Path => "path",
            Style::Indent { .. } => "indent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_stable() {
        assert_eq!(Style::Keyword.name(), "keyword");
        assert_eq!(
            Style::Indent {
                column: 2,
                kind: ScopeKind::Block,
                closing: true
            }
            .name(),
            "indent"
        );
    }
}
