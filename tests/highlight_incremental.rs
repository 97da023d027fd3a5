//! Integration tests for incremental re-highlighting: cached line states,
//! downstream invalidation, and equivalence with from-scratch tokenization.

use std::sync::Arc;

use glint::highlight::{Highlighter, Token};
use glint::mode::{Mode, ModeConfig, ModeRegistry};
use glint::modes::register_builtins;
use glint::style::Style;

fn yesod() -> Arc<dyn Mode> {
    let mut registry = ModeRegistry::new();
    register_builtins(&mut registry, ModeConfig::default()).unwrap();
    registry.resolve("yesod").unwrap()
}

const DOCUMENT: &str = "\
mkYesod \"App\" [parseRoutes|
/ HomeR GET
|]

getHomeR = do
  app <- getYesod
  defaultLayout [whamlet|Hello #{appName app}|]";

fn all_tokens(text: &str) -> Vec<Vec<Token>> {
    Highlighter::new(yesod(), text, 8).all_tokens()
}

#[test]
fn test_random_access_equals_sequential() {
    let expected = all_tokens(DOCUMENT);
    let mut hl = Highlighter::new(yesod(), DOCUMENT, 8);
    for line in [6, 0, 3, 5, 1] {
        assert_eq!(hl.line_tokens(line), expected[line], "line {line}");
    }
}

#[test]
fn test_retokenizing_a_line_does_not_corrupt_cache() {
    let expected = all_tokens(DOCUMENT);
    let mut hl = Highlighter::new(yesod(), DOCUMENT, 8);
    hl.line_tokens(2);
    hl.line_tokens(2);
    hl.line_tokens(2);
    for (line, tokens) in expected.iter().enumerate() {
        assert_eq!(&hl.line_tokens(line), tokens, "line {line}");
    }
}

#[test]
fn test_edit_retokenizes_downstream_lines() {
    let mut hl = Highlighter::new(yesod(), DOCUMENT, 8);
    // Line 1 is inside the routes region.
    assert!(hl
        .line_tokens(1)
        .iter()
        .any(|t| t.style == Some(Style::Path)));

    // Removing the quasiquote opener turns lines 1 and 2 into host source.
    hl.replace_line(0, "mkYesod \"App\"");
    assert!(hl
        .line_tokens(1)
        .iter()
        .all(|t| t.style != Some(Style::Path)));

    // The edited document matches a from-scratch run.
    let edited = DOCUMENT.replacen("mkYesod \"App\" [parseRoutes|", "mkYesod \"App\"", 1);
    assert_eq!(hl.all_tokens(), all_tokens(&edited));
}

#[test]
fn test_edit_below_does_not_change_lines_above() {
    let mut hl = Highlighter::new(yesod(), DOCUMENT, 8);
    let before: Vec<_> = (0..4).map(|i| hl.line_tokens(i)).collect();
    hl.replace_line(5, "  app <- getYesod >>= validate");
    for (line, tokens) in before.iter().enumerate() {
        assert_eq!(&hl.line_tokens(line), tokens, "line {line}");
    }
}

#[test]
fn test_indent_hint_follows_active_mode() {
    let mut hl = Highlighter::new(yesod(), "main = do\n  x <- act\n  pure x", 8);
    assert_eq!(hl.indent_hint(1), glint::mode::Indent::Column(2));
    assert_eq!(hl.indent_hint(2), glint::mode::Indent::Column(2));
}
