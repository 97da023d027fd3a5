//! Property-based tests for the tokenizer driver invariants.
//!
//! These hold for any input, well-formed or not: every line is fully
//! consumed, spans tile the line with no gaps or overlaps, and copied
//! states evolve independently of their originals.

use std::sync::Arc;

use proptest::prelude::*;

use glint::highlight::tokenize_line;
use glint::mode::{Mode, ModeConfig, ModeRegistry};
use glint::modes::haskell::HaskellMode;
use glint::modes::register_builtins;

/// Generate lines of printable ASCII plus tabs, including pathological
/// fragments the grammar only partially recognizes.
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~\t]{0,60}",
        // Fragments biased toward tokenizer state transitions.
        "(do |where |\\{- |-\\} |\"|\\\\|\\{-# |\\|\\]|\\[q\\| |--|::| )+",
    ]
}

fn document_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(line_strategy(), 1..8)
}

fn haskell() -> Arc<dyn Mode> {
    Arc::new(HaskellMode::new(ModeConfig::default()))
}

fn yesod() -> Arc<dyn Mode> {
    let mut registry = ModeRegistry::new();
    register_builtins(&mut registry, ModeConfig::default()).unwrap();
    registry.resolve("yesod").unwrap()
}

/// Spans must cover the whole line in order, each consuming at least one
/// byte.
fn assert_tiles(mode: &dyn Mode, lines: &[String]) {
    let mut state = mode.start_state();
    for line in lines {
        let tokens = tokenize_line(mode, line, state.as_mut(), 8);
        let mut pos = 0;
        for token in &tokens {
            assert_eq!(token.start, pos, "gap or overlap in {line:?}");
            assert!(token.end > token.start, "empty token in {line:?}");
            pos = token.end;
        }
        assert_eq!(pos, line.len(), "line not fully consumed: {line:?}");
    }
}

proptest! {
    #[test]
    fn prop_haskell_tokens_tile_every_line(lines in document_strategy()) {
        assert_tiles(haskell().as_ref(), &lines);
    }

    #[test]
    fn prop_yesod_tokens_tile_every_line(lines in document_strategy()) {
        assert_tiles(yesod().as_ref(), &lines);
    }

    #[test]
    fn prop_copied_state_is_independent(
        prefix in line_strategy(),
        line in line_strategy(),
    ) {
        let mode = haskell();
        let mut original = mode.start_state();
        tokenize_line(mode.as_ref(), &prefix, original.as_mut(), 8);

        let mut copy = mode.copy_state(original.as_ref());
        let from_copy = tokenize_line(mode.as_ref(), &line, copy.as_mut(), 8);
        // Advancing the copy must not have disturbed the original.
        let from_original = tokenize_line(mode.as_ref(), &line, original.as_mut(), 8);
        prop_assert_eq!(from_copy, from_original);
    }

    #[test]
    fn prop_tokenization_is_deterministic(lines in document_strategy()) {
        let mode = yesod();
        let mut a = mode.start_state();
        let mut b = mode.start_state();
        for line in &lines {
            let ta = tokenize_line(mode.as_ref(), line, a.as_mut(), 8);
            let tb = tokenize_line(mode.as_ref(), line, b.as_mut(), 8);
            prop_assert_eq!(ta, tb);
        }
    }
}
