//! Tokenizer mode for URL route tables.
//!
//! A route table is line oriented: each rule is a URL pattern, an optional
//! run of typed variables, a constructor name, and either an HTTP verb or a
//! `:` that opens a nested block of sub-routes one indentation level deeper:
//!
//! ```text
//! /             UsersR         GET
//! /user/#Int    UserR:
//!   /              UserRootR   GET
//!   /delete        UserDeleteR POST
//! ```
//!
//! The mode is a small phase machine persisted across calls; it is mainly
//! used as a multiplexer payload for quasiquoted route blocks embedded in a
//! host language.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mode::{state_mut, Mode, ModeState};
use crate::stream::StreamCursor;
use crate::style::Style;

pub const MODE_NAME: &str = "routes";

static URL_PIECE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9a-zA-Z/]*/[0-9a-zA-Z]*").expect("url piece pattern"));
static SINGLE_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[A-Z][0-9a-zA-Z]*").expect("single variable pattern"));
static CATCH_ALL_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*[A-Z][0-9a-zA-Z]*").expect("catch-all variable pattern"));
static CONSTRUCTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][0-9a-zA-Z]*").expect("constructor pattern"));
static HTTP_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"GET|PUT|POST|DELETE").expect("verb pattern"));

/// Where we are within the current rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    UrlPattern,
    Variable,
    Constructor,
    Verb,
}

#[derive(Debug, Clone)]
pub struct RoutesState {
    phase: Phase,
    /// A `:` just opened a nested block; the next rule must be indented.
    just_descended: bool,
    last_rule_indent: usize,
}

/// Route-table tokenizer mode.
pub struct RoutesMode;

impl RoutesMode {
    fn error(cursor: &mut StreamCursor<'_>, state: &mut RoutesState) -> Option<Style> {
        cursor.skip_to_end();
        state.phase = Phase::UrlPattern;
        Some(Style::Error)
    }
}

impl Mode for RoutesMode {
    fn name(&self) -> &'static str {
        MODE_NAME
    }

    fn start_state(&self) -> Box<dyn ModeState> {
        Box::new(RoutesState {
            phase: Phase::UrlPattern,
            just_descended: false,
            last_rule_indent: 0,
        })
    }

    fn token(&self, cursor: &mut StreamCursor<'_>, state: &mut dyn ModeState) -> Option<Style> {
        let state = state_mut::<RoutesState>(state, MODE_NAME);

        if cursor.eat_space() {
            return None;
        }

        let descended = state.last_rule_indent < cursor.indentation();
        state.last_rule_indent = cursor.indentation();
        if state.just_descended && !descended {
            // A `:` promised nested routes but none followed.
            state.just_descended = false;
            return Self::error(cursor, state);
        }
        state.just_descended = false;

        match state.phase {
            Phase::UrlPattern => {
                if cursor.match_regex(&URL_PIECE, true) {
                    state.phase = match cursor.peek() {
                        Some('*') | Some('#') => Phase::Variable,
                        _ => Phase::Constructor,
                    };
                    return Some(Style::Path);
                }
                Self::error(cursor, state)
            }
            Phase::Variable => {
                if cursor.match_regex(&SINGLE_VAR, true) {
                    state.phase = if cursor.peek() == Some(' ') {
                        Phase::Constructor
                    } else {
                        Phase::UrlPattern
                    };
                    return Some(Style::Atom);
                }
                if cursor.match_regex(&CATCH_ALL_VAR, true) {
                    state.phase = Phase::Constructor;
                    return Some(Style::Atom);
                }
                Self::error(cursor, state)
            }
            Phase::Constructor => {
                if cursor.match_regex(&CONSTRUCTOR, true) {
                    state.phase = Phase::Verb;
                    return Some(Style::Tag);
                }
                Self::error(cursor, state)
            }
            Phase::Verb => {
                if cursor.peek() == Some(':') {
                    state.phase = Phase::UrlPattern;
                    state.just_descended = true;
                    cursor.next();
                    cursor.eat_space();
                    if cursor.eol() {
                        return Some(Style::Variable);
                    }
                    // Trailing garbage after the `:`.
                    return Self::error(cursor, state);
                }
                if cursor.match_regex(&HTTP_VERB, true) {
                    state.phase = Phase::UrlPattern;
                    return Some(Style::Keyword);
                }
                Self::error(cursor, state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::tokenize_line;
    use crate::style::Style;

    fn run(lines: &[&str]) -> Vec<Vec<(String, Option<Style>)>> {
        let mode = RoutesMode;
        let mut state = mode.start_state();
        lines
            .iter()
            .map(|line| {
                tokenize_line(&mode, line, state.as_mut(), 8)
                    .into_iter()
                    .map(|t| (line[t.start..t.end].to_string(), t.style))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_simple_rule() {
        let tokens = &run(&["/ UsersR GET"])[0];
        let styled: Vec<_> = tokens.iter().filter(|(_, s)| s.is_some()).collect();
        assert_eq!(styled[0], &("/".to_string(), Some(Style::Path)));
        assert_eq!(styled[1], &("UsersR".to_string(), Some(Style::Tag)));
        assert_eq!(styled[2], &("GET".to_string(), Some(Style::Keyword)));
    }

    #[test]
    fn test_rule_with_variable() {
        let tokens = &run(&["/user/#Int UserR GET"])[0];
        let styled: Vec<_> = tokens.iter().filter(|(_, s)| s.is_some()).collect();
        assert_eq!(styled[0], &("/user/".to_string(), Some(Style::Path)));
        assert_eq!(styled[1], &("#Int".to_string(), Some(Style::Atom)));
        assert_eq!(styled[2].1, Some(Style::Tag));
        assert_eq!(styled[3].1, Some(Style::Keyword));
    }

    #[test]
    fn test_nested_rules() {
        let lines = run(&["/user/#Int UserR:", "  / UserRootR GET"]);
        let last = lines[0].last().unwrap();
        assert_eq!(last.1, Some(Style::Variable)); // the `:` opener
        let nested: Vec<_> = lines[1].iter().filter(|(_, s)| s.is_some()).collect();
        assert_eq!(nested[0].1, Some(Style::Path));
        assert_eq!(nested[2].1, Some(Style::Keyword));
    }

    #[test]
    fn test_empty_nested_block_is_error() {
        let lines = run(&["/ UserR:", "/ OtherR GET"]);
        // The second rule is not indented, so the promised block is empty.
        assert_eq!(lines[1][0].1, Some(Style::Error));
    }

    #[test]
    fn test_bad_verb_is_error() {
        let lines = run(&["/ UsersR FETCH"]);
        let last = lines[0].last().unwrap();
        assert_eq!(last.1, Some(Style::Error));
    }
}
