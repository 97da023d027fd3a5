//! Integration tests for the registered mode compositions: route tables and
//! template blocks quasiquoted inside host source.

use std::sync::Arc;

use glint::highlight::Highlighter;
use glint::mode::{Mode, ModeConfig, ModeRegistry};
use glint::modes::register_builtins;
use glint::style::Style;

type Line = Vec<(String, Option<Style>)>;

fn registry() -> ModeRegistry {
    let mut registry = ModeRegistry::new();
    register_builtins(&mut registry, ModeConfig::default()).unwrap();
    registry
}

fn styled_lines(mode: Arc<dyn Mode>, text: &str) -> Vec<Line> {
    let mut hl = Highlighter::new(mode, text, 8);
    (0..hl.line_count())
        .map(|i| {
            let line = hl.line(i).to_owned();
            hl.line_tokens(i)
                .into_iter()
                .map(|t| (line[t.start..t.end].to_string(), t.style))
                .collect()
        })
        .collect()
}

fn style_of(line: &Line, needle: &str) -> Option<Style> {
    line.iter()
        .find(|(text, _)| text == needle)
        .unwrap_or_else(|| panic!("no token {needle:?} in {line:?}"))
        .1
}

#[test]
fn test_route_table_inside_host_file() {
    let mode = registry().resolve("yesod").unwrap();
    let text = "mkYesod \"App\" [parseRoutes|\n/ HomeR GET\n/user/#UserId UserR GET\n|]\nmain = pure ()";
    let lines = styled_lines(mode, text);

    assert_eq!(style_of(&lines[0], "[parseRoutes|"), Some(Style::Delimiter));
    assert_eq!(style_of(&lines[1], "/"), Some(Style::Path));
    assert_eq!(style_of(&lines[1], "HomeR"), Some(Style::Tag));
    assert_eq!(style_of(&lines[1], "GET"), Some(Style::Keyword));
    assert_eq!(style_of(&lines[2], "#UserId"), Some(Style::Atom));
    assert_eq!(style_of(&lines[3], "|]"), Some(Style::Delimiter));
    // Back in the host mode after the region closes.
    assert_eq!(style_of(&lines[4], "main"), Some(Style::Variable));
}

#[test]
fn test_template_block_with_interpolation() {
    let mode = registry().resolve("yesod").unwrap();
    let text = "widget = [hamlet|\n<p>Hello #{userName user}!\n|]";
    let lines = styled_lines(mode, text);

    assert_eq!(style_of(&lines[0], "[hamlet|"), Some(Style::Delimiter));
    // Template text is unstyled, the interpolation is host source again.
    assert_eq!(style_of(&lines[1], "<p>Hello "), None);
    assert_eq!(style_of(&lines[1], "#{"), Some(Style::Delimiter));
    assert_eq!(style_of(&lines[1], "userName"), Some(Style::Variable));
    assert_eq!(style_of(&lines[1], "}"), Some(Style::Delimiter));
    assert_eq!(style_of(&lines[1], "!"), None);
    assert_eq!(style_of(&lines[2], "|]"), Some(Style::Delimiter));
}

#[test]
fn test_hamlet_variants_share_one_binding() {
    let mode = registry().resolve("yesod").unwrap();
    // [shamlet| is not covered by the variant pattern; the catch-all quoter
    // binding picks it up with the same delimiter styling.
    for open in ["[hamlet|", "[ihamlet|", "[whamlet|", "[shamlet|"] {
        let text = format!("w = {open}#{{x}}|]");
        let lines = styled_lines(mode.clone(), &text);
        assert_eq!(style_of(&lines[0], open), Some(Style::Delimiter), "{open}");
        if open == "[shamlet|" {
            assert_eq!(style_of(&lines[0], "#{x}"), None, "{open}");
        } else {
            assert_eq!(style_of(&lines[0], "#{"), Some(Style::Delimiter), "{open}");
            assert_eq!(style_of(&lines[0], "x"), Some(Style::Variable), "{open}");
        }
    }
}

#[test]
fn test_unknown_quoter_falls_back_to_plain() {
    let mode = registry().resolve("yesod").unwrap();
    let lines = styled_lines(mode, "x = [myQuoter|anything :: here|]");
    assert_eq!(style_of(&lines[0], "[myQuoter|"), Some(Style::Delimiter));
    assert_eq!(style_of(&lines[0], "anything :: here"), None);
    assert_eq!(style_of(&lines[0], "|]"), Some(Style::Delimiter));
}

#[test]
fn test_host_state_resumes_after_region() {
    let mode = registry().resolve("yesod").unwrap();
    // The do-block scope opened before the quasiquote still governs
    // indentation-based classification after it closes.
    let text = "main = do\n  run [julius|console.log(1)|]\n  next";
    let lines = styled_lines(mode, text);
    assert_eq!(style_of(&lines[1], "run"), Some(Style::Variable));
    assert_eq!(style_of(&lines[1], "console.log(1)"), None);
    assert_eq!(style_of(&lines[2], "next"), Some(Style::Variable));
}
