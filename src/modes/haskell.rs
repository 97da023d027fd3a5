//! Whitespace-significant tokenizer mode (Haskell surface syntax).
//!
//! This is the reference single-mode tokenizer of the engine. Scanning is
//! resumable at any token boundary: the persisted state carries an explicit
//! continuation tag plus the stack of open indentation scopes.
//!
//! Continuations
//!
//!     State transitions are a tagged enum dispatched at the top of each
//!     token call, not chained closures. A multi-line construct (block
//!     comment, string with a gap) parks its continuation in the state and
//!     the next call, possibly on the next line, resumes there.
//!
//! Indentation scopes
//!
//!     Layout keywords (`let`, `where`, `of`, `do`) open a block scope one
//!     indent unit past the current line's indentation. The scope is carried
//!     as a *block-start* scope until the block's first token anchors its
//!     real offset; from then on it closes by dedent like any other scope.
//!     At the start of an under-indented line the innermost scopes that the
//!     dedent closes are popped. While leading whitespace of an indented
//!     line is consumed, an indent marker is emitted each time the cursor
//!     lands exactly on an open scope's offset, which is what lets the
//!     renderer draw indent guides.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::mode::{state_mut, state_ref, Indent, Mode, ModeConfig, ModeState};
use crate::stream::{is_line_whitespace, StreamCursor};
use crate::style::{ScopeKind, Style};

pub const MODE_NAME: &str = "haskell";

/// Tokens that open an implicit block.
const LAYOUT_KEYWORDS: [&str; 4] = ["let", "where", "of", "do"];

/// Reserved words and reserved operators. Whenever the exact text consumed
/// by a token matches an entry, the keyword style wins over the generic
/// classification.
static WELL_KNOWN: Lazy<HashMap<&'static str, Style>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for word in [
        "case", "class", "data", "default", "deriving", "do", "else", "foreign", "if", "import",
        "in", "infix", "infixl", "infixr", "instance", "let", "module", "newtype", "of", "then",
        "type", "where", "_",
    ] {
        map.insert(word, Style::Keyword);
    }
    for op in ["..", ":", "::", "=", "\\", "<-", "->", "@", "~", "=>"] {
        map.insert(op, Style::Keyword);
    }
    map
});

fn is_small(ch: char) -> bool {
    ch == '_' || ch.is_lowercase()
}

fn is_large(ch: char) -> bool {
    ch.is_uppercase()
}

fn is_ident(ch: char) -> bool {
    ch == '\'' || ch == '_' || ch.is_alphanumeric()
}

fn is_special(ch: char) -> bool {
    matches!(ch, '(' | ')' | ',' | ';' | '[' | ']' | '`' | '{' | '}')
}

/// Characters that legal operators are built from. ASCII gets the explicit
/// Haskell symbol set; outside ASCII any non-alphanumeric, non-reserved
/// printable character counts.
fn is_symbol(ch: char) -> bool {
    if ch.is_ascii() {
        matches!(
            ch,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '*'
                | '+'
                | '.'
                | '/'
                | '<'
                | '='
                | '>'
                | '?'
                | '@'
                | '\\'
                | '^'
                | '|'
                | '-'
                | '~'
                | ':'
        )
    } else {
        !ch.is_alphanumeric()
            && !ch.is_whitespace()
            && !is_special(ch)
            && !matches!(ch, '_' | '"' | '\'')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentKind {
    Comment,
    /// `{-# ... #-}` pragma.
    Pragma,
}

impl CommentKind {
    fn style(self) -> Style {
        match self {
            CommentKind::Comment => Style::Comment,
            CommentKind::Pragma => Style::Meta,
        }
    }
}

/// What the next token call resumes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cont {
    Normal,
    BlockComment { kind: CommentKind, depth: u32 },
    StringLit,
    StringGap,
    /// A layout keyword was seen; the next token anchors the block's offset.
    PendingBlock,
}

/// One open indentation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scope {
    offset: usize,
    kind: ScopeKind,
    /// Block opened by a layout keyword whose body has not anchored yet.
    starts_block: bool,
    /// Indent suggestion only; drives `indent()` but emits no markers.
    suggestion: bool,
}

impl Scope {
    fn plain(offset: usize) -> Scope {
        Scope {
            offset,
            kind: ScopeKind::Plain,
            starts_block: false,
            suggestion: false,
        }
    }

    fn block(offset: usize) -> Scope {
        Scope {
            offset,
            kind: ScopeKind::Block,
            starts_block: false,
            suggestion: false,
        }
    }
}

/// Persisted per-line state. Innermost scope first.
#[derive(Debug, Clone)]
pub struct HaskellState {
    cont: Cont,
    scopes: Vec<Scope>,
    /// Indentation column recorded at the start of the current line.
    indentation: usize,
}

/// The whitespace-significant example mode.
pub struct HaskellMode {
    config: ModeConfig,
}

impl HaskellMode {
    pub fn new(config: ModeConfig) -> Self {
        HaskellMode { config }
    }

    /// Insert a scope keeping the stack ordered by offset, innermost first.
    /// An anchored block scope already sitting at the same offset is kept in
    /// preference to the new entry; an equal-offset non-block entry is
    /// replaced. If every open scope is deeper than the new offset the entry
    /// is dropped.
    fn push_scope(&self, state: &mut HaskellState, scope: Scope) {
        if state.scopes.is_empty() {
            state.scopes.push(scope);
            return;
        }
        for i in 0..state.scopes.len() {
            if state.scopes[i].offset <= scope.offset {
                let exists = state.scopes[i].offset == scope.offset;
                let keep_block = exists
                    && state.scopes[i].kind == ScopeKind::Block
                    && !state.scopes[i].starts_block;
                if !keep_block {
                    if exists {
                        state.scopes[i] = scope;
                    } else {
                        state.scopes.insert(i, scope);
                    }
                }
                return;
            }
        }
    }

    fn normal(&self, cursor: &mut StreamCursor<'_>, state: &mut HaskellState) -> Option<Style> {
        let mut column = cursor.column();
        if column == 0 {
            let indentation = cursor.indentation();
            state.indentation = indentation;
            // Pop the scopes this line's dedent closes. A block-start scope
            // always survives and anchors to the current indentation.
            while let Some(top) = state.scopes.first().copied() {
                if top.starts_block {
                    state.scopes[0] = Scope::block(indentation);
                    break;
                } else if indentation >= top.offset {
                    break;
                }
                state.scopes.remove(0);
            }
        }

        if cursor.peek().is_some_and(is_line_whitespace) {
            if column < state.indentation {
                // Walk open scopes outermost-in, consuming whitespace up to
                // each offset and emitting a marker when we land on one.
                for i in (0..state.scopes.len()).rev() {
                    let scope = state.scopes[i];
                    while column < scope.offset {
                        if cursor.eat(is_line_whitespace).is_none() {
                            break;
                        }
                        column = cursor.column();
                    }
                    if cursor.current().is_empty() {
                        continue;
                    }
                    if column == scope.offset
                        && column != 0
                        && cursor.peek().is_some_and(is_line_whitespace)
                    {
                        if !scope.suggestion {
                            return Some(Style::Indent {
                                column,
                                kind: scope.kind,
                                closing: false,
                            });
                        }
                    } else if column + 1 == scope.offset && scope.kind == ScopeKind::Block {
                        // One column short of a block offset ends that
                        // block's indent; the line re-opens a plain scope at
                        // its own indentation.
                        self.push_scope(state, Scope::plain(state.indentation));
                        if scope.suggestion {
                            return None;
                        }
                        return Some(Style::Indent {
                            column,
                            kind: ScopeKind::Block,
                            closing: true,
                        });
                    }
                }
                // Past every open offset: record a plain scope at this
                // line's indentation and close the indent run.
                if cursor.eat_space() || !cursor.current().is_empty() {
                    self.push_scope(state, Scope::plain(state.indentation));
                    let column = cursor.column();
                    return Some(Style::Indent {
                        column,
                        kind: ScopeKind::Plain,
                        closing: true,
                    });
                }
            }
            if cursor.eat_space() {
                return None;
            }
        }

        for keyword in LAYOUT_KEYWORDS {
            if cursor.match_str(keyword, true) {
                if cursor.eol() || cursor.peek().is_some_and(is_line_whitespace) {
                    let offset = state.indentation + self.config.indent_unit;
                    self.push_scope(
                        state,
                        Scope {
                            offset,
                            kind: ScopeKind::Block,
                            starts_block: true,
                            suggestion: false,
                        },
                    );
                    state.cont = Cont::PendingBlock;
                    return Some(Style::Variable);
                }
                // Prefix of a longer identifier; rewind and classify below.
                cursor.back_up(keyword.chars().count());
                break;
            }
        }

        let ch = match cursor.peek() {
            Some(ch) => ch,
            None => return None,
        };

        if cursor.eat(is_special).is_some() {
            if ch == '{' && cursor.eat_char('-') {
                let kind = if cursor.eat_char('#') {
                    CommentKind::Pragma
                } else {
                    CommentKind::Comment
                };
                return self.block_comment(cursor, state, kind, 1);
            }
            return None;
        }

        if cursor.eat_char('\'') {
            if cursor.eat_char('\\') {
                cursor.next(); // one escape character of lookahead
            } else {
                cursor.next();
            }
            if cursor.eat_char('\'') {
                return Some(Style::Str);
            }
            return Some(Style::Error);
        }

        if cursor.eat_char('"') {
            state.cont = Cont::StringLit;
            return self.string_literal(cursor, state);
        }

        if cursor.eat(is_large).is_some() {
            if self.eat_qualifier(cursor) {
                return Some(Style::Qualifier);
            }
            cursor.eat_while(is_ident);
            return Some(Style::TypeName);
        }

        if cursor.eat(is_small).is_some() {
            cursor.eat_while(is_ident);
            return Some(Style::Variable);
        }

        if ch.is_ascii_digit() {
            cursor.eat_while(|c| c.is_ascii_digit());
            if ch == '0' {
                if cursor.eat(|c| matches!(c, 'x' | 'X')).is_some() {
                    cursor.eat_while(|c| c.is_ascii_hexdigit());
                    return Some(Style::Number);
                }
                if cursor.eat(|c| matches!(c, 'o' | 'O')).is_some() {
                    cursor.eat_while(|c| matches!(c, '0'..='7'));
                    return Some(Style::Number);
                }
            }
            if cursor.eat_char('.') {
                cursor.eat_while(|c| c.is_ascii_digit());
            }
            if cursor.eat(|c| matches!(c, 'e' | 'E')).is_some() {
                cursor.eat(|c| matches!(c, '+' | '-'));
                cursor.eat_while(|c| c.is_ascii_digit());
            }
            return Some(Style::Number);
        }

        if cursor.eat(is_symbol).is_some() {
            if ch == '-' && cursor.eat_char('-') {
                cursor.eat_while(|c| c == '-');
                // A dash run is a line comment unless the next character
                // makes it a longer operator.
                if !cursor.peek().is_some_and(is_symbol) {
                    cursor.skip_to_end();
                    return Some(Style::Comment);
                }
            }
            let style = if ch == ':' {
                Style::TypeOperator
            } else {
                Style::Operator
            };
            cursor.eat_while(is_symbol);
            if cursor.eol() {
                // An operator ending the line suggests continuing one
                // indent unit deeper.
                self.push_scope(
                    state,
                    Scope {
                        offset: state.indentation + self.config.indent_unit,
                        kind: ScopeKind::Plain,
                        starts_block: false,
                        suggestion: true,
                    },
                );
            }
            return Some(style);
        }

        cursor.next();
        Some(Style::Error)
    }

    /// After an uppercase start, consume a dotted module prefix if the
    /// identifier run ends with a dot (`Data.Map.` of `Data.Map.lookup`).
    fn eat_qualifier(&self, cursor: &mut StreamCursor<'_>) -> bool {
        let start = cursor.pos();
        let rest = &cursor.line()[start..];
        let mut run_len = 0;
        for (i, ch) in rest.char_indices() {
            if is_ident(ch) || ch == '.' {
                run_len = i + ch.len_utf8();
            } else {
                break;
            }
        }
        match rest[..run_len].rfind('.') {
            Some(dot) => {
                let target = start + dot + 1;
                while cursor.pos() < target {
                    cursor.next();
                }
                true
            }
            None => false,
        }
    }

    fn block_comment(
        &self,
        cursor: &mut StreamCursor<'_>,
        state: &mut HaskellState,
        kind: CommentKind,
        mut depth: u32,
    ) -> Option<Style> {
        while let Some(ch) = cursor.next() {
            if ch == '{' && cursor.eat_char('-') {
                depth += 1;
            } else if ch == '-' && cursor.eat_char('}') {
                depth -= 1;
                if depth == 0 {
                    state.cont = Cont::Normal;
                    return Some(kind.style());
                }
            }
        }
        // Still open at end of line; resume here on the next one.
        state.cont = Cont::BlockComment { kind, depth };
        Some(kind.style())
    }

    fn string_literal(
        &self,
        cursor: &mut StreamCursor<'_>,
        state: &mut HaskellState,
    ) -> Option<Style> {
        while let Some(ch) = cursor.next() {
            match ch {
                '"' => {
                    state.cont = Cont::Normal;
                    return Some(Style::Str);
                }
                '\\' => {
                    if cursor.eol() || cursor.eat(is_line_whitespace).is_some() {
                        state.cont = Cont::StringGap;
                        return Some(Style::Str);
                    }
                    if !cursor.eat_char('&') {
                        cursor.next(); // one escape character of lookahead
                    }
                }
                _ => {}
            }
        }
        // Unterminated without a continuation backslash.
        state.cont = Cont::Normal;
        Some(Style::Error)
    }

    fn string_gap(
        &self,
        cursor: &mut StreamCursor<'_>,
        state: &mut HaskellState,
    ) -> Option<Style> {
        cursor.eat_space();
        if cursor.eat_char('\\') {
            state.cont = Cont::StringLit;
            return self.string_literal(cursor, state);
        }
        if cursor.eol() {
            // Whitespace-only remainder; the gap spans into the next line.
            return Some(Style::Str);
        }
        cursor.next();
        state.cont = Cont::Normal;
        Some(Style::Error)
    }

    fn pending_block(
        &self,
        cursor: &mut StreamCursor<'_>,
        state: &mut HaskellState,
    ) -> Option<Style> {
        if cursor.column() == 0 {
            // Block body starts on its own line; the line-start scope pop
            // anchors the block-start scope.
            state.cont = Cont::Normal;
            return self.normal(cursor, state);
        }
        cursor.eat_space();
        if !cursor.eol() {
            // As in `f = do     bar`: the block starts where bar starts.
            if !state.scopes.is_empty() {
                state.scopes.remove(0);
            }
            let column = cursor.column();
            state.cont = Cont::Normal;
            self.push_scope(state, Scope::block(column));
        }
        None
    }
}

impl Mode for HaskellMode {
    fn name(&self) -> &'static str {
        MODE_NAME
    }

    fn start_state(&self) -> Box<dyn ModeState> {
        Box::new(HaskellState {
            cont: Cont::Normal,
            scopes: vec![Scope::plain(0)],
            indentation: 0,
        })
    }

    fn token(&self, cursor: &mut StreamCursor<'_>, state: &mut dyn ModeState) -> Option<Style> {
        let state = state_mut::<HaskellState>(state, MODE_NAME);
        let style = match state.cont {
            Cont::Normal => self.normal(cursor, state),
            Cont::BlockComment { kind, depth } => self.block_comment(cursor, state, kind, depth),
            Cont::StringLit => self.string_literal(cursor, state),
            Cont::StringGap => self.string_gap(cursor, state),
            Cont::PendingBlock => self.pending_block(cursor, state),
        };
        // Exact-match reserved words and operators override the generic
        // identifier/operator classification.
        if matches!(
            style,
            Some(Style::Variable | Style::TypeName | Style::Operator | Style::TypeOperator)
        ) {
            if let Some(&keyword) = WELL_KNOWN.get(cursor.current()) {
                return Some(keyword);
            }
        }
        style
    }

    fn indent(&self, state: &dyn ModeState) -> Indent {
        let state = state_ref::<HaskellState>(state, MODE_NAME);
        match state.scopes.first() {
            Some(scope) => Indent::Column(scope.offset),
            None => Indent::Default,
        }
    }
}
