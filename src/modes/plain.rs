//! Pass-through mode: consumes whole lines, styles nothing.
//!
//! Used as the payload for delimited regions whose body has no grammar of
//! its own (unrecognized quasiquote kinds fall back to this).

use crate::mode::{Mode, ModeState};
use crate::stream::StreamCursor;
use crate::style::Style;

pub const MODE_NAME: &str = "plain";

#[derive(Debug, Clone)]
pub struct PlainState;

pub struct PlainMode;

impl Mode for PlainMode {
    fn name(&self) -> &'static str {
        MODE_NAME
    }

    fn start_state(&self) -> Box<dyn ModeState> {
        Box::new(PlainState)
    }

    fn token(&self, cursor: &mut StreamCursor<'_>, _state: &mut dyn ModeState) -> Option<Style> {
        cursor.skip_to_end();
        None
    }
}
