//! Colored rectangles (highlight boxes, admonition backgrounds and similar).

use crate::model::link::Link;
use crate::model::position::{Position, Positioned};
use crate::model::textbox::{Color, HorizontalBox};

/// A decorative rectangle with its fill color and covered text.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    /// 1-based number of the rect within its scope (root or chapter)
    pub idx: usize,
    /// Location of the rect
    pub position: Position,
    /// Text covered by the rect, if any
    pub textbox: Option<HorizontalBox>,
    /// Links found in the covered text
    pub links: Vec<Link>,
    /// Fill color, RGB in `[0, 1]`
    pub non_stroking_color: Option<Color>,
    /// Slash-joined identifier chain; assigned during assembly
    pub uid: String,
}

impl Rect {
    /// Create a new rect.
    pub fn new(
        idx: usize,
        position: Position,
        textbox: Option<HorizontalBox>,
        links: Vec<Link>,
        non_stroking_color: Option<Color>,
    ) -> Self {
        Self {
            idx,
            position,
            textbox,
            links,
            non_stroking_color,
            uid: String::new(),
        }
    }

    /// Identifier addressing the rect: `rect.<idx>`.
    pub fn id(&self) -> String {
        format!("rect.{}", self.idx)
    }
}

impl Positioned for Rect {
    fn position(&self) -> &Position {
        &self.position
    }
}
