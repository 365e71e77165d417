//! Paragraphs of normal text.

use crate::model::link::Link;
use crate::model::position::{Position, Positioned};
use crate::model::textbox::HorizontalBox;

/// A paragraph of body text. Paragraphs never cross page boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// 1-based number of the paragraph within its scope (root or chapter)
    pub idx: usize,
    /// Location of the paragraph
    pub position: Position,
    /// The paragraph text with layout structure
    pub textbox: HorizontalBox,
    /// Links covering character ranges of the paragraph text
    pub links: Vec<Link>,
    /// Slash-joined identifier chain; assigned during assembly
    pub uid: String,
}

impl Paragraph {
    /// Create a new paragraph.
    pub fn new(idx: usize, position: Position, textbox: HorizontalBox, links: Vec<Link>) -> Self {
        Self {
            idx,
            position,
            textbox,
            links,
            uid: String::new(),
        }
    }

    /// Identifier addressing the paragraph: `paragraph.<idx>`.
    pub fn id(&self) -> String {
        format!("paragraph.{}", self.idx)
    }

    /// Flat text of the paragraph.
    pub fn text(&self) -> String {
        self.textbox.text()
    }
}

impl Positioned for Paragraph {
    fn position(&self) -> &Position {
        &self.position
    }
}
