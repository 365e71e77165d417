//! Chapters extracted from the PDF outline.

use crate::model::element::Element;
use crate::model::position::{Position, Positioned};
use crate::model::textbox::HorizontalBox;

/// A chapter of the document, bound to an outline entry.
///
/// Chapters define the document structure: every element at or below the
/// chapter headline ends up in its ordered `content` list, sub-chapters
/// included. A chapter commonly spans several pages but aggregates only one
/// position; the end of a chapter is given by the start of the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// Chapter title as extracted from the outline (number prefix stripped)
    pub title: String,
    /// Chapter number as string, e.g. `3.2.4`, or a virtual number like
    /// `virt.1.2` when neither outline nor page carries a printed number
    pub number: String,
    /// Location of the chapter headline (or the ghost rectangle)
    pub position: Position,
    /// The headline textbox; `None` for ghost chapters
    pub textbox: Option<HorizontalBox>,
    /// Ordered elements belonging to the chapter, sub-chapters included
    pub content: Vec<Element>,
    /// Slash-joined identifier chain from the outermost chapter; assigned
    /// during assembly
    pub uid: String,
}

impl Chapter {
    /// Create a chapter with empty content.
    pub fn new(
        title: impl Into<String>,
        number: impl Into<String>,
        position: Position,
        textbox: Option<HorizontalBox>,
    ) -> Self {
        Self {
            title: title.into(),
            number: number.into(),
            position,
            textbox,
            content: Vec::new(),
            uid: String::new(),
        }
    }

    /// Identifier addressing the chapter: `chapter.<number>`.
    pub fn id(&self) -> String {
        format!("chapter.{}", self.number)
    }

    /// Whether the chapter was synthesized because no textbox matched the
    /// outline entry.
    pub fn is_ghost(&self) -> bool {
        self.textbox.is_none()
    }
}

impl Positioned for Chapter {
    fn position(&self) -> &Position {
        &self.position
    }
}
