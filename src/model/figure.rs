//! Figures: bitmap images or vector graphics, possibly with overlaying text.

use crate::model::link::Link;
use crate::model::position::{Position, Positioned};
use crate::model::textbox::HorizontalBox;

/// A figure on a page.
///
/// The text boxes completely inside the figure area are attached as
/// `textboxes`; their layout is not further analyzed, the reading flow is
/// top-left to bottom-right. `rel_path` names the file an exporter would
/// write the figure image to.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// 1-based number of the figure within its scope (root or chapter)
    pub idx: usize,
    /// Location of the figure
    pub position: Position,
    /// Path of the exported figure image
    pub rel_path: String,
    /// Text boxes lying completely inside the figure area
    pub textboxes: Vec<HorizontalBox>,
    /// Links found in the contained text boxes
    pub links: Vec<Link>,
    /// Caption text near the figure, when known
    pub caption: Option<String>,
    /// Slash-joined identifier chain; assigned during assembly
    pub uid: String,
}

impl Figure {
    /// Create a new figure.
    pub fn new(
        idx: usize,
        position: Position,
        rel_path: String,
        textboxes: Vec<HorizontalBox>,
        links: Vec<Link>,
    ) -> Self {
        Self {
            idx,
            position,
            rel_path,
            textboxes,
            links,
            caption: None,
            uid: String::new(),
        }
    }

    /// Identifier addressing the figure: `figure.<idx>`.
    pub fn id(&self) -> String {
        format!("figure.{}", self.idx)
    }

    /// Flat text of all contained text boxes, joined by newlines.
    pub fn text(&self) -> String {
        self.textboxes
            .iter()
            .map(|t| t.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Positioned for Figure {
    fn position(&self) -> &Position {
        &self.position
    }
}
