//! The polymorphic element type.

use crate::model::chapter::Chapter;
use crate::model::figure::Figure;
use crate::model::link::Link;
use crate::model::paragraph::Paragraph;
use crate::model::position::{Position, Positioned};
use crate::model::rect::Rect;
use crate::model::table::Table;

/// A content element of the document tree.
///
/// Every element has exactly one parent: either the root content list or one
/// chapter's content list. The variant determines the identifier pattern
/// (`chapter.<number>`, `paragraph.<idx>`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A chapter with nested content
    Chapter(Chapter),
    /// A paragraph of body text
    Paragraph(Paragraph),
    /// A table with cells
    Table(Table),
    /// A figure
    Figure(Figure),
    /// A colored rectangle
    Rect(Rect),
}

impl Element {
    /// The lowercase type name of the element.
    pub fn element_type(&self) -> &'static str {
        match self {
            Element::Chapter(_) => "chapter",
            Element::Paragraph(_) => "paragraph",
            Element::Table(_) => "table",
            Element::Figure(_) => "figure",
            Element::Rect(_) => "rect",
        }
    }

    /// Identifier of the element within its scope.
    pub fn id(&self) -> String {
        match self {
            Element::Chapter(c) => c.id(),
            Element::Paragraph(p) => p.id(),
            Element::Table(t) => t.id(),
            Element::Figure(f) => f.id(),
            Element::Rect(r) => r.id(),
        }
    }

    /// The slash-joined identifier chain from the outermost chapter down to
    /// this element. Equals [`Element::id`] for root-level elements.
    pub fn uid(&self) -> &str {
        match self {
            Element::Chapter(c) => &c.uid,
            Element::Paragraph(p) => &p.uid,
            Element::Table(t) => &t.uid,
            Element::Figure(f) => &f.uid,
            Element::Rect(r) => &r.uid,
        }
    }

    pub(crate) fn set_uid(&mut self, uid: String) {
        match self {
            Element::Chapter(c) => c.uid = uid,
            Element::Paragraph(p) => p.uid = uid,
            Element::Table(t) => t.uid = uid,
            Element::Figure(f) => f.uid = uid,
            Element::Rect(r) => r.uid = uid,
        }
    }

    /// The nested content of the element; non-empty only for chapters.
    pub fn content(&self) -> &[Element] {
        match self {
            Element::Chapter(c) => &c.content,
            _ => &[],
        }
    }

    /// All links carried by the element itself (cell links live on the
    /// cells, see [`Table::cells`]).
    pub fn links(&self) -> &[Link] {
        match self {
            Element::Chapter(_) => &[],
            Element::Paragraph(p) => &p.links,
            Element::Table(_) => &[],
            Element::Figure(f) => &f.links,
            Element::Rect(r) => &r.links,
        }
    }
}

impl Positioned for Element {
    fn position(&self) -> &Position {
        match self {
            Element::Chapter(c) => &c.position,
            Element::Paragraph(p) => &p.position,
            Element::Table(t) => &t.position,
            Element::Figure(f) => &f.position,
            Element::Rect(r) => &r.position,
        }
    }
}
