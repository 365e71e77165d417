//! Collaborator interfaces the extractor consumes.
//!
//! Byte-level PDF parsing, layout analysis (grouping characters into lines
//! and boxes) and table-cell discovery are out of scope for this crate; they
//! are supplied behind the traits in this module. All geometry crossing the
//! boundary uses the PDF standard bottom-left convention, except
//! [`TableGrid`] which keeps the top-down form table finders natively work
//! in.

use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::model::textbox::{Color, HorizontalBox};
use crate::object::{Dictionary, Object, ObjectRef};

/// Metadata of a single page as reported by the PDF parser.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    /// 1-based page number
    pub number: u32,
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// Top edge of the media box; used as the jump-point y for destinations
    /// without an explicit target coordinate (`/Fit` and friends)
    pub media_top: f64,
}

/// A figure box reported by the layout analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureBox {
    /// Bounding box of the figure
    pub bbox: BoundingBox,
}

/// A drawn rectangle reported by the layout analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct RectBox {
    /// Bounding box of the rectangle
    pub bbox: BoundingBox,
    /// Fill color, RGB in `[0, 1]`
    pub non_stroking_color: Option<Color>,
}

/// One object of a page's layout stream.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutObject {
    /// A text box with lines, words and positioned characters
    Text(HorizontalBox),
    /// A figure (image or vector graphics group)
    Figure(FigureBox),
    /// A drawn, usually decorative rectangle
    Rect(RectBox),
}

/// A table candidate found by the table finder.
///
/// Coordinates are in the top-down convention (`(x0, top, x1, bottom)`,
/// origin at the top-left of the page); the extractor converts them through
/// [`BoundingBox::from_topdown`]. A `None` cell marks a spot covered by a
/// merged neighbor.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    /// Table bounding box as `(x0, top, x1, bottom)`
    pub bbox: (f64, f64, f64, f64),
    /// Cell boxes grouped by row, each as `(x0, top, x1, bottom)`
    pub rows: Vec<Vec<Option<(f64, f64, f64, f64)>>>,
}

/// The parsed PDF: object graph, page geometry and layout services.
pub trait PdfSource {
    /// Path the document was read from.
    fn path(&self) -> &str;

    /// Metadata for every page of the document, ascending by page number.
    fn pages(&self) -> &[PageInfo];

    /// The document catalog. Values may be indirect references.
    fn catalog(&self) -> &Dictionary;

    /// The document information dictionary, if present.
    fn info(&self) -> Option<&Dictionary>;

    /// Resolve an indirect object reference.
    fn resolve(&self, reference: ObjectRef) -> Result<Object>;

    /// Map a page object reference to its 1-based page number, if the
    /// reference denotes a page of this document.
    fn page_number_of(&self, reference: ObjectRef) -> Option<u32>;

    /// The raw annotation objects of a page (possibly indirect).
    fn page_annotations(&self, page: u32) -> Result<Vec<Object>>;

    /// Plain text covered by `bbox` on the page.
    fn text_in_bbox(&self, page: u32, bbox: &BoundingBox) -> String;

    /// Characters covered by `bbox` on the page, regrouped into a single
    /// textbox; `None` when the region contains no text.
    fn textbox_in_bbox(&self, page: u32, bbox: &BoundingBox) -> Option<HorizontalBox>;

    /// The layout stream of a page: text boxes, figures and rects.
    fn layout(&self, page: u32) -> &[LayoutObject];
}

/// Table cell geometry discovery.
pub trait TableFinder {
    /// Find table candidates on a page.
    fn find_tables(&self, page: u32) -> Vec<TableGrid>;
}
