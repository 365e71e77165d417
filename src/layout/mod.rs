//! Layout post-processing.
//!
//! The layout analyzer delivers a per-page stream of text boxes, figure
//! boxes and drawn rectangles. The modules here clean that stream up before
//! element construction: undersized and duplicate figures are dropped, text
//! boxes inside figures/tables/rects are excluded, and repeating
//! header/footer elements are detected and removed.

pub mod exclusion;
pub mod figure_filter;
pub mod header_footer;

use crate::config::Margins;
use crate::geometry::BoundingBox;
use crate::model::textbox::HorizontalBox;
use crate::source::LayoutObject;

/// Split a page's layout stream into its three object classes.
pub fn partition_layout(
    objects: &[LayoutObject],
) -> (
    Vec<HorizontalBox>,
    Vec<crate::source::FigureBox>,
    Vec<crate::source::RectBox>,
) {
    let mut texts = Vec::new();
    let mut figures = Vec::new();
    let mut rects = Vec::new();
    for object in objects {
        match object {
            LayoutObject::Text(tb) => texts.push(tb.clone()),
            LayoutObject::Figure(f) => figures.push(f.clone()),
            LayoutObject::Rect(r) => rects.push(r.clone()),
        }
    }
    (texts, figures, rects)
}

/// Apply the fixed page-crop margins: boxes reaching into the cropped
/// margins are discarded entirely.
pub fn apply_page_crop(
    boxes: Vec<HorizontalBox>,
    margins: &Margins,
    page_width: f64,
    page_height: f64,
) -> Vec<HorizontalBox> {
    if *margins == Margins::default() {
        return boxes;
    }
    boxes
        .into_iter()
        .filter(|tb| {
            let bbox = tb.bbox();
            bbox.y1 < page_height - margins.top
                && bbox.y0 > margins.bottom
                && bbox.x0 > margins.left
                && bbox.x1 < page_width - margins.right
        })
        .collect()
}

/// The vertical crop region used for figure extraction: top and bottom
/// margins only.
pub fn vertical_crop_region(margins: &Margins, page_width: f64, page_height: f64) -> BoundingBox {
    BoundingBox::new(0.0, margins.bottom, page_width, page_height - margins.top)
}
