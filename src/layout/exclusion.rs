//! Textbox exclusion.
//!
//! Text inside tables is re-extracted per cell and text inside figures and
//! rects is attached to those elements, so the corresponding text boxes must
//! not additionally become paragraphs. A text box is excluded when it lies
//! fully inside any table/figure/rect box expanded by the table margin.

use crate::geometry::BoundingBox;
use crate::model::textbox::HorizontalBox;

/// Keep only text boxes not fully covered by any expanded region.
pub fn exclude_covered_textboxes(
    boxes: Vec<HorizontalBox>,
    regions: &[BoundingBox],
    margin: f64,
) -> Vec<HorizontalBox> {
    if regions.is_empty() {
        return boxes;
    }
    boxes
        .into_iter()
        .filter(|tb| {
            let bbox = tb.bbox();
            !regions
                .iter()
                .any(|region| region.expand(margin, margin).encloses(&bbox))
        })
        .collect()
}

/// Drop whitespace-only boxes and strip a single trailing newline from the
/// last line of each kept box.
pub fn drop_noise_boxes(boxes: Vec<HorizontalBox>) -> Vec<HorizontalBox> {
    boxes
        .into_iter()
        .filter_map(|mut tb| {
            if tb.text().trim().is_empty() {
                return None;
            }
            strip_trailing_newline(&mut tb);
            Some(tb)
        })
        .collect()
}

fn strip_trailing_newline(tb: &mut HorizontalBox) {
    if let Some(line) = tb.lines.last_mut() {
        if let Some(word) = line.words.last_mut() {
            if word.chars.last().is_some_and(|c| c.text == '\n') {
                word.chars.pop();
                if word.chars.is_empty() {
                    line.words.pop();
                }
            }
        }
    }
}
