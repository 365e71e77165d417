//! Positions of elements and cells on a page.

use crate::geometry::BoundingBox;

/// The location of an element or table cell: a bounding box on a page.
///
/// Coordinates follow the PDF standard convention (origin bottom-left, see
/// [`crate::geometry`]). A position always refers to exactly one page by its
/// 1-based number.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Distance from the left of the page to the left edge of the box
    pub x0: f64,
    /// Distance from the bottom of the page to the lower edge of the box
    pub y0: f64,
    /// Distance from the left of the page to the right edge of the box
    pub x1: f64,
    /// Distance from the bottom of the page to the upper edge of the box
    pub y1: f64,
    /// 1-based number of the page the box lies on
    pub page: u32,
}

impl Position {
    /// Create a position from corner coordinates and a page number.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, page: u32) -> Self {
        Self { x0, y0, x1, y1, page }
    }

    /// Create a position from a bounding box and a page number.
    pub fn from_bbox(bbox: BoundingBox, page: u32) -> Self {
        Self::new(bbox.x0, bbox.y0, bbox.x1, bbox.y1, page)
    }

    /// The bounding box of the position.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x0, self.y0, self.x1, self.y1)
    }

    /// Check whether the jump-target coordinate `(x, y)` on `page` hits this
    /// position.
    ///
    /// Jump targets conventionally point at the top-left of the element they
    /// mean, but often land above or left of the element's box. The test
    /// therefore extends the box leftwards and upwards by `tolerance`:
    /// the coordinate is contained when
    /// `x1 > x >= x0 - tolerance` and `y1 + tolerance > y >= y0`.
    pub fn contains_target(&self, page: u32, x: f64, y: f64, tolerance: f64) -> bool {
        page == self.page
            && self.x1 > x
            && x >= self.x0 - tolerance
            && self.y1 + tolerance > y
            && y >= self.y0
    }
}

/// Access to the position of an element-like value.
///
/// Implemented by every element variant and used by the post-processing
/// passes that only care about where something sits on a page.
pub trait Positioned {
    /// The position of the value.
    fn position(&self) -> &Position;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_target_top_left_tolerance() {
        let pos = Position::new(100.0, 500.0, 300.0, 550.0, 4);
        // exact top-left corner
        assert!(pos.contains_target(4, 100.0, 550.0, 65.0));
        // left of the box, within tolerance
        assert!(pos.contains_target(4, 40.0, 540.0, 65.0));
        // above the box, within tolerance
        assert!(pos.contains_target(4, 150.0, 610.0, 65.0));
        // too far left
        assert!(!pos.contains_target(4, 34.0, 540.0, 65.0));
        // below the box is never contained
        assert!(!pos.contains_target(4, 150.0, 499.0, 65.0));
        // wrong page
        assert!(!pos.contains_target(3, 150.0, 540.0, 65.0));
    }

    #[test]
    fn test_bbox_round_trip() {
        let pos = Position::from_bbox(BoundingBox::new(1.0, 2.0, 3.0, 4.0), 7);
        assert_eq!(pos.bbox(), BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(pos.page, 7);
    }
}
