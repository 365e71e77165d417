//! Geometric primitives for layout post-processing.
//!
//! All coordinates are floats in PDF points (72 points = 1 inch) using the
//! PDF standard convention: origin at the bottom-left of the page, y growing
//! upwards. The "top-down" convention (origin top-left, used by table
//! finders and page croppers) is reachable through [`BoundingBox::to_topdown`]
//! and [`BoundingBox::from_topdown`].

/// An axis-aligned rectangle given by its corner coordinates.
///
/// `(x0, y0)` is the bottom-left corner, `(x1, y1)` the top-right corner,
/// so `x0 <= x1` and `y0 <= y1` for well-formed boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Distance from the left of the page to the left edge of the box
    pub x0: f64,
    /// Distance from the bottom of the page to the lower edge of the box
    pub y0: f64,
    /// Distance from the left of the page to the right edge of the box
    pub x1: f64,
    /// Distance from the bottom of the page to the upper edge of the box
    pub y1: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Convert a top-down rectangle `(x0, top, x1, bottom)` into the PDF
    /// standard bottom-left convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_doctree::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::from_topdown(10.0, 42.0, 110.0, 92.0, 842.0);
    /// assert_eq!(bbox, BoundingBox::new(10.0, 750.0, 110.0, 800.0));
    /// ```
    pub fn from_topdown(x0: f64, top: f64, x1: f64, bottom: f64, page_height: f64) -> Self {
        Self {
            x0,
            y0: page_height - bottom,
            x1,
            y1: page_height - top,
        }
    }

    /// Convert this box into the top-down convention, returning
    /// `(x0, top, x1, bottom)`.
    ///
    /// Inverse of [`BoundingBox::from_topdown`]; no precision is lost beyond
    /// plain `f64` arithmetic.
    pub fn to_topdown(&self, page_height: f64) -> (f64, f64, f64, f64) {
        (self.x0, page_height - self.y1, self.x1, page_height - self.y0)
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check whether `inner` lies completely inside this box.
    ///
    /// The comparison is strict on all four edges; a box sharing an edge with
    /// the outer box is not considered contained. This is the test used for
    /// "completely inside" decisions like textbox exclusion and chapter
    /// candidate selection.
    pub fn contains(&self, inner: &BoundingBox) -> bool {
        inner.x0 > self.x0 && inner.y0 > self.y0 && inner.x1 < self.x1 && inner.y1 < self.y1
    }

    /// Check whether `inner` lies inside this box, edges included.
    ///
    /// Non-strict variant of [`BoundingBox::contains`], used by the figure
    /// filter where identical boxes count as containment.
    pub fn encloses(&self, inner: &BoundingBox) -> bool {
        inner.x0 >= self.x0 && inner.y0 >= self.y0 && inner.x1 <= self.x1 && inner.y1 <= self.y1
    }

    /// Standard axis-aligned intersection test. Touching edges intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.x0 > other.x1 || self.x1 < other.x0 || self.y0 > other.y1 || self.y1 < other.y0)
    }

    /// Grow the box by `dx` horizontally and `dy` vertically in all directions.
    pub fn expand(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(self.x0 - dx, self.y0 - dy, self.x1 + dx, self.y1 + dy)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_topdown_round_trip() {
        let bbox = BoundingBox::new(72.0, 650.0, 540.0, 720.0);
        let (x0, top, x1, bottom) = bbox.to_topdown(842.0);
        assert_eq!(BoundingBox::from_topdown(x0, top, x1, bottom, 842.0), bbox);
    }

    #[test]
    fn test_contains_is_strict() {
        let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&BoundingBox::new(10.0, 10.0, 90.0, 90.0)));
        // shared edge does not count
        assert!(!outer.contains(&BoundingBox::new(0.0, 10.0, 90.0, 90.0)));
        assert!(!outer.contains(&outer));
    }

    #[test]
    fn test_encloses_includes_edges() {
        let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.encloses(&outer));
        assert!(outer.encloses(&BoundingBox::new(0.0, 10.0, 90.0, 90.0)));
        assert!(!outer.encloses(&BoundingBox::new(-1.0, 10.0, 90.0, 90.0)));
    }

    #[test]
    fn test_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        let b = BoundingBox::new(40.0, 40.0, 90.0, 90.0);
        let c = BoundingBox::new(60.0, 60.0, 90.0, 90.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        // touching edges count as intersection
        let d = BoundingBox::new(50.0, 0.0, 80.0, 50.0);
        assert!(a.intersects(&d));
    }

    #[test]
    fn test_union_and_area() {
        let a = BoundingBox::new(0.0, 0.0, 50.0, 40.0);
        let b = BoundingBox::new(25.0, 25.0, 75.0, 80.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(0.0, 0.0, 75.0, 80.0));
        assert_eq!(a.area(), 2000.0);
    }

    #[test]
    fn test_expand() {
        let a = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(a.expand(3.0, 4.0), BoundingBox::new(7.0, 6.0, 23.0, 24.0));
    }

    proptest! {
        #[test]
        fn prop_topdown_round_trip(
            x0 in -1000.0..1000.0f64,
            y0 in -1000.0..1000.0f64,
            w in 0.0..500.0f64,
            h in 0.0..500.0f64,
            page_h in 100.0..2000.0f64,
        ) {
            let bbox = BoundingBox::new(x0, y0, x0 + w, y0 + h);
            let (a, top, b, bottom) = bbox.to_topdown(page_h);
            let back = BoundingBox::from_topdown(a, top, b, bottom, page_h);
            prop_assert!((back.x0 - bbox.x0).abs() < 1e-9);
            prop_assert!((back.y0 - bbox.y0).abs() < 1e-9);
            prop_assert!((back.x1 - bbox.x1).abs() < 1e-9);
            prop_assert!((back.y1 - bbox.y1).abs() < 1e-9);
        }

        #[test]
        fn prop_union_contains_both(
            ax in -100.0..100.0f64, ay in -100.0..100.0f64,
            bx in -100.0..100.0f64, by in -100.0..100.0f64,
        ) {
            let a = BoundingBox::new(ax, ay, ax + 10.0, ay + 10.0);
            let b = BoundingBox::new(bx, by, bx + 10.0, by + 10.0);
            let u = a.union(&b);
            prop_assert!(u.encloses(&a));
            prop_assert!(u.encloses(&b));
        }
    }
}
