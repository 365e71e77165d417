//! Figure dropout.
//!
//! Removes figures that are too small to be human readable, clamps boxes
//! reaching off the page, and resolves duplicates: a figure fully contained
//! in another is dropped, and of two partially overlapping figures the
//! smaller one loses.

use crate::config::ExtractionParams;
use crate::source::FigureBox;

/// Filter the raw figure boxes of one page.
///
/// The steps are ordered: size filter and clamping first, then containment,
/// then overlap arbitration. The output is always a subset of the input
/// (modulo clamping).
pub fn filter_figures(figures: Vec<FigureBox>, params: &ExtractionParams) -> Vec<FigureBox> {
    // 1. drop figures too small to be readable
    let mut figures: Vec<FigureBox> = figures
        .into_iter()
        .filter(|f| {
            f.bbox.height() > params.figure_min_height && f.bbox.width() > params.figure_min_width
        })
        .collect();

    // 2. clamp partially off-page figures to the page
    for figure in figures.iter_mut() {
        let bbox = &mut figure.bbox;
        bbox.x0 = bbox.x0.max(0.0);
        bbox.y0 = bbox.y0.max(0.0);
        bbox.x1 = bbox.x1.max(0.0);
        bbox.y1 = bbox.y1.max(0.0);
    }

    let mut alive = vec![true; figures.len()];

    // 3. drop figures fully contained in another (edges included)
    for a in 0..figures.len() {
        for b in 0..figures.len() {
            if a == b || !alive[a] || !alive[b] {
                continue;
            }
            if figures[a].bbox.encloses(&figures[b].bbox) {
                alive[b] = false;
            }
        }
    }

    // 4. of two partially overlapping figures, the smaller one loses;
    //    equal areas drop the later one
    for a in 0..figures.len() {
        for b in (a + 1)..figures.len() {
            if !alive[a] || !alive[b] {
                continue;
            }
            let (fa, fb) = (&figures[a].bbox, &figures[b].bbox);
            if fa.intersects(fb) && !fa.encloses(fb) && !fb.encloses(fa) {
                if fa.area() < fb.area() {
                    alive[a] = false;
                } else {
                    alive[b] = false;
                }
            }
        }
    }

    figures
        .into_iter()
        .zip(alive)
        .filter_map(|(f, keep)| keep.then_some(f))
        .collect()
}
