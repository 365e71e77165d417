//! Link resolution.
//!
//! Phase A runs while elements are built: each text line is walked glyph by
//! glyph against the link annotations overlapping it, producing
//! [`Link`] values with character ranges into the textbox text and a raw
//! jump-target position. Phase B runs once the whole tree exists: every
//! target position is resolved to the UID of the element covering it, with a
//! raw page-coordinate fallback.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::debug;

use crate::catalog::annotations::{AnnotationTarget, LinkAnnotation};
use crate::catalog::destinations::ExplicitDestination;
use crate::config::ExtractionParams;
use crate::error::{Error, Result};
use crate::model::element::Element;
use crate::model::link::{Link, PosTarget};
use crate::model::root::Root;
use crate::model::textbox::{HorizontalBox, HorizontalLine, TextChar};
use crate::utils::safe_float_cmp;

/// Sentinel target for links leaving the extracted page subset.
pub const OUT_OF_SCOPE_TARGET: &str = "Out Of extracted pages scope";

/// One item of a line's character walk: a positioned glyph, or a synthetic
/// whitespace separator carrying no geometry (the space between words, or
/// the newline terminating a non-final line).
enum LineItem<'a> {
    Glyph(&'a TextChar),
    Separator,
}

fn line_items(line: &HorizontalLine, is_last_line: bool) -> Vec<LineItem<'_>> {
    let mut items = Vec::new();
    for (wi, word) in line.words.iter().enumerate() {
        if wi > 0 {
            items.push(LineItem::Separator);
        }
        for ch in &word.chars {
            items.push(LineItem::Glyph(ch));
        }
    }
    if !is_last_line {
        items.push(LineItem::Separator);
    }
    items
}

/// Phase A: extract the links of one textbox.
///
/// `annotations` are the link annotations of the page the box lies on;
/// `dests` is the named-destination table for resolving named targets.
pub fn extract_linked_chars(
    textbox: &HorizontalBox,
    annotations: &[LinkAnnotation],
    dests: &IndexMap<String, ExplicitDestination>,
    params: &ExtractionParams,
) -> Result<Vec<Link>> {
    let bbox = textbox.bbox();
    let overlapping: Vec<&LinkAnnotation> = annotations
        .iter()
        .filter(|a| {
            a.rect.x0 < bbox.x1 && a.rect.y0 < bbox.y1 && a.rect.x1 > bbox.x0 && a.rect.y1 > bbox.y0
        })
        .collect();
    if overlapping.is_empty() {
        return Ok(Vec::new());
    }

    let mut links = Vec::new();
    let mut char_counter = 0usize;
    let last = textbox.lines.len().saturating_sub(1);
    for (li, line) in textbox.lines.iter().enumerate() {
        let line_bbox = line.bbox();
        // an annotation counts for this line when it overlaps horizontally
        // and its vertical midpoint falls into the line
        let mut on_line: Vec<&LinkAnnotation> = overlapping
            .iter()
            .copied()
            .filter(|a| {
                let mid = a.rect.y0 + (a.rect.y0 - a.rect.y1).abs() / 2.0;
                a.rect.x0 < line_bbox.x1 && a.rect.x1 > line_bbox.x0 && line_bbox.y1 > mid && mid > line_bbox.y0
            })
            .collect();
        let items = line_items(line, li == last);
        if !on_line.is_empty() {
            on_line.sort_by(|a, b| safe_float_cmp(a.rect.x0, b.rect.x0));
            links.extend(scan_line(&items, &on_line, char_counter, dests, params)?);
        }
        char_counter += items.len();
    }
    Ok(links)
}

/// Walk a line's items against its annotations, left to right.
fn scan_line(
    items: &[LineItem<'_>],
    annotations: &[&LinkAnnotation],
    char_counter: usize,
    dests: &IndexMap<String, ExplicitDestination>,
    params: &ExtractionParams,
) -> Result<Vec<Link>> {
    let mut links = Vec::new();
    let mut idx_anno = 0usize;
    let mut start: Option<usize> = None;
    let mut stop: Option<usize> = None;

    for (idx, item) in items.iter().enumerate() {
        if idx_anno >= annotations.len() {
            break;
        }
        let anno = annotations[idx_anno];
        let mut complete = false;

        match item {
            LineItem::Glyph(ch) => {
                let inside = ch.bbox.x0 > anno.rect.x0 - params.anno_x_tolerance
                    && ch.bbox.x1 < anno.rect.x1 + params.anno_x_tolerance;
                if inside {
                    if start.is_none() {
                        start = Some(idx);
                    }
                    stop = Some(idx + 1);
                    complete = at_boundary(items, idx, anno);
                }
            }
            LineItem::Separator => {
                if matches!(items.get(idx + 1), Some(LineItem::Separator)) {
                    return Err(Error::AssemblyInvariant(
                        "two whitespace separators in a row in a text line".to_string(),
                    ));
                }
                if start.is_some() && idx == items.len() - 1 {
                    // trailing separator at line end after matched glyphs is
                    // part of the link
                    stop = Some(idx + 1);
                }
                complete = at_boundary(items, idx, anno);
            }
        }

        if complete {
            if let (Some(s), Some(e)) = (start, stop) {
                links.push(build_link(s + char_counter, e + char_counter, anno, dests));
                idx_anno += 1;
                start = None;
                stop = None;
            }
        }
    }

    Ok(links)
}

/// An annotation is complete when the line ends or the next glyph starts
/// right of its rectangle.
fn at_boundary(items: &[LineItem<'_>], idx: usize, anno: &LinkAnnotation) -> bool {
    match items.get(idx + 1) {
        None => true,
        Some(LineItem::Glyph(next)) => next.bbox.x0 > anno.rect.x1,
        Some(LineItem::Separator) => false,
    }
}

/// Resolve the annotation target into a raw jump position.
fn build_link(
    idx_start: usize,
    idx_stop: usize,
    anno: &LinkAnnotation,
    dests: &IndexMap<String, ExplicitDestination>,
) -> Link {
    let pos_target = match &anno.target {
        AnnotationTarget::Named(name) => match dests.get(name) {
            Some(dest) => PosTarget {
                page: dest.page,
                x: dest.x,
                y: dest.y,
            },
            None => {
                debug!("named destination {:?} is not in the destination table", name);
                PosTarget {
                    page: None,
                    x: 0.0,
                    y: 0.0,
                }
            }
        },
        AnnotationTarget::Explicit(dest) => PosTarget {
            page: dest.page,
            x: dest.x,
            y: dest.y,
        },
    };
    Link::new(idx_start, idx_stop, pos_target)
}

/// Phase B: resolve every link's target position to an element UID.
///
/// Elements are searched in document order; the first one whose position
/// contains the jump point under the target tolerance wins. Links whose
/// target page is missing from the extracted subset get the out-of-scope
/// sentinel; targets hitting blank space fall back to the raw coordinate
/// form `page.<n>/<x>:<y>`.
pub fn resolve_link_targets(root: &mut Root, params: &ExtractionParams) {
    // index of every element position, built before mutation
    let index: Vec<(u32, crate::model::position::Position, String)> = root
        .elements()
        .iter()
        .map(|e| {
            let p = crate::model::position::Positioned::position(*e);
            (p.page, p.clone(), e.uid().to_string())
        })
        .collect();
    let page_numbers: Vec<u32> = root.pages.iter().map(|p| p.number).collect();
    let tolerance = params.target_coor_tolerance;

    let mut resolve = |link: &mut Link| {
        let target = match link.pos_target.page {
            Some(page) if page_numbers.contains(&page) => {
                let hit = index
                    .iter()
                    .filter(|(p, _, _)| *p == page)
                    .find(|(_, pos, _)| pos.contains_target(page, link.pos_target.x, link.pos_target.y, tolerance));
                match hit {
                    Some((_, _, uid)) => uid.clone(),
                    None => {
                        let raw = format!("page.{}/{}:{}", page, link.pos_target.x, link.pos_target.y);
                        debug!(
                            "link target could not be resolved to an element; replacing it with the raw target page coordinate {}",
                            raw
                        );
                        raw
                    }
                }
            }
            _ => OUT_OF_SCOPE_TARGET.to_string(),
        };
        link.target = Some(target);
    };

    fn walk(elements: &mut [Element], resolve: &mut impl FnMut(&mut Link)) {
        for element in elements {
            match element {
                Element::Chapter(c) => walk(&mut c.content, resolve),
                Element::Paragraph(p) => p.links.iter_mut().for_each(&mut *resolve),
                Element::Table(t) => {
                    for cell in &mut t.cells {
                        cell.links.iter_mut().for_each(&mut *resolve);
                    }
                }
                Element::Figure(f) => f.links.iter_mut().for_each(&mut *resolve),
                Element::Rect(r) => r.links.iter_mut().for_each(&mut *resolve),
            }
        }
    }
    walk(&mut root.content, &mut resolve);
}

/// Build the per-page link map lookup used during element construction.
pub fn annotations_on_page<'a>(
    annos: &'a BTreeMap<u32, Vec<LinkAnnotation>>,
    page: u32,
) -> &'a [LinkAnnotation] {
    annos.get(&page).map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use crate::model::textbox::Word;

    /// A one-line textbox with 10pt-wide characters starting at `x0`.
    fn line_box(text: &str, x0: f64, y0: f64, y1: f64) -> HorizontalBox {
        let step = 10.0;
        let words = text
            .split(' ')
            .scan(0usize, |offset, w| {
                let start = *offset;
                *offset += w.chars().count() + 1;
                Some((start, w))
            })
            .map(|(start, w)| Word {
                chars: w
                    .chars()
                    .enumerate()
                    .map(|(i, c)| TextChar {
                        text: c,
                        bbox: BoundingBox::new(
                            x0 + (start + i) as f64 * step,
                            y0,
                            x0 + (start + i + 1) as f64 * step,
                            y1,
                        ),
                        ncolor: None,
                        fontname: None,
                    })
                    .collect(),
            })
            .collect();
        HorizontalBox {
            lines: vec![HorizontalLine { words }],
        }
    }

    fn anno(rect: BoundingBox, name: &str) -> LinkAnnotation {
        LinkAnnotation {
            rect,
            text: String::new(),
            target: AnnotationTarget::Named(name.to_string()),
        }
    }

    fn dests_with(name: &str, page: u32, x: f64, y: f64) -> IndexMap<String, ExplicitDestination> {
        let mut dests = IndexMap::new();
        dests.insert(
            name.to_string(),
            ExplicitDestination {
                page: Some(page),
                x,
                y,
            },
        );
        dests
    }

    #[test]
    fn test_char_range_of_covered_text() {
        // "See Section 2 here." with 10pt glyphs starting at x=0;
        // the annotation covers "Section 2" (chars 4..=12)
        let tb = line_box("See Section 2 here.", 0.0, 700.0, 712.0);
        let annos = [anno(BoundingBox::new(39.5, 698.0, 130.5, 714.0), "sec2")];
        let dests = dests_with("sec2", 4, 72.0, 600.0);
        let links =
            extract_linked_chars(&tb, &annos, &dests, &ExtractionParams::default()).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].idx_start, links[0].idx_stop), (4, 13));
        assert_eq!(links[0].source_chars(&tb.text()), Some("Section 2"));
        assert_eq!(
            links[0].pos_target,
            PosTarget {
                page: Some(4),
                x: 72.0,
                y: 600.0
            }
        );
    }

    #[test]
    fn test_two_annotations_on_one_line() {
        let tb = line_box("a bb c", 0.0, 700.0, 712.0);
        // "a" is chars 0..1, "bb" chars 2..4, "c" chars 5..6
        let annos = [
            anno(BoundingBox::new(48.5, 698.0, 60.5, 714.0), "two"),
            anno(BoundingBox::new(-0.5, 698.0, 10.5, 714.0), "one"),
        ];
        let mut dests = dests_with("one", 1, 0.0, 0.0);
        dests.insert(
            "two".to_string(),
            ExplicitDestination {
                page: Some(2),
                x: 0.0,
                y: 0.0,
            },
        );
        let links =
            extract_linked_chars(&tb, &annos, &dests, &ExtractionParams::default()).unwrap();
        // annotations are processed left-to-right regardless of input order
        assert_eq!(links.len(), 2);
        assert_eq!((links[0].idx_start, links[0].idx_stop), (0, 1));
        assert_eq!(links[0].pos_target.page, Some(1));
        assert_eq!((links[1].idx_start, links[1].idx_stop), (5, 6));
        assert_eq!(links[1].pos_target.page, Some(2));
    }

    #[test]
    fn test_annotation_to_line_end_includes_trailing_separator() {
        let tb = HorizontalBox {
            lines: vec![
                line_box("go here", 0.0, 712.0, 724.0).lines.remove(0),
                line_box("next line", 0.0, 698.0, 710.0).lines.remove(0),
            ],
        };
        // covers "here" (chars 3..7) to the end of the first line
        let annos = [anno(BoundingBox::new(29.5, 710.0, 70.5, 726.0), "x")];
        let dests = dests_with("x", 1, 0.0, 0.0);
        let links =
            extract_linked_chars(&tb, &annos, &dests, &ExtractionParams::default()).unwrap();
        assert_eq!(links.len(), 1);
        // the newline separator after "here" belongs to the link
        assert_eq!((links[0].idx_start, links[0].idx_stop), (3, 8));
        assert_eq!(links[0].source_chars(&tb.text()), Some("here\n"));
    }

    #[test]
    fn test_second_line_offsets_accumulate() {
        let tb = HorizontalBox {
            lines: vec![
                line_box("first line", 0.0, 712.0, 724.0).lines.remove(0),
                line_box("see target", 0.0, 698.0, 710.0).lines.remove(0),
            ],
        };
        // covers "target" on the second line: line offset is 11
        let annos = [anno(BoundingBox::new(39.5, 696.0, 100.5, 712.0), "x")];
        let dests = dests_with("x", 1, 0.0, 0.0);
        let links =
            extract_linked_chars(&tb, &annos, &dests, &ExtractionParams::default()).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].source_chars(&tb.text()), Some("target"));
    }

    #[test]
    fn test_unknown_named_destination_has_no_page() {
        let tb = line_box("x", 0.0, 700.0, 712.0);
        let annos = [anno(BoundingBox::new(-0.5, 698.0, 10.5, 714.0), "nowhere")];
        let links = extract_linked_chars(
            &tb,
            &annos,
            &IndexMap::new(),
            &ExtractionParams::default(),
        )
        .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].pos_target.page, None);
    }

    #[test]
    fn test_annotation_not_overlapping_box_is_ignored() {
        let tb = line_box("plain text", 0.0, 700.0, 712.0);
        let annos = [anno(BoundingBox::new(300.0, 698.0, 340.0, 714.0), "x")];
        let links = extract_linked_chars(
            &tb,
            &annos,
            &IndexMap::new(),
            &ExtractionParams::default(),
        )
        .unwrap();
        assert!(links.is_empty());
    }
}
