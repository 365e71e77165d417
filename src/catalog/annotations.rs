//! Link annotation extraction.
//!
//! For every extracted page, the page's annotation list is walked and every
//! annotation of subtype `Link` yields a rectangle, the text it covers, and
//! a jump target (explicit or named). Annotations with degenerate rectangles
//! are skipped.

use std::collections::BTreeMap;

use log::{debug, error, info, warn};

use crate::catalog::destinations::{explicit_destination, ExplicitDestination};
use crate::catalog::{decode_pdf_string, resolve_to_dict, resolve_value};
use crate::config::ExtractionParams;
use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::model::page::Page;
use crate::object::{Dictionary, Object};
use crate::source::PdfSource;

/// Jump target of a link annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationTarget {
    /// An explicit page + point destination
    Explicit(ExplicitDestination),
    /// A named destination, resolved through the destination table later
    Named(String),
}

/// A link annotation on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// The annotation rectangle as given in the PDF (unexpanded)
    pub rect: BoundingBox,
    /// The text covered by the (expanded) rectangle
    pub text: String,
    /// Where the link jumps to
    pub target: AnnotationTarget,
}

/// Extract the link annotations of all extracted pages.
///
/// Pages without link annotations are absent from the returned map.
pub fn page_link_annotations<S: PdfSource>(
    source: &S,
    pages: &[Page],
    params: &ExtractionParams,
) -> Result<BTreeMap<u32, Vec<LinkAnnotation>>> {
    info!("catalog extraction: annotations ...");

    let mut by_page = BTreeMap::new();

    for page in pages {
        let raw = source.page_annotations(page.number)?;
        let mut annotations = Vec::new();
        for annotation_obj in &raw {
            let dict = match resolve_value(source, annotation_obj, 0)? {
                Object::Dictionary(d) => d,
                _ => continue,
            };
            let subtype = dict.get("Subtype").and_then(|s| s.as_name()).unwrap_or("");
            if subtype != "Link" {
                continue;
            }
            if let Some(annotation) = link_annotation(source, &dict, page, params)? {
                annotations.push(annotation);
            }
        }
        if !annotations.is_empty() {
            by_page.insert(page.number, annotations);
        }
    }

    Ok(by_page)
}

/// Build a [`LinkAnnotation`] from a resolved annotation dictionary.
///
/// Returns `Ok(None)` for annotations that are recovered locally: missing or
/// degenerate rectangles, non-GoTo actions, and dictionaries without any
/// target.
fn link_annotation<S: PdfSource>(
    source: &S,
    dict: &Dictionary,
    page: &Page,
    params: &ExtractionParams,
) -> Result<Option<LinkAnnotation>> {
    let rect = match annotation_rect(source, dict)? {
        Some(rect) => rect,
        None => {
            error!("\"Rect\" is missing in annotation on page {}", page.number);
            return Ok(None);
        }
    };

    if dict.contains_key("A") && dict.contains_key("Dest") {
        error!(
            "keys \"A\" and \"Dest\" cannot coexist in annotation on page {}",
            page.number
        );
    }

    // expand the rectangle so that glyphs sticking out slightly still count
    let expanded = rect.expand(params.anno_x_tolerance, params.anno_y_tolerance);
    let (_, top, _, bottom) = expanded.to_topdown(page.height);
    if top > bottom {
        debug!(
            "invalid annotation bbox on page {}: {:?}",
            page.number, rect
        );
        return Ok(None);
    }

    let text = source.text_in_bbox(page.number, &expanded);

    let target = if let Some(action_obj) = dict.get("A") {
        let action = resolve_to_dict(source, action_obj, "annotation action")?;
        let kind = action.get("S").and_then(|s| s.as_name()).unwrap_or("");
        if kind != "GoTo" {
            info!(
                "the {} link target on page {} is not in this document",
                kind, page.number
            );
            return Ok(None);
        }
        match action.get("D").map(|d| resolve_value(source, d, 0)).transpose()? {
            Some(Object::Array(items)) => {
                AnnotationTarget::Explicit(explicit_destination(source, &items)?)
            }
            Some(Object::Name(name)) => AnnotationTarget::Named(name),
            Some(Object::String(bytes)) => AnnotationTarget::Named(decode_pdf_string(&bytes)),
            _ => {
                warn!(
                    "annotation GoTo action without usable \"D\" on page {}; skipped",
                    page.number
                );
                return Ok(None);
            }
        }
    } else if let Some(dest_obj) = dict.get("Dest") {
        match resolve_value(source, dest_obj, 0)? {
            Object::Array(items) => {
                AnnotationTarget::Explicit(explicit_destination(source, &items)?)
            }
            Object::Name(name) => AnnotationTarget::Named(name),
            Object::String(bytes) => AnnotationTarget::Named(decode_pdf_string(&bytes)),
            _ => {
                warn!(
                    "annotation destination of unexpected type on page {}; skipped",
                    page.number
                );
                return Ok(None);
            }
        }
    } else {
        warn!(
            "annotation without \"A\" or \"Dest\" on page {}; skipped",
            page.number
        );
        return Ok(None);
    };

    Ok(Some(LinkAnnotation { rect, text, target }))
}

/// Read the `/Rect` entry of an annotation.
fn annotation_rect<S: PdfSource>(source: &S, dict: &Dictionary) -> Result<Option<BoundingBox>> {
    let rect_obj = match dict.get("Rect") {
        Some(obj) => resolve_value(source, obj, 0)?,
        None => return Ok(None),
    };
    let items = match rect_obj.as_array() {
        Some(items) if items.len() == 4 => items.clone(),
        _ => return Ok(None),
    };
    let mut coords = [0.0f64; 4];
    for (i, item) in items.iter().enumerate() {
        coords[i] = item.as_number().unwrap_or(0.0);
    }
    Ok(Some(BoundingBox::new(
        coords[0], coords[1], coords[2], coords[3],
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testsource::TestSource;
    use crate::object::ObjectRef;

    fn link_dict(rect: [f64; 4], dest: Object) -> Object {
        Object::Dictionary(Dictionary::from_iter([
            ("Subtype".to_string(), Object::Name("Link".to_string())),
            (
                "Rect".to_string(),
                Object::Array(rect.iter().map(|v| Object::Real(*v)).collect()),
            ),
            ("Dest".to_string(), dest),
        ]))
    }

    fn pages(n: u32) -> Vec<Page> {
        (1..=n).map(|i| Page::new(i, 595.0, 842.0)).collect()
    }

    #[test]
    fn test_named_link_annotation() {
        let mut source = TestSource::with_pages(1);
        source.annotations.insert(
            1,
            vec![link_dict(
                [100.0, 500.0, 200.0, 512.0],
                Object::Name("sec2".to_string()),
            )],
        );
        source.texts.insert(1, "Section 2".to_string());

        let table = page_link_annotations(&source, &pages(1), &ExtractionParams::default()).unwrap();
        let annotations = &table[&1];
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].rect, BoundingBox::new(100.0, 500.0, 200.0, 512.0));
        assert_eq!(annotations[0].text, "Section 2");
        assert_eq!(
            annotations[0].target,
            AnnotationTarget::Named("sec2".to_string())
        );
    }

    #[test]
    fn test_explicit_link_annotation() {
        let mut source = TestSource::with_pages(2);
        let p2 = ObjectRef::new(10, 0);
        source.add_page_ref(p2, 2);
        source.annotations.insert(
            1,
            vec![link_dict(
                [100.0, 500.0, 200.0, 512.0],
                Object::Array(vec![
                    Object::Reference(p2),
                    Object::Name("XYZ".to_string()),
                    Object::Real(72.0),
                    Object::Real(600.0),
                    Object::Integer(0),
                ]),
            )],
        );

        let table = page_link_annotations(&source, &pages(2), &ExtractionParams::default()).unwrap();
        match &table[&1][0].target {
            AnnotationTarget::Explicit(d) => {
                assert_eq!(d.page, Some(2));
                assert_eq!(d.x, 72.0);
                assert_eq!(d.y, 600.0);
            }
            other => panic!("unexpected target {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_rect_is_skipped() {
        let mut source = TestSource::with_pages(1);
        // y0 above y1 turns into top > bottom after conversion
        source.annotations.insert(
            1,
            vec![link_dict(
                [100.0, 512.0, 200.0, 400.0],
                Object::Name("x".to_string()),
            )],
        );
        let table = page_link_annotations(&source, &pages(1), &ExtractionParams::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_non_link_subtype_ignored() {
        let mut source = TestSource::with_pages(1);
        source.annotations.insert(
            1,
            vec![Object::Dictionary(Dictionary::from_iter([
                ("Subtype".to_string(), Object::Name("Text".to_string())),
                (
                    "Rect".to_string(),
                    Object::Array(vec![
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(10.0),
                        Object::Real(10.0),
                    ]),
                ),
            ]))],
        );
        let table = page_link_annotations(&source, &pages(1), &ExtractionParams::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_uri_action_skipped() {
        let mut source = TestSource::with_pages(1);
        source.annotations.insert(
            1,
            vec![Object::Dictionary(Dictionary::from_iter([
                ("Subtype".to_string(), Object::Name("Link".to_string())),
                (
                    "Rect".to_string(),
                    Object::Array(vec![
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(10.0),
                        Object::Real(10.0),
                    ]),
                ),
                (
                    "A".to_string(),
                    Object::Dictionary(Dictionary::from_iter([(
                        "S".to_string(),
                        Object::Name("URI".to_string()),
                    )])),
                ),
            ]))],
        );
        let table = page_link_annotations(&source, &pages(1), &ExtractionParams::default()).unwrap();
        assert!(table.is_empty());
    }
}
