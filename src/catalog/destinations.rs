//! Named destinations: the indirection layer used by link annotations and
//! outline entries.
//!
//! PDF 1.2 stores them as a name tree under `/Names/Dests`, possibly a forest
//! rooted by `/Kids` whose leaves hold a `/Names` array of alternating
//! `(name, destination)` entries. PDF 1.1 uses a flat dictionary under
//! `/Dests`. Both forms are flattened into one ordered table.

use indexmap::IndexMap;
use log::{debug, info};

use crate::catalog::{resolve_value, MAX_RESOLVE_DEPTH};
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use crate::source::PdfSource;

/// A resolved destination: a 1-based page number and the top-left jump point.
///
/// `page` is `None` when the destination's page object is not part of the
/// extracted page subset.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitDestination {
    /// 1-based target page number
    pub page: Option<u32>,
    /// X coordinate of the jump point
    pub x: f64,
    /// Y coordinate of the jump point
    pub y: f64,
}

/// Extract the named-destination table from the catalog.
///
/// Returns an empty table when the document has no named destinations.
pub fn named_destinations<S: PdfSource>(
    source: &S,
) -> Result<IndexMap<String, ExplicitDestination>> {
    info!("catalog extraction: named destinations ...");

    let catalog = source.catalog();
    let mut table = IndexMap::new();

    if let Some(names_obj) = catalog.get("Names") {
        // PDF 1.2: name tree under /Names/Dests
        let names = match resolve_value(source, names_obj, 0)? {
            Object::Dictionary(d) => d,
            _ => return Ok(table),
        };
        let tree = match names.get("Dests") {
            Some(dests_obj) => match resolve_value(source, dests_obj, 0)? {
                Object::Dictionary(d) => d,
                _ => return Ok(table),
            },
            None => return Ok(table),
        };
        flatten_name_tree(source, &tree, &mut table, 0)?;
    } else if let Some(dests_obj) = catalog.get("Dests") {
        // PDF 1.1: flat dictionary under /Dests
        if let Object::Dictionary(dict) = resolve_value(source, dests_obj, 0)? {
            // dictionary iteration order is unspecified, sort for determinism
            let mut names: Vec<&String> = dict.keys().collect();
            names.sort();
            for name in names {
                if let Some(dest) = resolve_destination(source, &dict[name])? {
                    table.insert(name.clone(), dest);
                }
            }
        }
    } else {
        debug!("catalog extraction: named destinations do not exist");
    }

    Ok(table)
}

/// Walk the name tree recursively, collecting the `/Names` leaves.
fn flatten_name_tree<S: PdfSource>(
    source: &S,
    node: &Dictionary,
    table: &mut IndexMap<String, ExplicitDestination>,
    depth: u32,
) -> Result<()> {
    if depth > MAX_RESOLVE_DEPTH {
        return Err(Error::ObjectGraphRecursion(MAX_RESOLVE_DEPTH));
    }

    if let Some(kids_obj) = node.get("Kids") {
        if let Object::Array(kids) = resolve_value(source, kids_obj, 0)? {
            for kid in &kids {
                if let Object::Dictionary(kid_dict) = resolve_value(source, kid, 0)? {
                    flatten_name_tree(source, &kid_dict, table, depth + 1)?;
                }
            }
            return Ok(());
        }
    }

    if let Some(names_obj) = node.get("Names") {
        if let Object::Array(entries) = resolve_value(source, names_obj, 0)? {
            // alternating (name, destination) pairs
            for pair in entries.chunks(2) {
                if pair.len() != 2 {
                    continue;
                }
                let name = match &pair[0] {
                    Object::String(bytes) => crate::catalog::decode_pdf_string(bytes),
                    Object::Name(name) => name.clone(),
                    _ => continue,
                };
                if let Some(dest) = resolve_destination(source, &pair[1])? {
                    table.insert(name, dest);
                }
            }
        }
    }

    Ok(())
}

/// Resolve a destination value: either an explicit-destination array or a
/// dictionary with a `/D` entry carrying one.
pub(crate) fn resolve_destination<S: PdfSource>(
    source: &S,
    object: &Object,
) -> Result<Option<ExplicitDestination>> {
    match resolve_value(source, object, 0)? {
        Object::Array(items) => Ok(Some(explicit_destination(source, &items)?)),
        Object::Dictionary(dict) => match dict.get("D") {
            Some(d) => match resolve_value(source, d, 0)? {
                Object::Array(items) => Ok(Some(explicit_destination(source, &items)?)),
                _ => Ok(None),
            },
            None => Ok(None),
        },
        _ => Ok(None),
    }
}

/// Decode an explicit-destination array like `[page /XYZ left top zoom]` or
/// `[page /Fit]`.
///
/// For zoom variants without an explicit `top` the jump point falls back to
/// the top of the page's media box.
pub(crate) fn explicit_destination<S: PdfSource>(
    source: &S,
    items: &[Object],
) -> Result<ExplicitDestination> {
    let page_ref = items
        .first()
        .and_then(|o| o.as_reference())
        .ok_or_else(|| {
            Error::MalformedCatalog(format!(
                "destination page entry {:?} is not an indirect reference to a page object",
                items.first().map(|o| o.type_name())
            ))
        })?;

    let page = source.page_number_of(page_ref);

    let fit = items.get(1).and_then(|o| o.as_name()).unwrap_or("");
    if fit == "XYZ" {
        let x = items.get(2).and_then(|o| o.as_number()).unwrap_or(0.0);
        let y = items.get(3).and_then(|o| o.as_number()).unwrap_or(0.0);
        Ok(ExplicitDestination { page, x, y })
    } else {
        // /Fit and friends carry no coordinate; jump to the page top
        let y = media_box_top(source, page_ref).unwrap_or(0.0);
        Ok(ExplicitDestination { page, x: 0.0, y })
    }
}

/// Top edge of a page object's media box.
fn media_box_top<S: PdfSource>(source: &S, page_ref: crate::object::ObjectRef) -> Option<f64> {
    let page_obj = source.resolve(page_ref).ok()?;
    let dict = page_obj.as_dict()?;
    let media_box = resolve_value(source, dict.get("MediaBox")?, 0).ok()?;
    media_box.as_array()?.get(3)?.as_number()
}
