//! Outline (bookmark tree) extraction.
//!
//! The outline hierarchy is linked through `/First` (first child) and
//! `/Next` (next sibling). Siblings are walked iteratively, children
//! recursively with a depth guard. Only `/GoTo` actions are honored; nodes
//! whose action points outside the document are reported and omitted.

use indexmap::IndexMap;
use log::{info, warn};

use crate::catalog::destinations::{explicit_destination, ExplicitDestination};
use crate::catalog::{resolve_text, resolve_to_dict, resolve_value, MAX_RESOLVE_DEPTH};
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use crate::source::PdfSource;

/// The document outline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    /// Top-level outline entries
    pub entries: Vec<OutlineEntry>,
}

/// The jump point of an outline entry: the top-left corner the viewer
/// scrolls to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlinePosition {
    /// 1-based target page number; `None` when the page is not part of the
    /// extracted subset
    pub page: Option<u32>,
    /// X coordinate of the jump point (left edge)
    pub x0: f64,
    /// Y coordinate of the jump point (top edge)
    pub y1: f64,
}

/// A node of the outline tree.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    /// Decoded title with any parsed number prefix stripped
    pub title: String,
    /// Chapter number, real (`2.1`) or virtual (`virt.1.2`); filled in by
    /// [`crate::numbering::assign_numbers`]
    pub number: String,
    /// Jump point of the entry
    pub position: OutlinePosition,
    /// Child entries
    pub children: Vec<OutlineEntry>,
}

impl Outline {
    /// All entries of the tree in pre-order.
    pub fn flatten(&self) -> Vec<&OutlineEntry> {
        let mut out = Vec::new();
        fn walk<'a>(entries: &'a [OutlineEntry], out: &mut Vec<&'a OutlineEntry>) {
            for entry in entries {
                out.push(entry);
                walk(&entry.children, out);
            }
        }
        walk(&self.entries, &mut out);
        out
    }

    /// First entry of the pruned tree (entries with an unresolvable page
    /// removed), in pre-order.
    pub fn first_entry(&self) -> Option<&OutlineEntry> {
        self.entries.iter().find(|e| e.position.page.is_some())
    }
}

/// Extract the outline from the catalog.
///
/// Returns `Ok(None)` when the document has no outline or an empty one, and
/// [`Error::MalformedCatalog`] when `/Outlines` is present but lacks
/// `/First`.
pub fn extract_outline<S: PdfSource>(
    source: &S,
    dests: &IndexMap<String, ExplicitDestination>,
) -> Result<Option<Outline>> {
    info!("catalog extraction: outline ...");

    let outlines_obj = match source.catalog().get("Outlines") {
        Some(obj) => obj,
        None => {
            info!("catalog extraction: outline does not exist");
            return Ok(None);
        }
    };

    let outlines = resolve_to_dict(source, outlines_obj, "/Outlines")?;
    if outlines.is_empty() {
        info!("catalog extraction: outline exists but is empty");
        return Ok(None);
    }

    let first = outlines
        .get("First")
        .ok_or_else(|| Error::MalformedCatalog("key \"First\" is not in /Outlines".to_string()))?;

    let mut entries = Vec::new();
    resolve_level(source, first, dests, &mut entries, 0)?;

    Ok(Some(Outline { entries }))
}

/// Walk one sibling chain, recursing into children.
fn resolve_level<S: PdfSource>(
    source: &S,
    first: &Object,
    dests: &IndexMap<String, ExplicitDestination>,
    out: &mut Vec<OutlineEntry>,
    depth: u32,
) -> Result<()> {
    if depth > MAX_RESOLVE_DEPTH {
        return Err(Error::ObjectGraphRecursion(MAX_RESOLVE_DEPTH));
    }

    let mut node = Some(resolve_to_dict(source, first, "outline node")?);
    while let Some(dict) = node {
        if let Some(mut entry) = resolve_node(source, &dict, dests)? {
            if let Some(child_first) = dict.get("First") {
                resolve_level(source, child_first, dests, &mut entry.children, depth + 1)?;
            }
            out.push(entry);
        }
        // an omitted node takes its subtree with it

        node = match dict.get("Next") {
            Some(next) => Some(resolve_to_dict(source, next, "outline node")?),
            None => None,
        };
    }
    Ok(())
}

/// Destination carried by an outline node.
enum NodeDest {
    Explicit(ExplicitDestination),
    Named(String),
    /// Action points outside this document
    External,
}

/// Resolve a single outline node into an entry.
///
/// Returns `Ok(None)` for nodes that are reported and omitted: non-GoTo
/// actions and named destinations missing from the destination table.
fn resolve_node<S: PdfSource>(
    source: &S,
    dict: &Dictionary,
    dests: &IndexMap<String, ExplicitDestination>,
) -> Result<Option<OutlineEntry>> {
    if dict.contains_key("A") && dict.contains_key("Dest") {
        return Err(Error::MalformedCatalog(
            "keys \"A\" and \"Dest\" cannot coexist in an outline node".to_string(),
        ));
    }

    let title = resolve_text(source, dict.get("Title").ok_or_else(|| {
        Error::MalformedCatalog("outline node has no \"Title\"".to_string())
    })?)?
    .unwrap_or_default();

    let dest = if let Some(action_obj) = dict.get("A") {
        let action = resolve_to_dict(source, action_obj, "outline action")?;
        let kind = action.get("S").and_then(|s| s.as_name()).unwrap_or("");
        if kind != "GoTo" {
            info!(
                "jump target of outline entry {:?} is outside of this document",
                title
            );
            NodeDest::External
        } else {
            destination_entry(source, action.get("D"))?
        }
    } else if dict.contains_key("Dest") {
        destination_entry(source, dict.get("Dest"))?
    } else {
        return Err(Error::MalformedCatalog(
            "outline node has neither \"A\" nor \"Dest\"".to_string(),
        ));
    };

    let position = match dest {
        NodeDest::External => return Ok(None),
        NodeDest::Explicit(d) => OutlinePosition {
            page: d.page,
            x0: d.x,
            y1: d.y,
        },
        NodeDest::Named(name) => match dests.get(&name) {
            Some(d) => OutlinePosition {
                page: d.page,
                x0: d.x,
                y1: d.y,
            },
            None => {
                warn!(
                    "outline entry {:?} references unknown named destination {:?}; entry omitted",
                    title, name
                );
                return Ok(None);
            }
        },
    };

    Ok(Some(OutlineEntry {
        title,
        number: String::new(),
        position,
        children: Vec::new(),
    }))
}

/// Interpret the `/D` or `/Dest` value of an outline node.
fn destination_entry<S: PdfSource>(source: &S, value: Option<&Object>) -> Result<NodeDest> {
    let value = match value {
        Some(v) => resolve_value(source, v, 0)?,
        None => {
            return Err(Error::MalformedCatalog(
                "outline GoTo action has no \"D\" entry".to_string(),
            ))
        }
    };
    match value {
        Object::Array(items) => Ok(NodeDest::Explicit(explicit_destination(source, &items)?)),
        Object::Name(name) => Ok(NodeDest::Named(name)),
        Object::String(bytes) => Ok(NodeDest::Named(crate::catalog::decode_pdf_string(&bytes))),
        other => Err(Error::MalformedCatalog(format!(
            "outline destination is a {}",
            other.type_name()
        ))),
    }
}
