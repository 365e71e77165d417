//! Document catalog resolution.
//!
//! Walks the PDF object graph to produce three tables: the nested outline,
//! the named-destination table (label to page + jump point), and the per-page
//! link annotations. Once built, the [`CatalogContext`] is immutable and
//! threaded through the rest of the pipeline.

pub mod annotations;
pub mod destinations;
pub mod outline;

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{info, warn};

use crate::error::{Error, Result};
use crate::model::page::Page;
use crate::numbering;
use crate::object::Object;
use crate::source::PdfSource;

pub use annotations::{AnnotationTarget, LinkAnnotation};
pub use destinations::ExplicitDestination;
pub use outline::{Outline, OutlineEntry, OutlinePosition};

/// Keys that are never followed when deep-resolving the object graph.
///
/// They all point upwards or sideways in the document structure (`Parent` in
/// page trees, `Prev`/`Last` in outlines, `ParentTree`/`P` in structure
/// trees) and would send the resolver around reference cycles.
pub(crate) const FORBIDDEN_KEYS: &[&str] = &["Parent", "Prev", "Last", "ParentTree", "P"];

/// Safety cap on the resolution depth; a cycle the forbidden-key guard did
/// not catch trips this before the stack overflows.
pub(crate) const MAX_RESOLVE_DEPTH: u32 = 64;

/// The three catalog tables consumed by the extraction pipeline.
#[derive(Debug, Clone, Default)]
pub struct CatalogContext {
    /// The document outline with inferred chapter numbers, if any
    pub outline: Option<Outline>,
    /// Named destinations: label to page + jump point, in document order
    pub dests: IndexMap<String, ExplicitDestination>,
    /// Link annotations grouped by 1-based page number; pages without link
    /// annotations are absent
    pub annos: BTreeMap<u32, Vec<LinkAnnotation>>,
}

impl CatalogContext {
    /// Whether any link annotations were extracted.
    pub fn has_annotations(&self) -> bool {
        !self.annos.is_empty()
    }
}

/// Extract outline, named destinations and annotations from the catalog.
pub fn extract_catalog<S: PdfSource>(
    source: &S,
    pages: &[Page],
    skip_annotations: bool,
    params: &crate::config::ExtractionParams,
) -> Result<CatalogContext> {
    info!("catalog extraction started");

    let annos = if skip_annotations {
        info!("catalog extraction: annotations are excluded");
        BTreeMap::new()
    } else {
        annotations::page_link_annotations(source, pages, params)?
    };

    let dests = destinations::named_destinations(source)?;

    let mut outline = outline::extract_outline(source, &dests)?;
    if let Some(outline) = outline.as_mut() {
        numbering::assign_numbers(&mut outline.entries, "1");
    }

    Ok(CatalogContext {
        outline,
        dests,
        annos,
    })
}

/// Resolve an object through any chain of indirect references.
pub(crate) fn resolve_value<S: PdfSource>(source: &S, object: &Object, depth: u32) -> Result<Object> {
    if depth > MAX_RESOLVE_DEPTH {
        return Err(Error::ObjectGraphRecursion(MAX_RESOLVE_DEPTH));
    }
    match object {
        Object::Reference(r) => {
            let resolved = source.resolve(*r)?;
            resolve_value(source, &resolved, depth + 1)
        }
        other => Ok(other.clone()),
    }
}

/// Resolve a reference to a dictionary, failing with a catalog error when the
/// target is anything else.
pub(crate) fn resolve_to_dict<S: PdfSource>(
    source: &S,
    object: &Object,
    what: &str,
) -> Result<crate::object::Dictionary> {
    match resolve_value(source, object, 0)? {
        Object::Dictionary(d) => Ok(d),
        other => Err(Error::MalformedCatalog(format!(
            "{} is a {}, expected a dictionary",
            what,
            other.type_name()
        ))),
    }
}

/// Deep-resolve an object: references inside dictionaries and arrays are
/// replaced by their targets, except under the forbidden keys, which stay as
/// references.
///
/// The outline and annotation walkers resolve lazily and follow only
/// `/First`/`/Next`, so they never need this; it is the general-purpose way
/// to materialize a catalog substructure (e.g. for diagnostics) without
/// running into reference cycles.
pub fn resolve_deep<S: PdfSource>(source: &S, object: &Object, depth: u32) -> Result<Object> {
    if depth > MAX_RESOLVE_DEPTH {
        return Err(Error::ObjectGraphRecursion(MAX_RESOLVE_DEPTH));
    }
    match object {
        Object::Reference(r) => {
            let resolved = source.resolve(*r)?;
            resolve_deep(source, &resolved, depth + 1)
        }
        Object::Dictionary(dict) => {
            let mut out = crate::object::Dictionary::new();
            for (key, value) in dict {
                if FORBIDDEN_KEYS.contains(&key.as_str()) {
                    out.insert(key.clone(), value.clone());
                } else {
                    out.insert(key.clone(), resolve_deep(source, value, depth + 1)?);
                }
            }
            Ok(Object::Dictionary(out))
        }
        Object::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(resolve_deep(source, item, depth + 1)?);
            }
            Ok(Object::Array(out))
        }
        other => Ok(other.clone()),
    }
}

/// Decode a catalog byte string into text.
///
/// Titles and destination names arrive as raw bytes with no mandated
/// encoding. UTF-16BE is detected through its BOM, otherwise strict UTF-8 is
/// attempted; everything else falls back to a lossy WINDOWS-1252 decode (the
/// closest ecosystem approximation of PDFDocEncoding) with a warning.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let (text, _, had_errors) = encoding_rs::UTF_16BE.decode(&bytes[2..]);
        if had_errors {
            warn!(
                "could not fully decode UTF-16 catalog string {:?}; replaced unreadable bytes",
                text
            );
        }
        return text.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            warn!(
                "catalog string is neither UTF-16 nor UTF-8, decoded as WINDOWS-1252: {:?}",
                text
            );
            text.into_owned()
        }
    }
}

/// Extract the bytes of a possibly indirect string or name object.
pub(crate) fn resolve_text<S: PdfSource>(source: &S, object: &Object) -> Result<Option<String>> {
    match resolve_value(source, object, 0)? {
        Object::String(bytes) => Ok(Some(decode_pdf_string(&bytes))),
        Object::Name(name) => Ok(Some(name)),
        _ => Ok(None),
    }
}
