#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

//! # pdf_doctree
//!
//! Structured document trees from technical PDFs.
//!
//! Given an already-parsed PDF (object graph, page geometry, layout boxes
//! and table grids, supplied by collaborators behind the [`source`] traits),
//! the crate builds an ordered hierarchy of chapters containing paragraphs,
//! tables, figures and colored rects, with hyperlinks resolved to
//! addressable element identifiers like `chapter.2/chapter.2.1/table.2`.
//!
//! ## Pipeline
//!
//! 1. **Catalog resolution** — outline, named destinations and link
//!    annotations from the document catalog, with chapter-number inference
//!    on outline titles.
//! 2. **Layout post-processing** — figure dropout, table/figure
//!    arbitration, smart header/footer detection, and exclusion of text
//!    boxes covered by figures/tables/rects.
//! 3. **Chapter matching** — outline entries are bound to on-page text
//!    boxes by text similarity; unmatched entries become ghost chapters.
//! 4. **Link resolution** — character ranges are bound to annotation
//!    rectangles while elements are built, then jump targets resolve to
//!    element UIDs once the tree exists.
//! 5. **Assembly** — elements are merged, sorted top-down, nested into the
//!    outline tree, and given stable identifiers.
//!
//! ## Quick start
//!
//! ```ignore
//! use pdf_doctree::{extract, CancelToken, ExtractionConfig};
//!
//! let root = extract(&source, &finder, &ExtractionConfig::new(), &CancelToken::new())?;
//! for chapter in root.chapters() {
//!     println!("{} {}", chapter.number, chapter.title);
//! }
//! println!("{}", serde_json::to_string_pretty(&root)?);
//! ```
//!
//! The extraction is a pure, single-threaded transformation: the same input
//! always produces the same tree, element order is page order then top-down
//! position, and the only suspension point is the cooperative
//! [`CancelToken`].

#![warn(missing_docs)]

// Error handling
pub mod error;

// Input side: object graph and collaborator traits
pub mod object;
pub mod source;

// Geometry
pub mod geometry;

// Catalog resolution
pub mod catalog;
pub mod numbering;

// Layout post-processing
pub mod layout;

// Element construction
pub mod chapters;
pub mod figures;
pub mod links;
pub mod paragraphs;
pub mod rects;
pub mod tables;

// Assembly and the document model
pub mod assembly;
pub mod model;

// Pipeline and configuration
pub mod config;
pub mod extract;

// Re-exports
pub use catalog::{CatalogContext, Outline, OutlineEntry};
pub use config::{ExtractionConfig, ExtractionParams};
pub use error::{Error, Result};
pub use extract::{extract, CancelToken};
pub use model::{Chapter, Element, Figure, Page, Paragraph, Position, Rect, Root, Table};
pub use source::{PdfSource, TableFinder};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all
    /// other values, so sorting never panics on NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).expect("both values are numbers"),
        }
    }

}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
