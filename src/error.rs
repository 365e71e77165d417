//! Error types for the document-tree extraction library.
//!
//! Conditions that can be recovered locally (undecodable outline titles,
//! inverted annotation rectangles, unmatched outline entries) are logged and
//! handled in place; only structural problems surface through this module.

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building the document tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document catalog violates the PDF structure the extractor relies on:
    /// `/Outlines` without `/First`, an outline node carrying both `/A` and
    /// `/Dest` (or neither), or a destination whose page entry is not an
    /// indirect reference to a page object.
    #[error("Malformed document catalog: {0}")]
    MalformedCatalog(String),

    /// No pages are left to analyze after page-range filtering.
    #[error("No pages left in the PDF to analyze")]
    EmptyPdf,

    /// The element stream handed to the hierarchy mapper broke an internal
    /// invariant, e.g. a non-chapter element before the first chapter.
    #[error("Assembly invariant violated: {0}")]
    AssemblyInvariant(String),

    /// Deep resolution of the object graph exceeded the safety limit,
    /// indicating a reference cycle the forbidden-key guard did not catch.
    #[error("Object graph recursion limit exceeded (max: {0})")]
    ObjectGraphRecursion(u32),

    /// Extraction was aborted through the cancellation token.
    #[error("Extraction cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_catalog_message() {
        let err = Error::MalformedCatalog("key \"First\" is not in /Outlines".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Malformed document catalog"));
        assert!(msg.contains("First"));
    }

    #[test]
    fn test_recursion_limit_message() {
        let err = Error::ObjectGraphRecursion(64);
        assert!(format!("{}", err).contains("64"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
