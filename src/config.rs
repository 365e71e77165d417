//! Configuration for document-tree extraction.

use std::path::PathBuf;

/// Fixed page margins in points, used to crop every page before extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    /// Distance from the top of each page to ignore
    pub top: f64,
    /// Distance from the right side of each page to ignore
    pub right: f64,
    /// Distance from the bottom of each page to ignore
    pub bottom: f64,
    /// Distance from the left side of each page to ignore
    pub left: f64,
}

/// Relative search bands for smart header/footer detection, given as
/// fractions of the page height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMargins {
    /// Fraction of the page height forming the header band at the top
    pub top: f64,
    /// Fraction of the page height forming the footer band at the bottom
    pub bottom: f64,
}

/// Tunable extraction parameters.
///
/// The defaults are tuned for single-column technical documents; every value
/// can be overridden through [`ExtractionConfig`]. All absolute values are in
/// points (72 points = 1 inch), all `*_percentage` style values in the range
/// 0..1.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionParams {
    /// Fixed crop applied to every page before extraction (default: no crop)
    pub page_crop_margins: Margins,
    /// Search bands for smart header/footer detection
    pub smart_crop_margins: BandMargins,
    /// Fraction of pages an element must re-occur on to become a
    /// header/footer candidate
    pub header_footer_occurrence: f64,
    /// Maximal tolerated fraction of pages without any header/footer
    /// candidate between the first and last candidate page
    pub pages_missing_header_footer: f64,
    /// Continuity floor: a candidate y-position must cover at least this
    /// fraction of its page span to survive
    pub header_footer_continuous: f64,
    /// Ceiling on distinct candidate y-positions, as a fraction of the page
    /// count
    pub unique_header_footer_elements: f64,
    /// Expansion of table/figure/rect boxes when excluding text boxes inside
    pub table_margin: f64,
    /// Vertical tolerance when splitting elements above/below the first
    /// chapter during assembly
    pub headline_tolerance: f64,
    /// Edge length of ghost-chapter rectangles and the search distance for
    /// detached chapter-number boxes
    pub chapter_rectangle_extend: f64,
    /// Padding applied when re-extracting the chapter textbox, so that a crop
    /// exactly on the box boundary still captures all glyphs
    pub chapter_textbox_tolerance: f64,
    /// Horizontal expansion of annotation rectangles
    pub anno_x_tolerance: f64,
    /// Vertical expansion of annotation rectangles
    pub anno_y_tolerance: f64,
    /// Search radius when resolving a link target coordinate to an element
    pub target_coor_tolerance: f64,
    /// Minimal similarity between an outline title and a textbox for the
    /// textbox to be accepted as the chapter headline
    pub min_outline_similarity: f64,
    /// Figures narrower than this are dropped as not human readable
    pub figure_min_width: f64,
    /// Figures flatter than this are dropped as not human readable
    pub figure_min_height: f64,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            page_crop_margins: Margins::default(),
            smart_crop_margins: BandMargins {
                top: 0.2,
                bottom: 0.2,
            },
            header_footer_occurrence: 0.3,
            pages_missing_header_footer: 0.15,
            header_footer_continuous: 0.8,
            unique_header_footer_elements: 0.05,
            table_margin: 8.0,
            headline_tolerance: 20.0,
            chapter_rectangle_extend: 20.0,
            chapter_textbox_tolerance: 1.0,
            anno_x_tolerance: 3.0,
            anno_y_tolerance: 3.0,
            target_coor_tolerance: 65.0,
            min_outline_similarity: 0.6,
            figure_min_width: 15.0,
            figure_min_height: 15.0,
        }
    }
}

/// Top-level extraction configuration.
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    /// Pages to extract (1-based); `None` extracts the whole document.
    /// Page numbers outside the document are reported and skipped.
    pub pages: Option<Vec<u32>>,

    /// Enable smart header/footer detection and removal.
    pub smart_page_crop: bool,

    /// Directory figure files are named into (`page_<n>_figure.<idx>.png`).
    pub figure_dir: PathBuf,

    /// Skip link annotation processing entirely.
    pub skip_annotations: bool,

    /// Skip chapter matching; all elements stay at root level.
    pub skip_chapters: bool,

    /// Skip paragraph extraction.
    pub skip_paragraphs: bool,

    /// Skip table extraction.
    pub skip_tables: bool,

    /// Skip figure extraction.
    pub skip_figures: bool,

    /// Skip rect extraction.
    pub skip_rects: bool,

    /// Tunable algorithm parameters.
    pub params: ExtractionParams,
}

impl ExtractionConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self {
            figure_dir: PathBuf::from("figures"),
            ..Self::default()
        }
    }

    /// Restrict extraction to the given 1-based page numbers.
    pub fn with_pages(mut self, pages: Vec<u32>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Enable smart header/footer detection.
    pub fn with_smart_page_crop(mut self, enable: bool) -> Self {
        self.smart_page_crop = enable;
        self
    }

    /// Set the directory used when naming figure files.
    pub fn with_figure_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.figure_dir = dir.into();
        self
    }

    /// Skip link annotation processing.
    pub fn without_annotations(mut self) -> Self {
        self.skip_annotations = true;
        self
    }

    /// Skip chapter matching.
    pub fn without_chapters(mut self) -> Self {
        self.skip_chapters = true;
        self
    }

    /// Skip paragraph extraction.
    pub fn without_paragraphs(mut self) -> Self {
        self.skip_paragraphs = true;
        self
    }

    /// Skip table extraction.
    pub fn without_tables(mut self) -> Self {
        self.skip_tables = true;
        self
    }

    /// Skip figure extraction.
    pub fn without_figures(mut self) -> Self {
        self.skip_figures = true;
        self
    }

    /// Skip rect extraction.
    pub fn without_rects(mut self) -> Self {
        self.skip_rects = true;
        self
    }

    /// Override the tunable parameters.
    pub fn with_params(mut self, params: ExtractionParams) -> Self {
        self.params = params;
        self
    }
}
