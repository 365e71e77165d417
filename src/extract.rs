//! The extraction pipeline.
//!
//! `extract` wires the stages together: page selection, file info, catalog
//! resolution, figure/table/rect extraction, textbox filtering, chapter
//! matching, paragraph rendering, assembly, and link target resolution. The
//! result is an owned, immutable document tree; two runs over the same input
//! produce identical trees.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info};

use crate::assembly;
use crate::catalog;
use crate::chapters;
use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::figures;
use crate::layout::{self, exclusion, header_footer};
use crate::links;
use crate::model::file::{parse_pdf_date, File, FileMeta};
use crate::model::page::Page;
use crate::model::root::Root;
use crate::model::textbox::HorizontalBox;
use crate::object::Object;
use crate::paragraphs;
use crate::rects;
use crate::source::{PdfSource, TableFinder};
use crate::tables;

/// Cooperative cancellation token.
///
/// Checked at page boundaries in every sweep; once triggered, the running
/// extraction drops its partial state and returns [`Error::Cancelled`].
/// Cancellation is final, there are no retries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was triggered.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Fail with [`Error::Cancelled`] when triggered.
    pub(crate) fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Run the full extraction and return the document tree.
pub fn extract<S: PdfSource, F: TableFinder>(
    source: &S,
    finder: &F,
    config: &ExtractionConfig,
    cancel: &CancelToken,
) -> Result<Root> {
    info!("PDF extraction started ...");
    let params = &config.params;

    let pages = select_pages(source, config)?;
    let file = file_info(source, config, pages.len());

    let mut catalog = catalog::extract_catalog(source, &pages, config.skip_annotations, params)?;

    let figure_list = if config.skip_figures {
        info!("excluding figures extraction");
        Vec::new()
    } else {
        let list = figures::extract_figures(source, &pages, &catalog, config, cancel)?;
        if config.smart_page_crop {
            header_footer::remove_header_footer(list, &pages, params)
        } else {
            list
        }
    };

    let table_list = if config.skip_tables {
        info!("excluding tables extraction");
        Vec::new()
    } else {
        let list =
            tables::extract_tables(source, finder, &pages, &figure_list, &catalog, params, cancel)?;
        if config.smart_page_crop {
            header_footer::remove_header_footer(list, &pages, params)
        } else {
            list
        }
    };

    let rect_list = if config.skip_rects {
        info!("excluding rects extraction");
        Vec::new()
    } else {
        rects::extract_rects(source, &pages, &catalog, params, cancel)?
    };

    let mut page_boxes = collect_textboxes(
        source,
        &pages,
        &figure_list,
        &table_list,
        &rect_list,
        config,
        cancel,
    )?;

    let chapter_list = if config.skip_chapters {
        info!("excluding chapters extraction");
        Vec::new()
    } else if let Some(outline) = catalog.outline.as_mut() {
        chapters::render_chapters(source, outline, &mut page_boxes, &pages, params)?
    } else {
        Vec::new()
    };

    let paragraph_list = if config.skip_paragraphs {
        info!("excluding paragraphs extraction");
        Vec::new()
    } else {
        let list = paragraphs::render_paragraphs(page_boxes, &catalog, params, cancel)?;
        if config.smart_page_crop {
            header_footer::remove_header_footer(list, &pages, params)
        } else {
            list
        }
    };

    let merged = assembly::merge_elements(
        chapter_list,
        paragraph_list,
        table_list,
        figure_list,
        rect_list,
        &pages,
    );

    let mut content = match &catalog.outline {
        Some(outline) if !config.skip_chapters => {
            assembly::map_elements_to_outline(merged, outline, params)?
        }
        _ => merged,
    };

    assembly::assign_root_indices(&mut content);
    assembly::assign_uids(&mut content);

    let mut root = Root {
        file,
        pages,
        content,
    };

    if catalog.has_annotations() {
        links::resolve_link_targets(&mut root, params);
    }

    Ok(root)
}

/// Build the page list, honoring the configured page subset.
fn select_pages<S: PdfSource>(source: &S, config: &ExtractionConfig) -> Result<Vec<Page>> {
    info!("extracting page metadata ...");
    let all = source.pages();
    if all.is_empty() {
        return Err(Error::EmptyPdf);
    }

    let pages: Vec<Page> = match &config.pages {
        None => all
            .iter()
            .map(|p| Page::new(p.number, p.width, p.height))
            .collect(),
        Some(wanted) => {
            let missing: Vec<u32> = wanted
                .iter()
                .copied()
                .filter(|n| *n == 0 || *n > all.len() as u32)
                .collect();
            if !missing.is_empty() {
                error!(
                    "the selected page number(s) {:?} do not exist in the pdf; they will be skipped",
                    missing
                );
            }
            all.iter()
                .filter(|p| wanted.contains(&p.number))
                .map(|p| Page::new(p.number, p.width, p.height))
                .collect()
        }
    };

    if pages.is_empty() {
        error!("page range selection: no pages left in the PDF to analyze");
        return Err(Error::EmptyPdf);
    }
    Ok(pages)
}

/// Build the [`File`] record from the source path and information
/// dictionary.
fn file_info<S: PdfSource>(source: &S, config: &ExtractionConfig, page_count: usize) -> File {
    info!("extracting file information ...");
    let path = source.path().to_string();
    let name = std::path::Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());

    let mut meta = FileMeta::default();
    if let Some(info) = source.info() {
        let text = |key: &str| -> Option<String> {
            info.get(key).and_then(|v| match v {
                Object::String(bytes) => Some(catalog::decode_pdf_string(bytes)),
                Object::Name(name) => Some(name.clone()),
                _ => None,
            })
        };
        meta.author = text("Author");
        meta.title = text("Title");
        meta.subject = text("Subject");
        meta.creator = text("Creator");
        meta.producer = text("Producer");
        meta.keywords = text("Keywords");
        meta.creation_date = text("CreationDate").and_then(|d| parse_pdf_date(&d));
        meta.modified_date = text("ModDate").and_then(|d| parse_pdf_date(&d));
        meta.trapped = info.get("Trapped").and_then(|v| match v.as_name() {
            Some("True") => Some(true),
            Some("False") => Some(false),
            _ => None,
        });
    }

    let margins = &config.params.page_crop_margins;
    File {
        name,
        path,
        page_count,
        crop_top: margins.top,
        crop_bottom: margins.bottom,
        crop_left: margins.left,
        crop_right: margins.right,
        file_meta: meta,
    }
}

/// Collect the per-page text boxes: layout text, minus boxes in the crop
/// margins, minus boxes covered by figures/tables/rects, minus whitespace
/// noise.
fn collect_textboxes<S: PdfSource>(
    source: &S,
    pages: &[Page],
    figures: &[crate::model::figure::Figure],
    tables: &[crate::model::table::Table],
    rects: &[crate::model::rect::Rect],
    config: &ExtractionConfig,
    cancel: &CancelToken,
) -> Result<BTreeMap<u32, Vec<HorizontalBox>>> {
    info!("extracting layout text ...");
    let params = &config.params;
    let mut page_boxes = BTreeMap::new();

    for page in pages {
        cancel.check()?;
        let (texts, _, _) = layout::partition_layout(source.layout(page.number));

        let cropped = layout::apply_page_crop(
            texts,
            &params.page_crop_margins,
            page.width,
            page.height,
        );

        let page_regions: Vec<crate::geometry::BoundingBox> = figures
            .iter()
            .filter(|f| f.position.page == page.number)
            .map(|f| f.position.bbox())
            .chain(
                tables
                    .iter()
                    .filter(|t| t.position.page == page.number)
                    .map(|t| t.position.bbox()),
            )
            .chain(
                rects
                    .iter()
                    .filter(|r| r.position.page == page.number)
                    .map(|r| r.position.bbox()),
            )
            .collect();

        let excluded =
            exclusion::exclude_covered_textboxes(cropped, &page_regions, params.table_margin);
        let cleaned = exclusion::drop_noise_boxes(excluded);
        page_boxes.insert(page.number, cleaned);
    }

    Ok(page_boxes)
}
