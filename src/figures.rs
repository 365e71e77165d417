//! Figure element construction.
//!
//! The layout stream's figure boxes are filtered (size, containment,
//! overlap), then each surviving box becomes a [`Figure`] carrying the text
//! boxes completely inside it and their links. Actual image export is left
//! to callers; only the target file name is recorded.

use std::path::Path;

use log::info;

use crate::catalog::CatalogContext;
use crate::config::{ExtractionConfig, ExtractionParams, Margins};
use crate::error::Result;
use crate::extract::CancelToken;
use crate::layout::{self, figure_filter};
use crate::links;
use crate::model::figure::Figure;
use crate::model::link::Link;
use crate::model::page::Page;
use crate::model::position::Position;
use crate::model::textbox::HorizontalBox;
use crate::source::{LayoutObject, PdfSource};

/// Extract all figures of the document.
pub fn extract_figures<S: PdfSource>(
    source: &S,
    pages: &[Page],
    catalog: &CatalogContext,
    config: &ExtractionConfig,
    cancel: &CancelToken,
) -> Result<Vec<Figure>> {
    info!("extracting figures ...");
    let params = &config.params;
    let mut figures = Vec::new();

    for page in pages {
        cancel.check()?;
        let objects = source.layout(page.number);
        let (texts, figure_boxes, _) = layout::partition_layout(objects);

        // figures reaching into the fixed top/bottom crop margins are dropped;
        // without crop margins everything passes through so off-page boxes
        // still reach the clamping step of the filter
        let cropped = if params.page_crop_margins == Margins::default() {
            figure_boxes
        } else {
            let crop =
                layout::vertical_crop_region(&params.page_crop_margins, page.width, page.height);
            figure_boxes
                .into_iter()
                .filter(|f| crop.encloses(&f.bbox))
                .collect()
        };

        let filtered = figure_filter::filter_figures(cropped, params);

        for (idx_on_page, figure_box) in filtered.into_iter().enumerate() {
            let position = Position::from_bbox(figure_box.bbox, page.number);
            let (textboxes, link_list) =
                contained_text(&texts, &figure_box.bbox, page.number, catalog, params)?;

            let image_name = format!("page_{}_figure.{}.png", page.number, idx_on_page + 1);
            let rel_path = Path::new(&config.figure_dir)
                .join(image_name)
                .to_string_lossy()
                .into_owned();

            figures.push(Figure::new(
                idx_on_page + 1,
                position,
                rel_path,
                textboxes,
                link_list,
            ));
        }
    }

    Ok(figures)
}

/// Collect the text boxes completely inside a figure box, along with their
/// links.
fn contained_text(
    texts: &[HorizontalBox],
    figure_bbox: &crate::geometry::BoundingBox,
    page: u32,
    catalog: &CatalogContext,
    params: &ExtractionParams,
) -> Result<(Vec<HorizontalBox>, Vec<Link>)> {
    let annotations = links::annotations_on_page(&catalog.annos, page);
    let mut textboxes = Vec::new();
    let mut link_list = Vec::new();

    for textbox in texts {
        if !figure_bbox.contains(&textbox.bbox()) {
            continue;
        }
        if !annotations.is_empty() {
            link_list.extend(links::extract_linked_chars(
                textbox,
                annotations,
                &catalog.dests,
                params,
            )?);
        }
        textboxes.push(textbox.clone());
    }

    Ok((textboxes, link_list))
}
