//! Paragraph rendering.
//!
//! Every text box that survived exclusion and chapter matching becomes a
//! paragraph, in page order and top-down within a page. Links are attached
//! in the same pass (link resolution phase A).

use std::collections::BTreeMap;

use log::info;

use crate::catalog::CatalogContext;
use crate::config::ExtractionParams;
use crate::error::Result;
use crate::extract::CancelToken;
use crate::links;
use crate::model::paragraph::Paragraph;
use crate::model::position::Position;
use crate::model::textbox::HorizontalBox;

/// Render paragraphs from the remaining per-page text boxes.
pub fn render_paragraphs(
    page_boxes: BTreeMap<u32, Vec<HorizontalBox>>,
    catalog: &CatalogContext,
    params: &ExtractionParams,
    cancel: &CancelToken,
) -> Result<Vec<Paragraph>> {
    info!("extracting paragraphs ...");
    let mut paragraphs = Vec::new();
    let mut idx = 1usize;

    for (page, boxes) in page_boxes {
        cancel.check()?;
        let annotations = links::annotations_on_page(&catalog.annos, page);
        for textbox in boxes {
            let link_list = if annotations.is_empty() {
                Vec::new()
            } else {
                links::extract_linked_chars(&textbox, annotations, &catalog.dests, params)?
            };
            let position = Position::from_bbox(textbox.bbox(), page);
            paragraphs.push(Paragraph::new(idx, position, textbox, link_list));
            idx += 1;
        }
    }

    Ok(paragraphs)
}
