//! Rect element construction.
//!
//! Drawn rectangles from the layout stream become [`Rect`] elements with
//! their fill color, the text they cover, and that text's links.

use log::info;

use crate::catalog::CatalogContext;
use crate::config::ExtractionParams;
use crate::error::Result;
use crate::extract::CancelToken;
use crate::layout;
use crate::links;
use crate::model::page::Page;
use crate::model::position::Position;
use crate::model::rect::Rect;
use crate::source::PdfSource;

/// Padding around the rect box when re-extracting its text, so glyphs on
/// the exact boundary survive the strict crop.
const TEXT_PAD: f64 = 1.0;

/// Extract all rect elements of the document.
pub fn extract_rects<S: PdfSource>(
    source: &S,
    pages: &[Page],
    catalog: &CatalogContext,
    params: &ExtractionParams,
    cancel: &CancelToken,
) -> Result<Vec<Rect>> {
    info!("extracting rects ...");
    let mut rects = Vec::new();

    for page in pages {
        cancel.check()?;
        let (_, _, rect_boxes) = layout::partition_layout(source.layout(page.number));
        let annotations = links::annotations_on_page(&catalog.annos, page.number);

        for (idx_on_page, rect_box) in rect_boxes.into_iter().enumerate() {
            let position = Position::from_bbox(rect_box.bbox, page.number);
            let textbox =
                source.textbox_in_bbox(page.number, &rect_box.bbox.expand(TEXT_PAD, TEXT_PAD));
            let link_list = match &textbox {
                Some(tb) if !annotations.is_empty() => {
                    links::extract_linked_chars(tb, annotations, &catalog.dests, params)?
                }
                _ => Vec::new(),
            };

            rects.push(Rect::new(
                idx_on_page + 1,
                position,
                textbox,
                link_list,
                rect_box.non_stroking_color,
            ));
        }
    }

    Ok(rects)
}
