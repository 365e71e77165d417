//! Table construction from table-finder grids.
//!
//! The table finder reports geometry in the top-down convention; everything
//! is converted here. Cell text is re-extracted with a small margin so
//! glyphs leaking over the ruling lines still land in their cell. A table
//! whose box is covered by a same-page figure is dropped in favor of the
//! figure.

use log::{debug, info};

use crate::catalog::CatalogContext;
use crate::config::ExtractionParams;
use crate::error::Result;
use crate::extract::CancelToken;
use crate::geometry::BoundingBox;
use crate::links;
use crate::model::figure::Figure;
use crate::model::page::Page;
use crate::model::position::Position;
use crate::model::table::{Cell, Table};
use crate::source::{PdfSource, TableFinder, TableGrid};

/// Margin around a cell box when re-extracting its text.
const CELL_TEXT_MARGIN: f64 = 5.0;

/// Slack when testing whether a table is really a figure's interior.
const FIGURE_OVERLAP_MARGIN: f64 = 5.0;

/// Extract all tables of the document.
pub fn extract_tables<S: PdfSource, F: TableFinder>(
    source: &S,
    finder: &F,
    pages: &[Page],
    figures: &[Figure],
    catalog: &CatalogContext,
    params: &ExtractionParams,
    cancel: &CancelToken,
) -> Result<Vec<Table>> {
    info!("extracting tables ...");
    let mut tables = Vec::new();
    let mut table_idx = 1usize;

    for page in pages {
        cancel.check()?;
        for grid in finder.find_tables(page.number) {
            let bbox = grid_bbox(&grid.bbox, page.height);
            let position = Position::from_bbox(bbox, page.number);

            if covered_by_figure(&position, figures) {
                debug!(
                    "table candidate on page {} lies inside a figure; dropped",
                    page.number
                );
                continue;
            }

            let cells = extract_cells(source, &grid, page, catalog, params)?;
            tables.push(Table::new(table_idx, position, cells));
            table_idx += 1;
        }
    }

    Ok(tables)
}

fn grid_bbox(bbox: &(f64, f64, f64, f64), page_height: f64) -> BoundingBox {
    let (x0, top, x1, bottom) = *bbox;
    BoundingBox::from_topdown(x0, top, x1, bottom, page_height)
}

/// A table is dropped when a figure on the same page covers it (with a
/// little slack on every edge); the element is then represented by the
/// figure alone.
fn covered_by_figure(position: &Position, figures: &[Figure]) -> bool {
    figures.iter().any(|figure| {
        figure.position.page == position.page
            && figure
                .position
                .bbox()
                .expand(FIGURE_OVERLAP_MARGIN, FIGURE_OVERLAP_MARGIN)
                .encloses(&position.bbox())
    })
}

/// Build the cells of one grid. `None` spots (merged regions) are skipped.
fn extract_cells<S: PdfSource>(
    source: &S,
    grid: &TableGrid,
    page: &Page,
    catalog: &CatalogContext,
    params: &ExtractionParams,
) -> Result<Vec<Cell>> {
    let annotations = links::annotations_on_page(&catalog.annos, page.number);
    let mut cells = Vec::new();

    for (row_idx, row) in grid.rows.iter().enumerate() {
        for (col_idx, cell_bbox) in row.iter().enumerate() {
            let cell_bbox = match cell_bbox {
                Some(b) => grid_bbox(b, page.height),
                None => continue,
            };
            let position = Position::from_bbox(cell_bbox, page.number);

            let textbox = source.textbox_in_bbox(
                page.number,
                &cell_bbox.expand(CELL_TEXT_MARGIN, CELL_TEXT_MARGIN),
            );
            let link_list = match &textbox {
                Some(tb) if !annotations.is_empty() => {
                    links::extract_linked_chars(tb, annotations, &catalog.dests, params)?
                }
                _ => Vec::new(),
            };

            cells.push(Cell {
                row: (row_idx + 1) as u32,
                col: (col_idx + 1) as u32,
                position,
                textbox,
                links: link_list,
            });
        }
    }

    Ok(cells)
}
