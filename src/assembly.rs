//! Element assembly and hierarchy mapping.
//!
//! All element streams are merged into one flat list sorted by page and
//! top-down position, split at the first chapter into root-level and
//! in-outline parts, filled into their chapters with fresh per-scope
//! indices, and finally nested according to the outline tree. The last pass
//! assigns every element its UID chain.

use std::collections::HashMap;

use log::debug;

use crate::catalog::outline::{Outline, OutlineEntry};
use crate::config::ExtractionParams;
use crate::error::{Error, Result};
use crate::model::chapter::Chapter;
use crate::model::element::Element;
use crate::model::figure::Figure;
use crate::model::page::Page;
use crate::model::paragraph::Paragraph;
use crate::model::position::Positioned;
use crate::model::rect::Rect;
use crate::model::table::Table;
use crate::utils::safe_float_cmp;

/// Merge all element streams into one flat list, stably sorted by
/// `(page number, top-down y)`.
pub fn merge_elements(
    chapters: Vec<Chapter>,
    paragraphs: Vec<Paragraph>,
    tables: Vec<Table>,
    figures: Vec<Figure>,
    rects: Vec<Rect>,
    pages: &[Page],
) -> Vec<Element> {
    let heights: HashMap<u32, f64> = pages.iter().map(|p| (p.number, p.height)).collect();

    let mut elements: Vec<Element> = Vec::new();
    elements.extend(figures.into_iter().map(Element::Figure));
    elements.extend(tables.into_iter().map(Element::Table));
    elements.extend(rects.into_iter().map(Element::Rect));
    elements.extend(paragraphs.into_iter().map(Element::Paragraph));
    elements.extend(chapters.into_iter().map(Element::Chapter));

    elements.sort_by(|a, b| {
        let pa = a.position();
        let pb = b.position();
        pa.page.cmp(&pb.page).then_with(|| {
            let ha = heights.get(&pa.page).copied().unwrap_or(0.0);
            let hb = heights.get(&pb.page).copied().unwrap_or(0.0);
            safe_float_cmp(ha - pa.y0, hb - pb.y0)
        })
    });

    elements
}

/// Map the flat element list into the nested outline structure.
///
/// Elements above the first outline target stay at root level; everything
/// else is distributed into the chapters, which are then nested per the
/// outline tree. Outline entries whose target page was not extracted are
/// pruned first.
pub fn map_elements_to_outline(
    elements: Vec<Element>,
    outline: &Outline,
    params: &ExtractionParams,
) -> Result<Vec<Element>> {
    let mut pruned = outline.clone();
    prune_unextracted(&mut pruned.entries);

    let first = match pruned.entries.first() {
        Some(entry) => entry,
        None => return Ok(elements),
    };
    let first_page = first.position.page.expect("pruned entries have pages");
    let boundary = first.position.y1 + params.headline_tolerance;

    let mut above = Vec::new();
    let mut in_outline = Vec::new();
    for element in elements {
        let position = element.position();
        if position.page < first_page || (position.page == first_page && position.y1 > boundary) {
            above.push(element);
        } else if position.page > first_page
            || (position.page == first_page && position.y1 < boundary)
        {
            in_outline.push(element);
        }
        // elements exactly on the boundary belong to neither side and drop
    }

    // the in-outline stream must start with a chapter; elements before the
    // first one migrate back to root level
    if let Some(first_chapter) = in_outline
        .iter()
        .position(|e| matches!(e, Element::Chapter(_)))
    {
        above.extend(in_outline.drain(..first_chapter));
    }

    let flat_chapters = fill_chapter_content(in_outline)?;

    let mut slots: Vec<Option<Chapter>> = flat_chapters.into_iter().map(Some).collect();
    let mut nested: Vec<Element> = Vec::new();
    nest_chapters(&pruned.entries, &mut slots, &mut nested);

    let mut content = above;
    content.extend(nested);
    Ok(content)
}

/// Remove outline entries (with their subtrees) whose target page is not in
/// the extracted subset.
fn prune_unextracted(entries: &mut Vec<OutlineEntry>) {
    entries.retain(|e| e.position.page.is_some());
    for entry in entries {
        prune_unextracted(&mut entry.children);
    }
}

/// Per-chapter element counters.
#[derive(Default)]
struct IdxCounters {
    paragraph: usize,
    table: usize,
    figure: usize,
    rect: usize,
}

impl IdxCounters {
    fn assign(&mut self, element: &mut Element) {
        match element {
            Element::Paragraph(p) => {
                self.paragraph += 1;
                p.idx = self.paragraph;
            }
            Element::Table(t) => {
                self.table += 1;
                t.idx = self.table;
            }
            Element::Figure(f) => {
                self.figure += 1;
                f.idx = self.figure;
            }
            Element::Rect(r) => {
                self.rect += 1;
                r.idx = self.rect;
            }
            Element::Chapter(_) => {}
        }
    }
}

/// Fill non-chapter elements into the chapter preceding them, assigning
/// fresh per-type indices that restart at every chapter.
///
/// State machine: `Scan` until the first chapter, then `InChapter`;
/// encountering a non-chapter while still scanning is a programming error
/// upstream.
fn fill_chapter_content(elements: Vec<Element>) -> Result<Vec<Chapter>> {
    let mut chapters: Vec<Chapter> = Vec::new();
    let mut counters = IdxCounters::default();

    for element in elements {
        match element {
            Element::Chapter(chapter) => {
                chapters.push(chapter);
                counters = IdxCounters::default();
            }
            mut other => {
                let current = chapters.last_mut().ok_or_else(|| {
                    Error::AssemblyInvariant(
                        "non-chapter element before the first chapter in the outline stream"
                            .to_string(),
                    )
                })?;
                counters.assign(&mut other);
                current.content.push(other);
            }
        }
    }

    Ok(chapters)
}

/// Nest the filled chapters according to the outline tree.
///
/// A chapter matches an outline entry by title and number. Unmatched
/// entries are reported and skipped together with their subtrees.
fn nest_chapters(
    entries: &[OutlineEntry],
    slots: &mut Vec<Option<Chapter>>,
    parent_content: &mut Vec<Element>,
) {
    for entry in entries {
        let found = slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|c| c.title == entry.title && c.number == entry.number)
        });
        let mut chapter = match found {
            Some(i) => slots[i].take().expect("slot checked above"),
            None => {
                debug!(
                    "outline entry \"{} {}\" has no matching chapter element; skipped",
                    entry.number, entry.title
                );
                continue;
            }
        };
        nest_chapters(&entry.children, slots, &mut chapter.content);
        parent_content.push(Element::Chapter(chapter));
    }
}

/// Re-assign per-type indices for the root scope.
///
/// Chapter content received fresh counters during filling; the root-level
/// remainder is re-indexed here so indices are dense within every scope.
pub fn assign_root_indices(content: &mut [Element]) {
    let mut counters = IdxCounters::default();
    for element in content {
        counters.assign(element);
    }
}

/// Assign every element its UID: the `/`-joined chain of identifiers from
/// the outermost chapter down.
pub fn assign_uids(content: &mut [Element]) {
    fn walk(elements: &mut [Element], prefix: &str) {
        for element in elements {
            let uid = if prefix.is_empty() {
                element.id()
            } else {
                format!("{}/{}", prefix, element.id())
            };
            element.set_uid(uid.clone());
            if let Element::Chapter(chapter) = element {
                walk(&mut chapter.content, &uid);
            }
        }
    }
    walk(content, "");
}
