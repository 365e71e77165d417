//! Matching outline entries to on-page text boxes.
//!
//! For every outline entry, the text boxes around the jump point compete on
//! three similarity ratios (title, number, and "number title" content). The
//! winners become the chapter headline and are withdrawn from the paragraph
//! candidate pool; entries without a convincing match produce a ghost
//! chapter at the jump target location.

use std::collections::BTreeMap;

use log::info;
use strsim::normalized_levenshtein;

use crate::catalog::outline::{Outline, OutlineEntry};
use crate::config::ExtractionParams;
use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::model::chapter::Chapter;
use crate::model::page::Page;
use crate::model::position::Position;
use crate::model::textbox::HorizontalBox;
use crate::numbering;
use crate::source::PdfSource;
use crate::utils::safe_float_cmp;

/// Per-candidate similarity ratios against an outline entry.
///
/// `number` and `content` are undefined while the entry still carries a
/// virtual number.
struct Similarity {
    title: f64,
    number: Option<f64>,
    content: Option<f64>,
}

/// Render chapters for all outline entries whose target page was extracted.
///
/// Matched text boxes are removed from `page_boxes` so they cannot become
/// paragraphs. Entries with a virtual number may have their number replaced
/// in the outline when a detached number box is found next to the matched
/// title; the outline mutation keeps the later element-to-outline mapping
/// consistent.
pub fn render_chapters<S: PdfSource>(
    source: &S,
    outline: &mut Outline,
    page_boxes: &mut BTreeMap<u32, Vec<HorizontalBox>>,
    pages: &[Page],
    params: &ExtractionParams,
) -> Result<Vec<Chapter>> {
    info!("extracting chapters ...");
    let mut chapters = Vec::new();
    render_level(source, &mut outline.entries, page_boxes, pages, params, &mut chapters)?;
    Ok(chapters)
}

fn render_level<S: PdfSource>(
    source: &S,
    entries: &mut [OutlineEntry],
    page_boxes: &mut BTreeMap<u32, Vec<HorizontalBox>>,
    pages: &[Page],
    params: &ExtractionParams,
    chapters: &mut Vec<Chapter>,
) -> Result<()> {
    for entry in entries.iter_mut() {
        let page = entry
            .position
            .page
            .and_then(|n| pages.iter().find(|p| p.number == n));
        if let Some(page) = page {
            if let Some(boxes) = page_boxes.get_mut(&page.number) {
                chapters.push(render_entry(source, entry, boxes, page, params));
            }
        }
        render_level(source, &mut entry.children, page_boxes, pages, params, chapters)?;
    }
    Ok(())
}

/// Examine one outline entry against the page's text boxes and build either
/// a matched chapter or a ghost.
fn render_entry<S: PdfSource>(
    source: &S,
    entry: &mut OutlineEntry,
    boxes: &mut Vec<HorizontalBox>,
    page: &Page,
    params: &ExtractionParams,
) -> Chapter {
    let winners = examine_entry(entry, boxes, page, params);

    let chapter = if winners.is_empty() {
        info!(
            "the chapter \"{} {}\" on page {} cannot be detected; a ghost chapter is introduced at the jump target location",
            entry.number, entry.title, page.number
        );
        let position = ghost_position(entry, page, params);
        Chapter::new(entry.title.clone(), entry.number.clone(), position, None)
    } else {
        let union = winners
            .iter()
            .map(|&i| boxes[i].bbox())
            .reduce(|a, b| a.union(&b))
            .expect("winners are non-empty");
        let position = Position::from_bbox(union, page.number);

        if winners.len() == 2 && entry.number.starts_with("virt.") {
            // number and title live in two separate boxes; adopt the printed
            // number, replacing the virtual one
            let leftmost = winners
                .iter()
                .copied()
                .min_by(|&a, &b| safe_float_cmp(boxes[a].bbox().x0, boxes[b].bbox().x0))
                .expect("winners are non-empty");
            entry.number = boxes[leftmost].text().trim().to_string();
        }

        // re-extract the headline characters with a little padding so a crop
        // exactly on the box boundary still catches every glyph
        let textbox = source.textbox_in_bbox(
            page.number,
            &union.expand(params.chapter_textbox_tolerance, params.chapter_textbox_tolerance),
        );

        let mut kill: Vec<usize> = winners.clone();
        kill.sort_unstable();
        for i in kill.into_iter().rev() {
            boxes.remove(i);
        }

        Chapter::new(entry.title.clone(), entry.number.clone(), position, textbox)
    };

    if entry.number.starts_with("virt.") {
        info!(
            "virtual number {} is applied to chapter number, so this number may not be consistent with the numerical order in the content",
            entry.number
        );
    }

    chapter
}

/// Select the text boxes forming the chapter headline, as indices into
/// `boxes`. Empty when nothing matches.
fn examine_entry(
    entry: &OutlineEntry,
    boxes: &[HorizontalBox],
    page: &Page,
    params: &ExtractionParams,
) -> Vec<usize> {
    // candidate region: full page width, half the page height vertically
    // centered on the jump point
    let y_ref = entry.position.y1;
    let rect = BoundingBox::new(
        0.0,
        (y_ref - page.height / 4.0).max(0.0),
        page.width,
        (y_ref + page.height / 4.0).min(page.height),
    );

    let candidates: Vec<usize> = (0..boxes.len())
        .filter(|&i| rect.contains(&boxes[i].bbox()))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let is_virtual = entry.number.starts_with("virt.");
    let similarities: Vec<Similarity> = candidates
        .iter()
        .map(|&i| {
            let text = boxes[i].text();
            let text = text.trim();
            let title = normalized_levenshtein(text, &entry.title);
            let (number, content) = if is_virtual {
                (None, None)
            } else {
                (
                    Some(normalized_levenshtein(text, &entry.number)),
                    Some(normalized_levenshtein(
                        text,
                        &format!("{} {}", entry.number, entry.title),
                    )),
                )
            };
            Similarity {
                title,
                number,
                content,
            }
        })
        .collect();

    referee(entry, boxes, &candidates, &similarities, params)
}

/// Decide the winner set from the similarity table.
fn referee(
    entry: &OutlineEntry,
    boxes: &[HorizontalBox],
    candidates: &[usize],
    similarities: &[Similarity],
    params: &ExtractionParams,
) -> Vec<usize> {
    let y_ref = entry.position.y1;
    let closest = |indices: Vec<usize>| -> usize {
        // tie-break equal ratios by vertical distance to the jump point
        indices
            .into_iter()
            .min_by(|&a, &b| {
                let da = (boxes[candidates[a]].bbox().y1 - y_ref).abs();
                let db = (boxes[candidates[b]].bbox().y1 - y_ref).abs();
                safe_float_cmp(da, db)
            })
            .expect("non-empty index list")
    };
    let best_by = |key: fn(&Similarity) -> f64| -> usize {
        let max = similarities
            .iter()
            .map(key)
            .max_by(|a, b| safe_float_cmp(*a, *b))
            .expect("non-empty similarity list");
        let tied = (0..similarities.len())
            .filter(|&i| key(&similarities[i]) == max)
            .collect();
        closest(tied)
    };

    let title_winner = best_by(|s| s.title);

    if entry.number.starts_with("virt.") {
        let mut winners = Vec::new();
        if similarities[title_winner].title > params.min_outline_similarity {
            winners.push(candidates[title_winner]);
            if let Some(number_box) = find_number_box(boxes, candidates, candidates[title_winner], params) {
                winners.push(number_box);
            }
        }
        return winners;
    }

    let content_winner = best_by(|s| s.content.unwrap_or(0.0));
    let number_winner = best_by(|s| s.number.unwrap_or(0.0));

    let content = similarities[content_winner].content.unwrap_or(0.0);
    let title = similarities[title_winner].title;
    let number = similarities[number_winner].number.unwrap_or(0.0);

    if content == 1.0 {
        // the box text equals "number title" exactly
        vec![candidates[content_winner]]
    } else if content < title
        && number_winner != title_winner
        && number > params.min_outline_similarity
        && title > params.min_outline_similarity
    {
        // number and title were split into two boxes by the layout analysis
        vec![candidates[number_winner], candidates[title_winner]]
    } else if title_winner == content_winner && content >= title && content > params.min_outline_similarity {
        // number and title share one box
        vec![candidates[content_winner]]
    } else {
        Vec::new()
    }
}

/// Look for a box holding only the chapter number, left of the matched title
/// on the same baseline.
fn find_number_box(
    boxes: &[HorizontalBox],
    candidates: &[usize],
    title_box: usize,
    params: &ExtractionParams,
) -> Option<usize> {
    let title_bbox = boxes[title_box].bbox();
    let matches: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| {
            let bbox = boxes[i].bbox();
            i != title_box
                && bbox.x0 < title_bbox.x0
                && (bbox.y0 - title_bbox.y0).abs() < params.chapter_rectangle_extend
                && (bbox.y1 - title_bbox.y1).abs() < params.chapter_rectangle_extend
        })
        .collect();
    // require exactly one hit and a full chapter-number match to keep
    // sidebar text from becoming a number
    if matches.len() == 1 && numbering::is_chapter_number(boxes[matches[0]].text().trim()) {
        Some(matches[0])
    } else {
        None
    }
}

/// Position of a ghost chapter: a small rectangle hanging below-right of the
/// jump point, clamped to the page.
fn ghost_position(entry: &OutlineEntry, page: &Page, params: &ExtractionParams) -> Position {
    let x0 = entry.position.x0;
    let y1 = entry.position.y1;
    let y0 = (y1 - params.chapter_rectangle_extend).max(0.0);
    let x1 = (x0 + params.chapter_rectangle_extend).min(page.width);
    Position::new(x0, y0, x1, y1, page.number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::outline::OutlinePosition;
    use crate::catalog::testsource::TestSource;
    use crate::model::textbox::{HorizontalLine, TextChar, Word};
    use crate::source::LayoutObject;

    fn textbox(text: &str, x0: f64, y0: f64, y1: f64) -> HorizontalBox {
        let step = 10.0;
        let mut x = x0;
        let words = text
            .split(' ')
            .map(|w| {
                let word = Word {
                    chars: w
                        .chars()
                        .enumerate()
                        .map(|(i, c)| TextChar {
                            text: c,
                            bbox: BoundingBox::new(
                                x + i as f64 * step,
                                y0,
                                x + (i + 1) as f64 * step,
                                y1,
                            ),
                            ncolor: None,
                            fontname: None,
                        })
                        .collect(),
                };
                x += (w.chars().count() + 1) as f64 * step;
                word
            })
            .collect();
        HorizontalBox {
            lines: vec![HorizontalLine { words }],
        }
    }

    fn entry(title: &str, number: &str, page: u32, x0: f64, y1: f64) -> OutlineEntry {
        OutlineEntry {
            title: title.to_string(),
            number: number.to_string(),
            position: OutlinePosition {
                page: Some(page),
                x0,
                y1,
            },
            children: vec![],
        }
    }

    fn page() -> Page {
        Page::new(1, 595.0, 842.0)
    }

    #[test]
    fn test_exact_content_match_wins() {
        let entry = entry("Intro", "1", 1, 72.0, 752.0);
        let boxes = vec![
            textbox("1 Intro", 72.0, 740.0, 752.0),
            textbox("Some body text", 72.0, 700.0, 712.0),
        ];
        let winners = examine_entry(&entry, &boxes, &page(), &ExtractionParams::default());
        assert_eq!(winners, vec![0]);
    }

    #[test]
    fn test_number_and_title_in_separate_boxes() {
        let entry = entry("System Overview", "2.1", 1, 72.0, 752.0);
        let boxes = vec![
            textbox("2.1", 72.0, 740.0, 752.0),
            textbox("System Overview", 120.0, 740.0, 752.0),
            textbox("unrelated paragraph text", 72.0, 650.0, 662.0),
        ];
        let winners = examine_entry(&entry, &boxes, &page(), &ExtractionParams::default());
        assert_eq!(winners, vec![0, 1]);
    }

    #[test]
    fn test_virtual_number_matches_on_title_alone() {
        let entry = entry("Disclaimer", "virt.1", 1, 72.0, 752.0);
        let boxes = vec![textbox("Disclaimer", 72.0, 740.0, 752.0)];
        let winners = examine_entry(&entry, &boxes, &page(), &ExtractionParams::default());
        assert_eq!(winners, vec![0]);
    }

    #[test]
    fn test_virtual_number_adopts_detached_number_box() {
        let mut source = TestSource::with_pages(1);
        let title_box = textbox("Overview", 100.0, 740.0, 752.0);
        let number_box = textbox("3", 72.0, 740.0, 752.0);
        source.layouts.insert(
            1,
            vec![
                LayoutObject::Text(number_box.clone()),
                LayoutObject::Text(title_box.clone()),
            ],
        );

        let mut outline = Outline {
            entries: vec![entry("Overview", "virt.1", 1, 72.0, 752.0)],
        };
        let mut page_boxes = BTreeMap::new();
        page_boxes.insert(1u32, vec![title_box, number_box]);
        let pages = vec![page()];

        let chapters = render_chapters(
            &source,
            &mut outline,
            &mut page_boxes,
            &pages,
            &ExtractionParams::default(),
        )
        .unwrap();

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, "3");
        // the outline entry was updated as well
        assert_eq!(outline.entries[0].number, "3");
        // both boxes were consumed
        assert!(page_boxes[&1].is_empty());
    }

    #[test]
    fn test_no_match_produces_ghost_chapter() {
        let mut source = TestSource::with_pages(3);
        source.layouts.insert(3, vec![]);
        let mut outline = Outline {
            entries: vec![entry("Missing Header", "virt.1", 3, 100.0, 500.0)],
        };
        let mut page_boxes = BTreeMap::new();
        page_boxes.insert(3u32, Vec::new());
        let pages: Vec<Page> = (1..=3).map(|i| Page::new(i, 595.0, 842.0)).collect();

        let chapters = render_chapters(
            &source,
            &mut outline,
            &mut page_boxes,
            &pages,
            &ExtractionParams::default(),
        )
        .unwrap();

        assert_eq!(chapters.len(), 1);
        let ghost = &chapters[0];
        assert!(ghost.is_ghost());
        assert_eq!(ghost.title, "Missing Header");
        let p = &ghost.position;
        assert_eq!((p.x0, p.y0, p.x1, p.y1), (100.0, 480.0, 120.0, 500.0));
        assert_eq!(p.page, 3);
    }

    #[test]
    fn test_dissimilar_boxes_do_not_match() {
        let entry = entry("Completely Different Heading", "4", 1, 72.0, 752.0);
        let boxes = vec![textbox("lorem ipsum dolor sit amet", 72.0, 740.0, 752.0)];
        let winners = examine_entry(&entry, &boxes, &page(), &ExtractionParams::default());
        assert!(winners.is_empty());
    }

    #[test]
    fn test_candidate_region_is_vertically_bounded() {
        // the only similar box is far below the jump point, outside the
        // half-page candidate rectangle
        let entry = entry("Intro", "1", 1, 72.0, 800.0);
        let boxes = vec![textbox("1 Intro", 72.0, 100.0, 112.0)];
        let winners = examine_entry(&entry, &boxes, &page(), &ExtractionParams::default());
        assert!(winners.is_empty());
    }
}
