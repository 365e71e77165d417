//! Smart header/footer detection.
//!
//! Two layered thresholds: first, elements inside the top/bottom search
//! bands that re-occur at the same y-position on enough pages become
//! candidates. Second, candidates are validated for page-to-page continuity
//! and a bounded number of distinct y-positions; the lowest candidate row is
//! dropped and the check recurses until the remaining set looks like a real
//! header or footer.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::config::ExtractionParams;
use crate::model::page::Page;
use crate::model::position::Positioned;

/// y-coordinates are compared at fixed 4-decimal precision.
fn scaled_y(y: f64) -> i64 {
    (y * 10_000.0).round() as i64
}

/// Remove header and footer elements from `elements`.
///
/// Detection runs separately for the header band (top) and the footer band
/// (bottom); survivors of the false-positive check are removed from the
/// returned list. Running the removal a second time on its own output
/// removes nothing further.
pub fn remove_header_footer<T: Positioned>(
    elements: Vec<T>,
    pages: &[Page],
    params: &ExtractionParams,
) -> Vec<T> {
    if elements.is_empty() || pages.is_empty() {
        return elements;
    }

    let page_height = pages[0].height;
    let total_pages = pages.len();
    let info: Vec<(u32, f64, f64)> = elements
        .iter()
        .map(|e| {
            let p = e.position();
            (p.page, p.y0, p.y1)
        })
        .collect();

    let header_floor = (1.0 - params.smart_crop_margins.top) * page_height;
    let footer_ceiling = params.smart_crop_margins.bottom * page_height;

    let header_candidates = collect_candidates(&info, total_pages, params, |i| info[i].1 >= header_floor);
    let headers = reject_false_positives(header_candidates, &info, total_pages, params);

    let footer_candidates = collect_candidates(&info, total_pages, params, |i| info[i].2 <= footer_ceiling);
    let footers = reject_false_positives(footer_candidates, &info, total_pages, params);

    let remove: HashSet<usize> = headers.into_iter().chain(footers).collect();
    if !remove.is_empty() {
        debug!("removing {} header/footer elements", remove.len());
    }

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, e)| (!remove.contains(&i)).then_some(e))
        .collect()
}

/// Phase 1: occurrence-frequency sweep.
///
/// An element in the search band becomes a candidate when, on at least
/// `header_footer_occurrence * page_count` pages, some element shares its
/// y-extent within 1 pt (counted at most once per page).
fn collect_candidates(
    info: &[(u32, f64, f64)],
    total_pages: usize,
    params: &ExtractionParams,
    in_band: impl Fn(usize) -> bool,
) -> Vec<usize> {
    let mut by_page: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, (page, _, _)) in info.iter().enumerate() {
        by_page.entry(*page).or_default().push(i);
    }

    let threshold = params.header_footer_occurrence * total_pages as f64;
    let mut candidates = Vec::new();
    for i in 0..info.len() {
        if !in_band(i) {
            continue;
        }
        let mut page_count = 0usize;
        for indices in by_page.values() {
            let matched = indices.iter().any(|&j| {
                (info[i].1 - info[j].1).abs() < 1.0 && (info[i].2 - info[j].2).abs() < 1.0
            });
            if matched {
                page_count += 1;
            }
        }
        if page_count as f64 >= threshold {
            candidates.push(i);
        }
    }
    candidates
}

/// Phase 2: recursive false-positive rejection.
///
/// Groups candidates by page and looks at the lowest y0 per page. When the
/// page span has too many gaps, or the lowest y-row is neither continuous
/// nor within the unique-y budget, that row is dropped and the check
/// recurses on the rest.
fn reject_false_positives(
    mut candidates: Vec<usize>,
    info: &[(u32, f64, f64)],
    total_pages: usize,
    params: &ExtractionParams,
) -> Vec<usize> {
    if candidates.is_empty() {
        return candidates;
    }

    let mut low_by_page: BTreeMap<u32, i64> = BTreeMap::new();
    for &i in &candidates {
        let y = scaled_y(info[i].1);
        low_by_page
            .entry(info[i].0)
            .and_modify(|v| *v = (*v).min(y))
            .or_insert(y);
    }

    let start = *low_by_page.keys().next().unwrap();
    let end = *low_by_page.keys().next_back().unwrap();
    let span = (end - start + 1) as f64;
    let breaks = span - low_by_page.len() as f64;
    let low = *low_by_page.values().min().unwrap();

    if breaks / span > params.pages_missing_header_footer {
        // too many pages without any candidate: the lowest row is not a
        // header/footer boundary yet, peel it off and try again
        candidates.retain(|&i| scaled_y(info[i].1) != low);
        return reject_false_positives(candidates, info, total_pages, params);
    }

    let unique: HashSet<i64> = low_by_page.values().copied().collect();
    if unique.len() != 1 {
        let continuous: Vec<u32> = low_by_page
            .iter()
            .filter(|(_, &v)| v == low)
            .map(|(&page, _)| page)
            .collect();
        let continuous_span = (continuous[continuous.len() - 1] - continuous[0] + 1) as f64;
        let unique_budget = 1.0f64.max(params.unique_header_footer_elements * total_pages as f64);
        if (continuous.len() as f64) < continuous_span * params.header_footer_continuous
            && unique.len() as f64 > unique_budget
        {
            candidates.retain(|&i| scaled_y(info[i].1) != low);
            if !candidates.is_empty() {
                return reject_false_positives(candidates, info, total_pages, params);
            }
        }
        candidates
    } else if candidates.len() == 1 {
        // a single element at a single y-position is no repeating header
        Vec::new()
    } else {
        candidates
    }
}
