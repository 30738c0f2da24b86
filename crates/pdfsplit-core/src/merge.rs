//! Merge & filter policy for candidate section ranges
//!
//! Steps, in order:
//! 1. Coalesce consecutive same-type ranges separated by at most `merge_gap` pages
//! 2. Drop ranges shorter than `min_pages`
//! 3. Coalesce the survivors again (a dropped range may have been the only
//!    thing separating two same-type neighbours)
//! 4. Number repeated section types in page order
//! 5. Fall back to one whole-document section when nothing survives
//!
//! The gap between two ranges is the number of pages strictly between them:
//! `next.start - prev.end - 1`. A gap equal to `merge_gap` merges.

use crate::error::SplitError;
use crate::types::{FinalSection, SectionRange, SectionType};
use std::collections::HashMap;

pub const DEFAULT_MIN_PAGES: u32 = 2;
pub const DEFAULT_MERGE_GAP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    min_pages: u32,
    merge_gap: u32,
}

impl MergePolicy {
    pub fn new(min_pages: u32, merge_gap: u32) -> Result<Self, SplitError> {
        if min_pages < 1 {
            return Err(SplitError::ConfigError(format!(
                "min_pages must be >= 1 (got {})",
                min_pages
            )));
        }
        Ok(Self {
            min_pages,
            merge_gap,
        })
    }

    pub fn min_pages(&self) -> u32 {
        self.min_pages
    }

    pub fn merge_gap(&self) -> u32 {
        self.merge_gap
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            min_pages: DEFAULT_MIN_PAGES,
            merge_gap: DEFAULT_MERGE_GAP,
        }
    }
}

/// Pages strictly between two ranges; 0 when they touch or overlap
pub fn page_gap(prev: &SectionRange, next: &SectionRange) -> u32 {
    next.start.saturating_sub(prev.end.saturating_add(1))
}

/// Coalesce consecutive same-type ranges whose gap is `<= merge_gap`.
/// Transitive: a merged range keeps absorbing the next one while the rule holds.
pub fn merge_ranges(mut ranges: Vec<SectionRange>, merge_gap: u32) -> Vec<SectionRange> {
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<SectionRange> = Vec::with_capacity(ranges.len());
    for next in ranges {
        match merged.last_mut() {
            Some(current)
                if current.section_type == next.section_type
                    && page_gap(&*current, &next) <= merge_gap =>
            {
                tracing::debug!(
                    "Merged {} p{}-{} into p{}-{}",
                    next.section_type,
                    next.start,
                    next.end,
                    current.start,
                    current.end
                );
                current.end = current.end.max(next.end);
                if next.confidence > current.confidence {
                    current.confidence = next.confidence;
                    current.header = next.header;
                }
            }
            _ => merged.push(next),
        }
    }
    merged
}

/// Keep ranges with at least `min_pages` pages
pub fn filter_ranges(ranges: Vec<SectionRange>, min_pages: u32) -> Vec<SectionRange> {
    ranges
        .into_iter()
        .filter(|r| {
            let keep = r.page_count() >= min_pages;
            if !keep {
                tracing::info!(
                    "Skipping {}: only {} page(s) (p{}-{})",
                    r.section_type,
                    r.page_count(),
                    r.start,
                    r.end
                );
            }
            keep
        })
        .collect()
}

/// Number every occurrence of a type that appears more than once, in page order
pub fn assign_sequences(ranges: Vec<SectionRange>) -> Vec<FinalSection> {
    let mut totals: HashMap<SectionType, u32> = HashMap::new();
    for range in &ranges {
        *totals.entry(range.section_type.clone()).or_default() += 1;
    }

    let mut seen: HashMap<SectionType, u32> = HashMap::new();
    ranges
        .into_iter()
        .map(|range| {
            let sequence = if totals[&range.section_type] > 1 {
                let counter = seen.entry(range.section_type.clone()).or_default();
                *counter += 1;
                Some(*counter)
            } else {
                None
            };
            FinalSection { range, sequence }
        })
        .collect()
}

/// Whole-document section used when nothing else survives
pub fn fallback_section(total_pages: u32) -> FinalSection {
    FinalSection {
        range: SectionRange {
            section_type: SectionType::fallback(),
            start: 1,
            end: total_pages,
            confidence: 0,
            header: String::new(),
        },
        sequence: None,
    }
}

/// Run the full merge & filter policy over a document's candidate ranges.
///
/// Returns an empty list only for a document without pages.
pub fn finalize_sections(
    candidates: Vec<SectionRange>,
    total_pages: u32,
    policy: &MergePolicy,
) -> Vec<FinalSection> {
    if total_pages == 0 {
        return Vec::new();
    }

    let merged = merge_ranges(candidates, policy.merge_gap);
    let survivors = filter_ranges(merged, policy.min_pages);
    let settled = merge_ranges(survivors, policy.merge_gap);

    if settled.is_empty() {
        tracing::info!(
            "No section survived filtering, using whole document ({} pages)",
            total_pages
        );
        return vec![fallback_section(total_pages)];
    }

    assign_sequences(settled)
}
