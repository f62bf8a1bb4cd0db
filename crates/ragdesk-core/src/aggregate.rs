//! Deterministic aggregation over a retrieved record set.
//!
//! Pure functions: no IO, no model calls. They operate only on the records
//! the retrieval step returned, never on the full catalog, and keep the
//! first-encountered record when prices tie.

use std::cmp::Ordering;

use ragdesk_types::intent::Intent;
use ragdesk_types::record::Priced;

/// Number of records in the set.
pub fn count<R>(records: &[R]) -> usize {
    records.len()
}

/// Record with the lowest price; the earliest one wins ties.
pub fn min_by_price<R: Priced>(records: &[R]) -> Option<&R> {
    records.iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.price() >= current.price() => Some(current),
        Some(current) if candidate.price().is_nan() => Some(current),
        _ => Some(candidate),
    })
}

/// Record with the highest price; the earliest one wins ties.
pub fn max_by_price<R: Priced>(records: &[R]) -> Option<&R> {
    records.iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.price() <= current.price() => Some(current),
        Some(current) if candidate.price().is_nan() => Some(current),
        _ => Some(candidate),
    })
}

/// Arithmetic mean of the prices, or `None` for an empty set.
pub fn average_price<R: Priced>(records: &[R]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(Priced::price).sum();
    Some(total / records.len() as f64)
}

/// Outcome of a rank lookup.
#[derive(Debug, PartialEq)]
pub enum RankOutcome<'a, R> {
    /// The record at `position` (1-based) in descending price order.
    Found { position: usize, record: &'a R },
    /// Fewer than `position` records were retrieved.
    NotEnough { position: usize, available: usize },
}

/// The record at 1-based `position` when sorted by price descending.
///
/// The sort is stable, so equal prices keep their retrieval order.
/// Position 0 is treated as 1.
pub fn rank_by_price<R: Priced>(records: &[R], position: usize) -> RankOutcome<'_, R> {
    let position = position.max(1);
    let mut ordered: Vec<&R> = records.iter().collect();
    ordered.sort_by(|a, b| b.price().partial_cmp(&a.price()).unwrap_or(Ordering::Equal));

    match ordered.get(position - 1) {
        Some(record) => RankOutcome::Found { position, record },
        None => RankOutcome::NotEnough {
            position,
            available: ordered.len(),
        },
    }
}

const ORDINALS: &[(&[&str], usize)] = &[
    (&["first", "1st"], 1),
    (&["second", "2nd"], 2),
    (&["third", "3rd"], 3),
    (&["fourth", "4th"], 4),
    (&["fifth", "5th"], 5),
    (&["sixth", "6th"], 6),
    (&["seventh", "7th"], 7),
    (&["eighth", "8th"], 8),
    (&["ninth", "9th"], 9),
    (&["tenth", "10th"], 10),
];

/// First ordinal word ("second", "3rd", ...) in the question, if any.
pub fn ordinal_in(question: &str) -> Option<usize> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .find_map(|word| {
            ORDINALS
                .iter()
                .find(|(words, _)| words.contains(&word))
                .map(|(_, position)| *position)
        })
}

/// Rank position requested by the question; defaults to 1 (the maximum).
pub fn ordinal_position(question: &str) -> usize {
    ordinal_in(question).unwrap_or(1)
}

/// Result of running a deterministic intent over the retrieved set.
#[derive(Debug, PartialEq)]
pub enum Aggregate<'a, R> {
    Count(usize),
    Min(&'a R),
    Max(&'a R),
    Average(f64),
    Rank(RankOutcome<'a, R>),
}

/// Evaluate `intent` over `records`.
///
/// Returns `None` for `Fuzzy` and for an empty set; both are handled by the
/// caller before any aggregation is attempted.
pub fn aggregate<'a, R: Priced>(
    intent: Intent,
    question: &str,
    records: &'a [R],
) -> Option<Aggregate<'a, R>> {
    if records.is_empty() {
        return None;
    }
    match intent {
        Intent::Count => Some(Aggregate::Count(count(records))),
        Intent::Min => min_by_price(records).map(Aggregate::Min),
        Intent::Max => max_by_price(records).map(Aggregate::Max),
        Intent::Average => average_price(records).map(Aggregate::Average),
        Intent::Rank => Some(Aggregate::Rank(rank_by_price(
            records,
            ordinal_position(question),
        ))),
        Intent::Fuzzy => None,
    }
}
