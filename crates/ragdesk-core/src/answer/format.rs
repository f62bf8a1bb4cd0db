//! Fixed answer sentences for the deterministic paths.

use ragdesk_types::record::Priced;

use crate::aggregate::{Aggregate, RankOutcome};

pub const NO_PRODUCTS: &str = "I could not find any relevant products in the database.";
pub const NO_FAQS: &str = "Sorry, I couldn't find any relevant FAQ.";
pub const NOT_ENOUGH_FOR_RANK: &str = "Not enough products found for that ranking.";

/// Price as stored, without currency symbol or padding (`3.5`, `1.25`, `2`).
pub fn format_price(price: f64) -> String {
    format!("{price}")
}

/// English ordinal for a 1-based position (`1st`, `2nd`, `11th`, `23rd`).
pub fn ordinal(position: usize) -> String {
    let suffix = match (position % 10, position % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{position}{suffix}")
}

/// The sentence reporting an aggregation result.
pub fn sentence<R: Priced>(result: &Aggregate<'_, R>) -> String {
    match result {
        Aggregate::Count(n) => format!("There are {n} products available."),
        Aggregate::Min(record) => format!(
            "The cheapest product is {}, priced at {}.",
            record.label(),
            format_price(record.price())
        ),
        Aggregate::Max(record) => format!(
            "The most expensive product is {}, priced at {}.",
            record.label(),
            format_price(record.price())
        ),
        Aggregate::Average(avg) => {
            format!("The average price of the matched products is {avg:.2}.")
        }
        Aggregate::Rank(RankOutcome::Found { position, record }) => format!(
            "The {} most expensive product is {}, priced at {}.",
            ordinal(*position),
            record.label(),
            format_price(record.price())
        ),
        Aggregate::Rank(RankOutcome::NotEnough { .. }) => NOT_ENOUGH_FOR_RANK.to_string(),
    }
}
