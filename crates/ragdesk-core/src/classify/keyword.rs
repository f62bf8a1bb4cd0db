//! Offline intent classification from keyword rules.

use ragdesk_types::intent::Intent;
use ragdesk_types::llm::LlmError;

use super::Classifier;
use crate::aggregate::ordinal_in;

const COUNT_PHRASES: &[&str] = &["how many", "number of", "total number", "count"];
const AVERAGE_PHRASES: &[&str] = &["average", "mean price"];
const MIN_PHRASES: &[&str] = &["cheapest", "lowest price", "least expensive", "lowest priced"];
const MAX_PHRASES: &[&str] = &[
    "most expensive",
    "priciest",
    "highest price",
    "highest priced",
    "costliest",
];

/// Classifies by phrase matching; rules are checked in a fixed order and the
/// first hit wins.
///
/// An ordinal only yields `Rank` together with a most-expensive phrase, since
/// ranking always counts down from the highest price.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn classify_text(question: &str) -> Intent {
        let q = question.to_lowercase();
        let words: Vec<&str> = q
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has = |phrases: &[&str]| phrases.iter().any(|p| contains_phrase(&words, p));

        if has(AVERAGE_PHRASES) {
            Intent::Average
        } else if has(COUNT_PHRASES) {
            Intent::Count
        } else if has(MAX_PHRASES) {
            match ordinal_in(&q) {
                Some(position) if position > 1 => Intent::Rank,
                _ => Intent::Max,
            }
        } else if has(MIN_PHRASES) {
            match ordinal_in(&q) {
                Some(position) if position > 1 => Intent::Fuzzy,
                _ => Intent::Min,
            }
        } else {
            Intent::Fuzzy
        }
    }
}

/// Whole-word match: "count" must not hit "discount" or "country".
fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    !needle.is_empty() && words.windows(needle.len()).any(|window| window == needle.as_slice())
}

impl Classifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify(&self, question: &str) -> Result<Intent, LlmError> {
        Ok(Self::classify_text(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_prompt_examples() {
        let cases = [
            ("How many products are there?", Intent::Count),
            ("Cheapest drink?", Intent::Min),
            ("Most expensive product", Intent::Max),
            ("Average price of snacks", Intent::Average),
            ("Second most expensive product", Intent::Rank),
            ("Any healthy snacks?", Intent::Fuzzy),
        ];
        for (question, expected) in cases {
            assert_eq!(KeywordClassifier::classify_text(question), expected, "{question}");
        }
    }

    #[test]
    fn test_least_expensive_is_min_not_max() {
        assert_eq!(
            KeywordClassifier::classify_text("Which item is least expensive?"),
            Intent::Min
        );
    }

    #[test]
    fn test_numeric_ordinals_rank() {
        assert_eq!(
            KeywordClassifier::classify_text("3rd most expensive snack"),
            Intent::Rank
        );
        assert_eq!(
            KeywordClassifier::classify_text("first most expensive snack"),
            Intent::Max
        );
    }

    #[test]
    fn test_nth_cheapest_falls_back_to_fuzzy() {
        assert_eq!(
            KeywordClassifier::classify_text("second cheapest drink"),
            Intent::Fuzzy
        );
    }

    #[test]
    fn test_count_matches_whole_words_only() {
        for question in [
            "Do you have any discounted snacks?",
            "Which drinks are made in my country?",
            "Can I pay from my account?",
        ] {
            assert_eq!(KeywordClassifier::classify_text(question), Intent::Fuzzy, "{question}");
        }
        assert_eq!(KeywordClassifier::classify_text("Count the snacks"), Intent::Count);
        assert_eq!(
            KeywordClassifier::classify_text("What's the number of drinks?"),
            Intent::Count
        );
    }

    #[tokio::test]
    async fn test_trait_never_fails() {
        let intent = KeywordClassifier.classify("").await.unwrap();
        assert_eq!(intent, Intent::Fuzzy);
    }
}
