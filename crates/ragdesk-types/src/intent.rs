//! Query intent types.
//!
//! An intent names the deterministic operation a product question needs, or
//! `Fuzzy` when none applies and the answer must be summarized from context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of query intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    /// Cardinality questions ("how many products").
    Count,
    /// Lowest-price lookup ("cheapest drink").
    Min,
    /// Highest-price lookup ("most expensive product").
    Max,
    /// Mean of the price attribute.
    Average,
    /// Nth most expensive item.
    Rank,
    /// Anything else; answered by grounded summarization.
    Fuzzy,
}

impl Intent {
    /// Every intent, in classifier-prompt order.
    pub const ALL: [Intent; 6] = [
        Intent::Count,
        Intent::Min,
        Intent::Max,
        Intent::Average,
        Intent::Rank,
        Intent::Fuzzy,
    ];

    /// Whether this intent is answered without a model call.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Intent::Fuzzy)
    }

    /// Normalize raw classifier output into an intent.
    ///
    /// The text is trimmed and upper-cased; anything that is not exactly one
    /// of the six tokens maps to [`Intent::Fuzzy`].
    pub fn from_classifier_output(raw: &str) -> Self {
        raw.trim().to_uppercase().parse().unwrap_or(Intent::Fuzzy)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Count => write!(f, "COUNT"),
            Intent::Min => write!(f, "MIN"),
            Intent::Max => write!(f, "MAX"),
            Intent::Average => write!(f, "AVERAGE"),
            Intent::Rank => write!(f, "RANK"),
            Intent::Fuzzy => write!(f, "FUZZY"),
        }
    }
}

impl FromStr for Intent {
    type Err = String;

    /// Strict parse: exact upper-case tokens only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COUNT" => Ok(Intent::Count),
            "MIN" => Ok(Intent::Min),
            "MAX" => Ok(Intent::Max),
            "AVERAGE" => Ok(Intent::Average),
            "RANK" => Ok(Intent::Rank),
            "FUZZY" => Ok(Intent::Fuzzy),
            other => Err(format!("invalid intent: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_roundtrip() {
        for intent in Intent::ALL {
            let s = intent.to_string();
            let parsed: Intent = s.parse().unwrap();
            assert_eq!(intent, parsed);
        }
    }

    #[test]
    fn test_classifier_output_is_trimmed_and_uppercased() {
        assert_eq!(Intent::from_classifier_output("  min \n"), Intent::Min);
        assert_eq!(Intent::from_classifier_output("Average"), Intent::Average);
        assert_eq!(Intent::from_classifier_output("RANK"), Intent::Rank);
    }

    #[test]
    fn test_unrecognized_output_defaults_to_fuzzy() {
        assert_eq!(Intent::from_classifier_output("MAYBE"), Intent::Fuzzy);
        assert_eq!(Intent::from_classifier_output(""), Intent::Fuzzy);
        assert_eq!(Intent::from_classifier_output("COUNT."), Intent::Fuzzy);
        assert_eq!(
            Intent::from_classifier_output("The answer is MIN"),
            Intent::Fuzzy
        );
    }

    #[test]
    fn test_only_fuzzy_is_non_deterministic() {
        let deterministic: Vec<_> = Intent::ALL
            .into_iter()
            .filter(Intent::is_deterministic)
            .collect();
        assert_eq!(deterministic.len(), 5);
        assert!(!Intent::Fuzzy.is_deterministic());
    }

    #[test]
    fn test_intent_serde() {
        let json = serde_json::to_string(&Intent::Average).unwrap();
        assert_eq!(json, "\"AVERAGE\"");
        let parsed: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Intent::Average);
    }
}
