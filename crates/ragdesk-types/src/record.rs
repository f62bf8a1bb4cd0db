//! Catalog record types for ragdesk.
//!
//! A record is anything that lives in a vector-indexed corpus: products
//! (with numeric attributes used by aggregation) and FAQ entries (text only).
//! Every record exposes the text its embedding is computed from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// The corpus a record belongs to.
///
/// Each corpus is indexed separately; product questions never retrieve FAQ
/// entries and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corpus {
    Products,
    Faqs,
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corpus::Products => write!(f, "products"),
            Corpus::Faqs => write!(f, "faqs"),
        }
    }
}

impl FromStr for Corpus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "products" | "product" => Ok(Corpus::Products),
            "faqs" | "faq" => Ok(Corpus::Faqs),
            other => Err(format!("invalid corpus: '{other}'")),
        }
    }
}

/// A record that participates in semantic retrieval.
///
/// Implementors own exactly one embedding at a time, computed from
/// [`Record::embedding_text`].
pub trait Record: Clone + Send + Sync + 'static {
    /// The corpus this record type is indexed in.
    const CORPUS: Corpus;

    /// Unique identifier; the key of the record's embedding.
    fn id(&self) -> Uuid;

    /// Text content the embedding is computed from.
    fn embedding_text(&self) -> String;
}

/// A record with a display label and a numeric price, usable by aggregation.
pub trait Priced {
    /// Human-readable label used in answers (e.g., the product name).
    fn label(&self) -> &str;

    /// The price attribute aggregated by MIN/MAX/AVERAGE/RANK.
    fn price(&self) -> f64;
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with a fresh time-sortable ID.
    pub fn new(name: impl Into<String>, price: f64, quantity: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            price,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Product {
    const CORPUS: Corpus = Corpus::Products;

    fn id(&self) -> Uuid {
        self.id
    }

    fn embedding_text(&self) -> String {
        self.name.clone()
    }
}

impl Priced for Product {
    fn label(&self) -> &str {
        &self.name
    }

    fn price(&self) -> f64 {
        self.price
    }
}

/// A frequently asked question with its support answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: Uuid,
    /// User-facing question (what customers ask).
    pub question: String,
    /// The answer support would reply with.
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Faq {
    /// Create a new FAQ entry with a fresh time-sortable ID.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            question: question.into(),
            answer: answer.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Faq {
    const CORPUS: Corpus = Corpus::Faqs;

    fn id(&self) -> Uuid {
        self.id
    }

    /// Question and answer are embedded together.
    fn embedding_text(&self) -> String {
        format!("{} {}", self.question, self.answer)
    }
}

/// A record paired with its cosine distance to a query vector.
///
/// 0.0 means identical direction; larger is less similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecord<R> {
    pub record: R,
    pub distance: f32,
}

/// The current embedding of a record, as held by the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEmbedding {
    pub record_id: Uuid,
    pub vector: Vec<f32>,
    /// Model that produced the vector (e.g., "text-embedding-3-small").
    pub embedding_model: String,
}
