//! Demo catalog: 19 products across drinks, snacks, chips and healthy
//! options, plus a set of store FAQs.
//!
//! Seeding goes through [`Catalog::create`], so every record is validated
//! and embedded exactly like a user-created one. A corpus that already
//! holds records is left untouched.

use serde::{Deserialize, Serialize};
use tracing::info;

use ragdesk_core::catalog::Catalog;
use ragdesk_core::context::RequestContext;
use ragdesk_types::error::RagError;
use ragdesk_types::record::{Faq, Product};

const SEED_JSON: &str = include_str!("../data/seed.json");

#[derive(Debug, Deserialize)]
struct SeedFile {
    products: Vec<SeedProduct>,
    faqs: Vec<SeedFaq>,
}

#[derive(Debug, Deserialize)]
struct SeedProduct {
    name: String,
    price: f64,
    quantity: f64,
}

#[derive(Debug, Deserialize)]
struct SeedFaq {
    question: String,
    answer: String,
}

/// Records created by [`seed_catalog`]; zero for a corpus that was skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub products: usize,
    pub faqs: usize,
}

fn seed_file() -> Result<SeedFile, RagError> {
    serde_json::from_str(SEED_JSON)
        .map_err(|e| RagError::InvalidInput(format!("bundled seed data is invalid: {e}")))
}

/// The bundled demo products, with fresh ids.
pub fn demo_products() -> Result<Vec<Product>, RagError> {
    Ok(seed_file()?
        .products
        .into_iter()
        .map(|p| Product::new(p.name, p.price, p.quantity))
        .collect())
}

/// The bundled demo FAQs, with fresh ids.
pub fn demo_faqs() -> Result<Vec<Faq>, RagError> {
    Ok(seed_file()?
        .faqs
        .into_iter()
        .map(|f| Faq::new(f.question, f.answer))
        .collect())
}

/// Load the demo catalog into every empty corpus.
pub async fn seed_catalog(
    products: &Catalog<Product>,
    faqs: &Catalog<Faq>,
    ctx: &RequestContext,
) -> Result<SeedReport, RagError> {
    let mut report = SeedReport::default();

    if products.count().await? == 0 {
        for product in demo_products()? {
            products.create(product, ctx).await?;
            report.products += 1;
        }
    }
    if faqs.count().await? == 0 {
        for faq in demo_faqs()? {
            faqs.create(faq, ctx).await?;
            report.faqs += 1;
        }
    }

    info!(
        products = report.products,
        faqs = report.faqs,
        "demo catalog seeded"
    );
    Ok(report)
}
