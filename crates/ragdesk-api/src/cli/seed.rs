//! `rdesk seed`: load the demo catalog.

use anyhow::Result;
use console::style;

use ragdesk_infra::seed::seed_catalog;

use crate::state::AppState;

/// Seed every empty corpus with the bundled demo products and FAQs.
///
/// Corpora that already hold records are left untouched, so running the
/// command twice does not duplicate anything.
pub async fn seed(state: &AppState, json: bool) -> Result<()> {
    // Seeding embeds every record, which can outlast the per-request deadline.
    let ctx = ragdesk_core::context::RequestContext::new();

    let spinner = (!json).then(|| super::spinner("Embedding demo catalog..."));
    let result = seed_catalog(&state.products, &state.faqs, &ctx).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    if report.products == 0 && report.faqs == 0 {
        println!(
            "  {} Catalog already populated; nothing seeded.",
            style("i").blue().bold()
        );
    } else {
        println!("  {} Demo catalog loaded", style("✓").green().bold());
        println!("  Products: {}", style(report.products).bold());
        println!("  FAQs:     {}", style(report.faqs).bold());
    }
    println!();
    Ok(())
}
