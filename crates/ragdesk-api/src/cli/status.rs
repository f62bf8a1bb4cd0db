//! System status dashboard command.

use anyhow::Result;
use console::style;

use ragdesk_infra::llm::test_provider_connection;
use ragdesk_types::config::StoreBackend;

use crate::state::AppState;

/// Display configuration and corpus sizes.
///
/// With `ping`, also sends a minimal completion request to confirm the
/// API key and endpoint work.
pub async fn status(state: &AppState, ping: bool, json: bool) -> Result<()> {
    let products = state.products.count().await?;
    let faqs = state.faqs.count().await?;

    let ping_result = if ping {
        Some(test_provider_connection(&state.provider).await)
    } else {
        None
    };

    let store = match state.config.store.backend {
        StoreBackend::Lance => "lancedb",
        StoreBackend::Memory => "memory",
    };

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "llm": {
                "provider": state.provider.name(),
                "model": state.config.llm.model,
                "reachable": ping_result.as_ref().map(Result::is_ok),
            },
            "embedding": {
                "model": state.embedder.model_name(),
                "dimension": state.embedder.dimension(),
            },
            "classifier": state.classifier_name,
            "store": store,
            "corpora": {
                "products": products,
                "faqs": faqs,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} ragdesk v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Corpora ──").dim());
    println!("  Products: {}", style(products).bold());
    println!("  FAQs:     {}", style(faqs).bold());
    println!();

    println!("  {}", style("── Models ──").dim());
    println!(
        "  Completion: {} ({})",
        style(&state.config.llm.model).cyan(),
        state.provider.name()
    );
    println!(
        "  Embedding:  {} ({} dims)",
        style(state.embedder.model_name()).cyan(),
        state.embedder.dimension()
    );
    println!("  Classifier: {}", state.classifier_name);
    if let Some(result) = &ping_result {
        match result {
            Ok(()) => println!("  Provider:   {}", style("✓ reachable").green()),
            Err(e) => println!("  Provider:   {} {e}", style("✗").red()),
        }
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Store:    {}", style(store).dim());
    println!();

    Ok(())
}
