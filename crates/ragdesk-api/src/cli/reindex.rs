//! `rdesk reindex`: regenerate embeddings after a model change.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use ragdesk_core::catalog::{Catalog, CatalogEntry};
use ragdesk_core::context::RequestContext;
use ragdesk_core::embedding::pipeline::{ReindexReport, ReindexScope};
use ragdesk_types::record::Corpus;

use crate::state::AppState;

pub async fn reindex(
    state: &AppState,
    corpus: Option<Corpus>,
    all: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let scope = if all {
        ReindexScope::All
    } else {
        ReindexScope::Stale
    };
    let show_progress = !json && !quiet;
    // No deadline: a full reindex makes one embedding call per record.
    let ctx = RequestContext::new();

    let mut reports = Vec::new();
    if corpus.is_none_or(|c| c == Corpus::Products) {
        let report = run(&state.products, scope, &ctx, show_progress).await?;
        reports.push((Corpus::Products, report));
    }
    if corpus.is_none_or(|c| c == Corpus::Faqs) {
        let report = run(&state.faqs, scope, &ctx, show_progress).await?;
        reports.push((Corpus::Faqs, report));
    }

    if json {
        let summary: Vec<_> = reports
            .iter()
            .map(|(corpus, report)| {
                serde_json::json!({
                    "corpus": corpus,
                    "examined": report.examined,
                    "reembedded": report.reembedded,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    for (corpus, report) in &reports {
        println!(
            "  {} {}: {} of {} re-embedded with {}",
            style("✓").green().bold(),
            corpus,
            style(report.reembedded).bold(),
            report.examined,
            style(state.embedder.model_name()).dim()
        );
    }
    println!();
    Ok(())
}

async fn run<R: CatalogEntry>(
    catalog: &Catalog<R>,
    scope: ReindexScope,
    ctx: &RequestContext,
    show_progress: bool,
) -> Result<ReindexReport> {
    let bar = if show_progress {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {msg:<9} [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message(R::CORPUS.to_string());
        bar
    } else {
        ProgressBar::hidden()
    };

    let report = catalog
        .pipeline()
        .reindex(scope, ctx, |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        })
        .await?;
    bar.finish_and_clear();
    Ok(report)
}
