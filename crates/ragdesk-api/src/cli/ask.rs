//! `rdesk ask`: answer a product question.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Answer `question` over the product corpus.
///
/// Aggregation questions ("cheapest", "how many", "second most expensive")
/// are answered from the retrieved products without a model call; anything
/// else is summarized by the completion model.
pub async fn ask(
    state: &AppState,
    question: &str,
    top_n: Option<usize>,
    explain: bool,
    json: bool,
) -> Result<()> {
    let top_n = top_n.unwrap_or(state.config.retrieval.product_top_n);
    let ctx = state.request_context();

    let spinner = (!json).then(|| super::spinner("Thinking..."));
    let result = state.composer.compose(question, top_n, &ctx).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let answer = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    println!();
    println!("  {}", answer.text);
    if answer.truncated {
        println!("  {}", style("(cut off at llm.max_tokens)").yellow());
    }
    if explain {
        println!();
        let intent = answer
            .intent
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} intent {} · {} · {} of {} retrieved",
            style("i").blue().bold(),
            style(intent).cyan(),
            style(answer.strategy).dim(),
            answer.retrieved,
            top_n
        );
    }
    println!();

    Ok(())
}
