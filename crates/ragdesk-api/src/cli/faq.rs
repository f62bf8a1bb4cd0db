//! FAQ CLI commands: ask, list, show, add, update, delete, search.

use anyhow::{Result, bail};
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use ragdesk_types::record::Faq;

use crate::state::AppState;

/// Answer `question` from the nearest FAQ entries.
pub async fn ask(state: &AppState, question: &str, top_n: Option<usize>, json: bool) -> Result<()> {
    let top_n = top_n.unwrap_or(state.config.retrieval.faq_top_n);
    let ctx = state.request_context();

    let spinner = (!json).then(|| super::spinner("Searching FAQs..."));
    let result = state.faq_answerer.compose(question, top_n, &ctx).await;
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
    println!();
    Ok(())
}

pub async fn list(state: &AppState, json: bool) -> Result<()> {
    let faqs = state.faqs.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&faqs)?);
        return Ok(());
    }

    if faqs.is_empty() {
        println!();
        println!(
            "  {} No FAQs yet. Add one with: {}",
            style("i").blue().bold(),
            style("rdesk faq add \"<question>\" \"<answer>\"").yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", faq_table(&faqs, None));
    println!();
    Ok(())
}

pub async fn show(state: &AppState, id: &Uuid, json: bool) -> Result<()> {
    let Some(faq) = state.faqs.get(id).await? else {
        bail!("faq not found: {id}");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&faq)?);
        return Ok(());
    }

    println!();
    print_faq(&faq);
    println!();
    Ok(())
}

pub async fn add(state: &AppState, question: String, answer: String, json: bool) -> Result<()> {
    let ctx = state.request_context();
    let faq = state.faqs.create(Faq::new(question, answer), &ctx).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&faq)?);
        return Ok(());
    }

    println!();
    println!("  {} FAQ added", style("✓").green().bold());
    println!();
    print_faq(&faq);
    println!();
    Ok(())
}

pub async fn update(
    state: &AppState,
    id: &Uuid,
    question: Option<String>,
    answer: Option<String>,
    json: bool,
) -> Result<()> {
    if question.is_none() && answer.is_none() {
        bail!("nothing to update: pass --question or --answer");
    }

    let ctx = state.request_context();
    let faq = state
        .faqs
        .update(
            id,
            |f| {
                if let Some(question) = question {
                    f.question = question;
                }
                if let Some(answer) = answer {
                    f.answer = answer;
                }
            },
            &ctx,
        )
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&faq)?);
        return Ok(());
    }

    println!();
    println!("  {} FAQ updated", style("✓").green().bold());
    println!();
    print_faq(&faq);
    println!();
    Ok(())
}

pub async fn delete(state: &AppState, id: &Uuid, json: bool) -> Result<()> {
    let ctx = state.request_context();
    let deleted = state.faqs.delete(id, &ctx).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "id": id, "deleted": deleted }))?
        );
        return Ok(());
    }

    if !deleted {
        bail!("faq not found: {id}");
    }
    println!();
    println!("  {} FAQ deleted", style("✓").green().bold());
    println!();
    Ok(())
}

pub async fn search(state: &AppState, query: &str, top_n: Option<usize>, json: bool) -> Result<()> {
    let top_n = top_n.unwrap_or(state.config.retrieval.search_top_n);
    let ctx = state.request_context();
    let ranked = state.faq_search.retrieve_ranked(query, top_n, &ctx).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!();
        println!("  {} No matching FAQs.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let faqs: Vec<Faq> = ranked.iter().map(|r| r.record.clone()).collect();
    let distances: Vec<f32> = ranked.iter().map(|r| r.distance).collect();
    println!();
    println!("{}", faq_table(&faqs, Some(&distances)));
    println!();
    Ok(())
}

fn print_faq(faq: &Faq) {
    println!("  {}  {}", style("Q:").bold(), style(&faq.question).cyan());
    println!("  {}  {}", style("A:").bold(), faq.answer);
    println!("  {}  {}", style("ID:").bold(), style(faq.id.to_string()).dim());
}

fn faq_table(faqs: &[Faq], distances: Option<&[f32]>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Question").fg(Color::White),
        Cell::new("Answer").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ];
    if distances.is_some() {
        header.push(Cell::new("Distance").fg(Color::White));
    }
    table.set_header(header);

    for (i, faq) in faqs.iter().enumerate() {
        let mut row = vec![
            Cell::new(&faq.question).fg(Color::Cyan),
            Cell::new(truncate(&faq.answer, 60)),
            Cell::new(faq.id).fg(Color::DarkGrey),
        ];
        if let Some(distance) = distances.and_then(|d| d.get(i)) {
            row.push(Cell::new(format!("{distance:.4}")).set_alignment(CellAlignment::Right));
        }
        table.add_row(row);
    }
    table
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
