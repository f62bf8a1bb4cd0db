//! Product catalog CLI commands: list, show, add, update, delete, search, reembed.

use anyhow::{Result, bail};
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use ragdesk_types::record::Product;

use crate::state::AppState;

/// List all products in a table.
pub async fn list(state: &AppState, json: bool) -> Result<()> {
    let products = state.products.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!();
        println!(
            "  {} No products yet. Load the demo catalog with: {}",
            style("i").blue().bold(),
            style("rdesk seed").yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", product_table(&products, None));
    println!(
        "  {} product{}",
        products.len(),
        if products.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

pub async fn show(state: &AppState, id: &Uuid, json: bool) -> Result<()> {
    let Some(product) = state.products.get(id).await? else {
        bail!("product not found: {id}");
    };
    let embedding = state.products.embedding(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    println!();
    print_product(&product);
    match embedding {
        Some(e) => println!(
            "  {}  {} ({} dims)",
            style("Embedding:").bold(),
            style(&e.embedding_model).dim(),
            e.vector.len()
        ),
        None => println!("  {}  {}", style("Embedding:").bold(), style("missing").red()),
    }
    println!();
    Ok(())
}

pub async fn add(
    state: &AppState,
    name: String,
    price: f64,
    quantity: f64,
    json: bool,
) -> Result<()> {
    let ctx = state.request_context();
    let spinner = (!json).then(|| super::spinner("Embedding product..."));
    let result = state
        .products
        .create(Product::new(name, price, quantity), &ctx)
        .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let product = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    println!();
    println!("  {} Product added", style("✓").green().bold());
    println!();
    print_product(&product);
    println!();
    Ok(())
}

pub async fn update(
    state: &AppState,
    id: &Uuid,
    name: Option<String>,
    price: Option<f64>,
    quantity: Option<f64>,
    json: bool,
) -> Result<()> {
    if name.is_none() && price.is_none() && quantity.is_none() {
        bail!("nothing to update: pass --name, --price or --quantity");
    }

    let ctx = state.request_context();
    let product = state
        .products
        .update(
            id,
            |p| {
                if let Some(name) = name {
                    p.name = name;
                }
                if let Some(price) = price {
                    p.price = price;
                }
                if let Some(quantity) = quantity {
                    p.quantity = quantity;
                }
            },
            &ctx,
        )
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    println!();
    println!("  {} Product updated", style("✓").green().bold());
    println!();
    print_product(&product);
    println!();
    Ok(())
}

pub async fn delete(state: &AppState, id: &Uuid, json: bool) -> Result<()> {
    let ctx = state.request_context();
    let deleted = state.products.delete(id, &ctx).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "id": id, "deleted": deleted }))?
        );
        return Ok(());
    }

    if !deleted {
        bail!("product not found: {id}");
    }
    println!();
    println!("  {} Product deleted", style("✓").green().bold());
    println!();
    Ok(())
}

/// Nearest products to `query`, with their cosine distance.
pub async fn search(
    state: &AppState,
    query: &str,
    top_n: Option<usize>,
    json: bool,
) -> Result<()> {
    let top_n = top_n.unwrap_or(state.config.retrieval.search_top_n);
    let ctx = state.request_context();
    let ranked = state
        .product_search
        .retrieve_ranked(query, top_n, &ctx)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!();
        println!("  {} No matching products.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let products: Vec<Product> = ranked.iter().map(|r| r.record.clone()).collect();
    let distances: Vec<f32> = ranked.iter().map(|r| r.distance).collect();
    println!();
    println!("{}", product_table(&products, Some(&distances)));
    println!();
    Ok(())
}

/// Regenerate one product's embedding from its current name.
pub async fn reembed(state: &AppState, id: &Uuid, json: bool) -> Result<()> {
    let Some(product) = state.products.get(id).await? else {
        bail!("product not found: {id}");
    };
    let ctx = state.request_context();
    state.products.pipeline().on_update(&product, &ctx).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "id": id,
                "embedding_model": state.embedder.model_name(),
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} Re-embedded {} with {}",
        style("✓").green().bold(),
        style(&product.name).cyan(),
        style(state.embedder.model_name()).dim()
    );
    println!();
    Ok(())
}

fn print_product(product: &Product) {
    println!("  {}      {}", style("Name:").bold(), style(&product.name).cyan());
    println!("  {}     {}", style("Price:").bold(), product.price);
    println!("  {}  {}", style("Quantity:").bold(), product.quantity);
    println!(
        "  {}        {}",
        style("ID:").bold(),
        style(product.id.to_string()).dim()
    );
}

fn product_table(products: &[Product], distances: Option<&[f32]>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Price").fg(Color::White),
        Cell::new("Quantity").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ];
    if distances.is_some() {
        header.push(Cell::new("Distance").fg(Color::White));
    }
    table.set_header(header);

    for (i, product) in products.iter().enumerate() {
        let mut row = vec![
            Cell::new(&product.name).fg(Color::Cyan),
            Cell::new(product.price).set_alignment(CellAlignment::Right),
            Cell::new(product.quantity).set_alignment(CellAlignment::Right),
            Cell::new(product.id).fg(Color::DarkGrey),
        ];
        if let Some(distance) = distances.and_then(|d| d.get(i)) {
            row.push(Cell::new(format!("{distance:.4}")).set_alignment(CellAlignment::Right));
        }
        table.add_row(row);
    }
    table
}
