//! CLI command definitions for the `rdesk` binary.
//!
//! Uses clap derive macros. Questions go through `ask` (products) and
//! `faq ask`; catalog maintenance through the `product` and `faq` groups.

pub mod ask;
pub mod faq;
pub mod product;
pub mod reindex;
pub mod seed;
pub mod status;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

use ragdesk_observe::LogFormat;
use ragdesk_types::record::Corpus;

/// Ask questions about your product catalog and FAQs.
#[derive(Parser)]
#[command(name = "rdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format (text or json).
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question about the products.
    Ask {
        /// The question, e.g. "What is the cheapest drink?".
        question: String,

        /// Number of products to retrieve (default from config).
        #[arg(long)]
        top_n: Option<usize>,

        /// Also show the detected intent and how the answer was produced.
        #[arg(long)]
        explain: bool,
    },

    /// Manage products (list, show, add, update, delete, search, reembed).
    Product {
        #[command(subcommand)]
        action: ProductCommand,
    },

    /// Ask and manage FAQs.
    Faq {
        #[command(subcommand)]
        action: FaqCommand,
    },

    /// Load the demo catalog into empty corpora.
    Seed,

    /// Regenerate embeddings (e.g. after changing the embedding model).
    Reindex {
        /// Only this corpus (products or faqs); both when omitted.
        corpus: Option<Corpus>,

        /// Re-embed every record, not only those from another model.
        #[arg(long)]
        all: bool,
    },

    /// Show configuration and corpus sizes.
    Status {
        /// Also send a minimal request to the completion provider.
        #[arg(long)]
        ping: bool,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on (default from config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// List all products.
    #[command(alias = "ls")]
    List,

    /// Show one product.
    Show { id: Uuid },

    /// Add a product.
    Add {
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "0")]
        quantity: f64,
    },

    /// Change fields of a product; its embedding is regenerated.
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        quantity: Option<f64>,
    },

    /// Delete a product and its embedding.
    #[command(alias = "rm")]
    Delete { id: Uuid },

    /// Semantic search without answering.
    Search {
        query: String,
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Regenerate one product's embedding.
    Reembed { id: Uuid },
}

#[derive(Subcommand)]
pub enum FaqCommand {
    /// Answer a question from the FAQ corpus.
    Ask {
        question: String,

        /// Number of FAQ entries to ground the answer in (default from config).
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// List all FAQs.
    #[command(alias = "ls")]
    List,

    /// Show one FAQ.
    Show { id: Uuid },

    /// Add a FAQ entry.
    Add { question: String, answer: String },

    /// Change a FAQ entry; its embedding is regenerated.
    Update {
        id: Uuid,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },

    /// Delete a FAQ entry and its embedding.
    #[command(alias = "rm")]
    Delete { id: Uuid },

    /// Semantic search without answering.
    Search {
        query: String,
        #[arg(long)]
        top_n: Option<usize>,
    },
}

/// Steady-ticking spinner for calls that wait on a provider.
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
