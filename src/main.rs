use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::*;
use newsgenie_core::config::GEMINI_API_KEY;
use newsgenie_core::{Category, Config, QueryRequest};
use tracing_subscriber::EnvFilter;

mod app;
mod chat;

use app::App;

#[derive(Parser)]
#[command(name = "newsgenie")]
#[command(about = "Chat assistant for the latest news, web search and Gemini answers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Latest headlines for a news category
    News {
        /// One of the categories listed by `newsgenie categories`
        category: String,
    },
    /// Ask a free-text question
    Ask {
        /// Your question
        question: String,
    },
    /// List available news categories
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat);

    if let Commands::Categories = command {
        list_categories();
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        Config::new()
    });
    let keys = config.service_keys()?;

    let interactive = matches!(command, Commands::Chat);
    let gemini_api_key = match config.gemini_api_key() {
        Some(key) => key,
        None if interactive => chat::prompt_gemini_api_key()?,
        None => return Err(anyhow!("{} is not set", GEMINI_API_KEY)),
    };

    let mut app = App::new(&keys, &gemini_api_key, &config);
    tracing::debug!(model = %app.model, "session ready");

    match command {
        Commands::Chat => chat::run(&mut app).await?,
        Commands::News { category } => {
            let request = QueryRequest::parse(&category, "")?;
            chat::submit(&mut app, &request).await;
        }
        Commands::Ask { question } => {
            chat::submit(&mut app, &QueryRequest::text(question)).await;
        }
        Commands::Categories => {}
    }

    Ok(())
}

/// Logs go to stderr so chat output on stdout stays readable.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("newsgenie=warn,newsgenie_core=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn list_categories() {
    println!("\n{}", "📰 News Categories".bold().blue());
    println!("{}", "=".repeat(30).dimmed());
    for category in Category::all() {
        println!("  • {} ({})", category.display_name(), category.as_str().dimmed());
    }
}
