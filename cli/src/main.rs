//! Loregraph CLI: ask questions from the terminal
//!
//! Runs the same pipeline as the HTTP server, in-process, configured from the
//! environment.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use loregraph::catalog::EXAMPLE_QUESTIONS;
use loregraph::rag::{EnvBootstrap, PipelineService, QaResponse};
use loregraph::{AppConfig, PipelineError, ServerConfig};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loregraph", version, about = "Lord of the Rings knowledge graph Q&A")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Abort when the store rejects the generated query (also LOREGRAPH_STRICT_EXECUTION)
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Ask {
        /// The question, in plain English
        question: String,
    },
    /// Start an interactive question loop
    Shell,
    /// Show graph statistics
    Stats,
    /// List example questions
    Examples,
    /// Show initialization state
    Health,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Examples => run_examples(&cli.format),
        Commands::Ask { ref question } => match connect(cli.strict).await {
            Ok(service) => run_ask(&service, question, &cli.format).await,
            Err(e) => Err(e.into()),
        },
        Commands::Shell => match connect(cli.strict).await {
            Ok(service) => run_shell(&service, &cli.format).await,
            Err(e) => Err(e.into()),
        },
        Commands::Stats => match connect(cli.strict).await {
            Ok(service) => run_stats(&service, &cli.format).await,
            Err(e) => Err(e.into()),
        },
        Commands::Health => run_health(cli.strict).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        eprintln!("Check that the environment variables are configured correctly.");
        std::process::exit(1);
    }
}

fn service(strict: bool) -> PipelineService {
    let strict = strict || ServerConfig::from_env().map(|c| c.strict_execution).unwrap_or(false);
    PipelineService::new(Arc::new(EnvBootstrap), strict)
}

async fn connect(strict: bool) -> Result<PipelineService, PipelineError> {
    eprintln!("Initializing connections...");
    let service = service(strict);
    service.initialize().await?;
    Ok(service)
}

fn print_answer(response: &QaResponse, question: &str, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "question": question,
                "answer": response.answer,
                "cypher_query": response.generated_query,
                "processing_time": (response.elapsed.as_secs_f64() * 100.0).round() / 100.0,
                "execution": response.execution,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            println!("\nCypher: {}", response.generated_query);
            println!("\nAnswer: {}", response.answer);
            println!(
                "({:.2}s, {} row(s))",
                response.elapsed.as_secs_f64(),
                response.execution.row_count
            );
        }
    }
    Ok(())
}

async fn run_ask(
    service: &PipelineService,
    question: &str,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = service.ask(question).await?;
    print_answer(&response, question, format)
}

async fn run_shell(service: &PipelineService, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("System ready! Type 'exit' to quit.");

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("\nAsk a question (or 'exit' to quit): ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question == ":quit" || question == ":q" {
            break;
        }

        match service.ask(question).await {
            Ok(response) => print_answer(&response, question, format)?,
            Err(e) => eprintln!("Error processing question: {}", e),
        }
    }

    Ok(())
}

async fn run_stats(service: &PipelineService, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let stats = service.stats().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["Metric", "Count"]);
            table.add_row(vec!["Nodes".to_string(), stats.total_nodes.to_string()]);
            table.add_row(vec!["Characters".to_string(), stats.total_characters.to_string()]);
            table.add_row(vec!["Movies".to_string(), stats.total_movies.to_string()]);
            table.add_row(vec!["Relationships".to_string(), stats.total_relationships.to_string()]);
            println!("{}", table);
        }
    }

    Ok(())
}

fn run_examples(format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(EXAMPLE_QUESTIONS)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Category", "Question", "Description"]);
            for example in EXAMPLE_QUESTIONS {
                table.add_row(vec![example.category, example.question, example.description]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

async fn run_health(strict: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = service(strict);
    let _ = service.initialize().await;
    let health = service.health().await;

    println!("Status:            {:?}", service.status().await);
    println!("Store connected:   {}", health.store_connected);
    println!("Model connected:   {}", health.model_connected);
    if let Some(err) = health.initialization_error {
        println!("Initialization:    {}", err);
    }
    if let Ok(config) = AppConfig::from_env() {
        println!("Graph store:       {} (database {})", config.graph.uri, config.graph.database);
        println!("Model:             {:?} {}", config.model.provider, config.model.model);
    }
    Ok(())
}
