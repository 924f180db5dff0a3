//! `picker` command-line entrypoint.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use picker::{
    BackfillConfig, Config, EmbeddingClient, GenaiCompletionClient, HashingEmbedder,
    HttpEmbeddingClient, InMemoryCatalog, MatchOutcome, ProductMatcher, backfill,
    default_embedding_text, render_candidate_summary,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "picker")]
#[command(about = "Pick the single best catalog product for a free-text query")]
#[command(version)]
struct Cli {
    /// JSONL catalog file (overrides PICKER_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Embedding model (overrides PICKER_EMBEDDING_MODEL)
    #[arg(long, global = true)]
    embedding_model: Option<String>,

    /// Completion model used for the selection (overrides PICKER_COMPLETION_MODEL)
    #[arg(long, global = true)]
    llm_model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the catalog against a query and let the model pick one product
    Search {
        /// Search query, e.g. "ceramic sink"
        query: String,
        /// Candidates shown to the model
        #[arg(long)]
        top_k: Option<usize>,
        /// Extra completion attempts after an unparseable reply
        #[arg(long)]
        retries: Option<u32>,
        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Embed catalog items that have no vector yet and rewrite the catalog
    Backfill {
        /// Items embedded in this run
        #[arg(long)]
        batch_size: Option<usize>,
        /// Only claim ids after this one, to move past items that keep failing
        #[arg(long)]
        start_after: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    apply_global_overrides(&mut config, &cli);

    match cli.command {
        Commands::Search {
            query,
            top_k,
            retries,
            json,
        } => {
            if let Some(k) = top_k {
                config.top_k = k;
            }
            if let Some(retries) = retries {
                config.parse_retries = retries;
            }
            config.validate()?;

            if config.embedding_stub {
                search(&config, hashing_embedder(&config)?, &query, json).await
            } else {
                let embedder = HttpEmbeddingClient::new(config.embedding_config())?;
                search(&config, embedder, &query, json).await
            }
        }
        Commands::Backfill {
            batch_size,
            start_after,
        } => {
            if let Some(size) = batch_size {
                config.backfill_batch_size = size;
            }
            config.validate()?;

            let mut backfill_config = config.backfill_config();
            backfill_config.start_after = start_after;

            if config.embedding_stub {
                run_backfill(&config, &backfill_config, hashing_embedder(&config)?).await
            } else {
                let embedder = HttpEmbeddingClient::new(config.embedding_config())?;
                run_backfill(&config, &backfill_config, embedder).await
            }
        }
    }
}

fn apply_global_overrides(config: &mut Config, cli: &Cli) {
    if let Some(path) = &cli.catalog {
        config.catalog_path = path.clone();
    }
    if let Some(model) = &cli.embedding_model {
        config.embedding_model = model.clone();
    }
    if let Some(model) = &cli.llm_model {
        config.completion_model = model.clone();
    }
}

fn hashing_embedder(config: &Config) -> anyhow::Result<HashingEmbedder> {
    tracing::warn!("PICKER_EMBEDDING_STUB set, using offline hashing embedder");
    Ok(match config.embedding_dim {
        Some(dim) => HashingEmbedder::new(dim)?,
        None => HashingEmbedder::default(),
    })
}

fn load_catalog(config: &Config) -> anyhow::Result<InMemoryCatalog> {
    InMemoryCatalog::load_jsonl(&config.catalog_path)
        .with_context(|| format!("loading catalog {}", config.catalog_path.display()))
}

async fn search<E: EmbeddingClient>(
    config: &Config,
    embedder: E,
    query: &str,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(config)?;
    let completer = GenaiCompletionClient::new(config.completion_model.clone())?;

    tracing::info!(
        completion_model = %config.completion_model,
        top_k = config.top_k,
        parse_retries = config.parse_retries,
        "Matcher ready"
    );

    let matcher = ProductMatcher::new(catalog, embedder, completer, config.matcher_config())?;
    let outcome = matcher.find_best_match(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &MatchOutcome) {
    println!("Search: {}", outcome.query);
    println!();
    println!("Found candidates:\n");
    println!("{}", render_candidate_summary(&outcome.candidates));
    println!();
    println!("LLM selection (raw):\n");
    println!("{}", outcome.raw_reply);
    println!();
    println!("Selected product ID: {}", outcome.selection.selected_id);
    println!();

    match outcome.selected_candidate() {
        Some(_) => {
            println!("Selected product details:");
            print!("{}", selected_details(outcome));
        }
        None => println!("Selected product details: <not found>"),
    }
}

/// Detail lines for the picked product, in catalog column order.
fn selected_details(outcome: &MatchOutcome) -> String {
    let Some(c) = outcome.selected_candidate() else {
        return String::new();
    };
    let price = c.price.map_or_else(|| "<none>".to_string(), |p| p.to_string());
    format!(
        "- product_id: {}\n- title: {}\n- brand: {}\n- price: {}\n- description: {}\n- confidence: {}\n",
        c.id,
        c.title,
        c.brand,
        price,
        c.description.as_deref().unwrap_or("<none>"),
        outcome.selection.confidence,
    )
}

async fn run_backfill<E: EmbeddingClient>(
    config: &Config,
    backfill_config: &BackfillConfig,
    embedder: E,
) -> anyhow::Result<()> {
    let catalog = load_catalog(config)?;

    let report = backfill(&catalog, &embedder, backfill_config, default_embedding_text).await?;

    if report.embedded_count() > 0 {
        catalog.save_jsonl(&config.catalog_path)?;
    }

    println!(
        "Backfill: {} selected, {} embedded, {} failed",
        report.selected,
        report.embedded_count(),
        report.failed_count()
    );
    for failure in &report.failed {
        println!("- {}: {}", failure.id, failure.reason);
    }
    if report.failed_count() > 0
        && let Some(last) = &report.last_claimed
    {
        println!("Failed items are retried first; pass --start-after {last} to move past them");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use picker::{Candidate, Confidence, Selection};

    use super::*;

    #[test]
    fn test_search_parsing() {
        let cli =
            Cli::try_parse_from(["picker", "search", "ceramic sink", "--top-k", "5"]).unwrap();

        match cli.command {
            Commands::Search {
                query, top_k, json, ..
            } => {
                assert_eq!(query, "ceramic sink");
                assert_eq!(top_k, Some(5));
                assert!(!json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_global_catalog_flag() {
        let cli = Cli::try_parse_from([
            "picker",
            "backfill",
            "--catalog",
            "/tmp/c.jsonl",
            "--batch-size",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.catalog, Some(PathBuf::from("/tmp/c.jsonl")));
        assert!(matches!(
            cli.command,
            Commands::Backfill {
                batch_size: Some(10),
                start_after: None,
            }
        ));
    }

    #[test]
    fn test_model_flags_override_environment_config() {
        let cli = Cli::try_parse_from([
            "picker",
            "search",
            "ceramic sink",
            "--embedding-model",
            "mxbai-embed-large",
            "--llm-model",
            "gemini-2.0-flash",
        ])
        .unwrap();
        let mut config = Config::default();
        let catalog_before = config.catalog_path.clone();

        apply_global_overrides(&mut config, &cli);

        assert_eq!(config.embedding_model, "mxbai-embed-large");
        assert_eq!(config.completion_model, "gemini-2.0-flash");
        assert_eq!(config.catalog_path, catalog_before);
    }

    #[test]
    fn test_model_flags_are_optional() {
        let cli = Cli::try_parse_from(["picker", "backfill"]).unwrap();
        let mut config = Config::default();
        let defaults = Config::default();

        apply_global_overrides(&mut config, &cli);

        assert_eq!(config.embedding_model, defaults.embedding_model);
        assert_eq!(config.completion_model, defaults.completion_model);
    }

    #[test]
    fn test_selected_details_order() {
        let candidate = Candidate {
            id: "A".to_string(),
            title: "Ceramic Kitchen Sink".to_string(),
            brand: "Kohler".to_string(),
            description: Some("Fireclay".to_string()),
            price: Some(249.5),
            distance: 0.1,
            similarity: 0.9,
        };
        let outcome = MatchOutcome {
            run_id: uuid::Uuid::new_v4(),
            query: "ceramic sink".to_string(),
            selection: Selection {
                selected_id: "A".to_string(),
                product_name: "Ceramic Kitchen Sink".to_string(),
                reasoning: "Only ceramic sink.".to_string(),
                confidence: Confidence::High,
                key_features: "Fireclay".to_string(),
            },
            candidates: vec![candidate],
            prompt: String::new(),
            raw_reply: String::new(),
            attempts: 1,
            stages: Vec::new(),
        };

        assert_eq!(
            selected_details(&outcome),
            "- product_id: A\n- title: Ceramic Kitchen Sink\n- brand: Kohler\n- price: 249.5\n- description: Fireclay\n- confidence: High\n"
        );
    }

    #[test]
    fn test_backfill_start_after_flag() {
        let cli =
            Cli::try_parse_from(["picker", "backfill", "--start-after", "sku-0042"]).unwrap();

        match cli.command {
            Commands::Backfill { start_after, .. } => {
                assert_eq!(start_after.as_deref(), Some("sku-0042"));
            }
            _ => panic!("expected backfill"),
        }
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["picker", "search"]).is_err());
    }
}
