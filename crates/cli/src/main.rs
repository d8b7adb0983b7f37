use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::{input, report};
use grocer_core::config;
use grocer_core::config::AppConfig;
use grocer_core::pipeline;
use grocer_core::ProductClassifier;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify { names, json } => run_classify(cfg, names, json).await,
        Commands::Batch {
            input,
            concurrency,
            json,
        } => run_batch(cfg, input.as_deref(), concurrency, json).await,
        Commands::Explain { name, json } => run_explain(cfg, name, json).await,
        Commands::Taxonomy { category, json } => run_taxonomy(cfg, category.as_deref(), json),
        Commands::Cache { action } => run_cache(cfg, action).await,
    }
}

#[derive(Parser)]
#[command(name = "grocer")]
#[command(about = "Grocery product classifier", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one or more product names
    Classify {
        /// Product names, e.g. "Pams Low Fat Milk 2L"
        #[arg(required = true)]
        names: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify product names read one per line from a file or stdin
    Batch {
        /// Input file; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Maximum classifications in flight
        #[arg(long, default_value_t = 8)]
        concurrency: usize,
        /// Output JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Show how a product name is tokenized and matched
    Explain {
        name: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List taxonomy categories, or the keywords of one category
    Taxonomy {
        #[arg(long)]
        category: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the keyword embedding cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Embed the taxonomy now so later runs start from the cache
    Warm,
    /// Show cached entries per model
    Stats,
    /// Delete cached vectors
    Clear {
        /// Only clear vectors of this model id
        #[arg(long)]
        model: Option<String>,
    },
}

async fn build(cfg: &AppConfig) -> Result<Arc<ProductClassifier>> {
    let classifier = pipeline::build_classifier(cfg).await?;
    Ok(Arc::new(classifier))
}

async fn run_classify(cfg: AppConfig, names: Vec<String>, json: bool) -> Result<()> {
    let classifier = build(&cfg).await?;
    for name in names {
        let outcome = classifier.classify(&name).await;
        if json {
            println!("{}", report::outcome_json(&name, &outcome));
        } else {
            println!("{}", report::outcome_line(&name, &outcome));
        }
    }
    Ok(())
}

async fn run_batch(
    cfg: AppConfig,
    source: Option<&Path>,
    concurrency: usize,
    json: bool,
) -> Result<()> {
    let names = match source {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("open {}", path.display()))?;
            input::read_names(BufReader::new(file))?
        }
        None => input::read_names(std::io::stdin().lock())?,
    };
    let classifier = build(&cfg).await?;
    let items = pipeline::classify_batch(classifier, names, concurrency).await;
    let summary = pipeline::BatchSummary::from_items(&items);
    for item in &items {
        if json {
            println!("{}", report::item_json(item));
        } else {
            println!("{}", report::outcome_line(&item.name, &item.outcome));
        }
    }
    if json {
        println!("{}", serde_json::json!({ "summary": summary }));
    } else {
        println!("{}", report::summary_line(&summary));
    }
    Ok(())
}

async fn run_explain(cfg: AppConfig, name: String, json: bool) -> Result<()> {
    let classifier = build(&cfg).await?;
    let explanation = report::explain(&classifier, &name).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&explanation)?);
    } else {
        print!("{}", report::explanation_text(&explanation));
    }
    Ok(())
}

fn run_taxonomy(cfg: AppConfig, category: Option<&str>, json: bool) -> Result<()> {
    let taxonomy = pipeline::load_taxonomy(&cfg)?;
    match category {
        Some(name) => {
            let cat = taxonomy
                .category(name)
                .with_context(|| format!("no category named {:?}", name))?;
            if json {
                println!("{}", serde_json::to_string_pretty(cat)?);
            } else {
                for keyword in &cat.keywords {
                    println!("{}", keyword);
                }
            }
        }
        None => {
            if json {
                println!("{}", serde_json::to_string_pretty(&taxonomy)?);
            } else {
                for cat in taxonomy.categories() {
                    println!("{:<28} {:>4} keywords", cat.name, cat.keywords.len());
                }
            }
        }
    }
    Ok(())
}

async fn run_cache(cfg: AppConfig, action: CacheCommand) -> Result<()> {
    match action {
        CacheCommand::Warm => {
            if !cfg.cache.enabled {
                anyhow::bail!("cache is disabled in config");
            }
            let classifier = pipeline::build_classifier(&cfg).await?;
            let stats = classifier.build_stats();
            println!(
                "{} keywords: {} cached, {} embedded ({})",
                stats.keywords,
                stats.cache_hits,
                stats.embedded,
                classifier.matcher().store().model_id()
            );
        }
        CacheCommand::Stats => {
            let pool = storage::connect(&cfg.cache.path).await?;
            storage::migrate(&pool).await?;
            let stats = storage::cache::stats(&pool).await?;
            if stats.is_empty() {
                println!("cache {} is empty", cfg.cache.path);
            }
            for s in stats {
                println!("{:<40} {:>6} entries  {:>5} dims", s.model, s.entries, s.dim);
            }
        }
        CacheCommand::Clear { model } => {
            let pool = storage::connect(&cfg.cache.path).await?;
            storage::migrate(&pool).await?;
            let removed = storage::cache::clear(&pool, model.as_deref()).await?;
            println!("removed {} cached vectors", removed);
        }
    }
    Ok(())
}
