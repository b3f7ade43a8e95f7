use anyhow::{Context, Result};
use catalog::{DynamoDbSettings, InMemoryStore, Movie, Page};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use server::http;
use server::{BackendConfig, SearchRequest, SearchService, ServiceConfig};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// ReelSearch - Movie title search
#[derive(Parser)]
#[command(name = "reel-search")]
#[command(about = "Case-insensitive movie title search over a paginated store", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Memory,
    Dynamodb,
}

/// Where the movies live. Ignored when `--config` is given.
#[derive(Args)]
struct StoreArgs {
    /// JSON service config file (overrides the flags below)
    #[arg(long, global = true, env = "REEL_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Document store backend
    #[arg(long, global = true, value_enum, default_value = "memory", env = "REEL_SEARCH_BACKEND")]
    backend: Backend,

    /// Catalog file for the memory backend
    #[arg(long, global = true, default_value = "data/movies.json", env = "REEL_SEARCH_CATALOG")]
    catalog: PathBuf,

    /// Records scanned per page (memory backend)
    #[arg(long, global = true, default_value_t = catalog::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// AWS region (dynamodb backend)
    #[arg(long, global = true, env = "AWS_REGION")]
    region: Option<String>,

    /// Endpoint override, e.g. DynamoDB Local (dynamodb backend)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Physical table name (dynamodb backend, defaults to "Movies")
    #[arg(long, global = true)]
    table_name: Option<String>,

    /// Deadline for each page fetch, in milliseconds
    #[arg(long, global = true)]
    page_timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve GET /movies?title=... over HTTP
    Serve {
        /// Address to listen on (defaults to the config's bind_addr)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Run a single search invocation and print the response
    Search {
        /// Title fragment to search for
        #[arg(long)]
        title: Option<String>,

        /// Extra query parameters as name=value
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Show what a catalog file contains
    Catalog {
        /// Number of titles to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `search` output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => handle_serve(&cli.store, bind).await?,
        Commands::Search { title, params } => handle_search(&cli.store, title, params).await?,
        Commands::Catalog { limit } => handle_catalog(&cli.store, limit)?,
    }

    Ok(())
}

/// Resolve the service configuration once, from a file or from flags
fn resolve_config(args: &StoreArgs) -> Result<ServiceConfig> {
    if let Some(path) = &args.config {
        return ServiceConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let backend = match args.backend {
        Backend::Memory => BackendConfig::Memory {
            catalog_path: args.catalog.clone(),
            page_size: args.page_size,
        },
        Backend::Dynamodb => BackendConfig::Dynamodb(DynamoDbSettings {
            region: args.region.clone(),
            endpoint_url: args.endpoint_url.clone(),
            table_name: args.table_name.clone(),
        }),
    };

    let mut config = ServiceConfig::new(backend);
    config.page_timeout_ms = args.page_timeout_ms;
    config.validate().context("Invalid command line configuration")?;
    Ok(config)
}

fn build_service(config: &ServiceConfig) -> Result<SearchService> {
    SearchService::from_config(config).context("Failed to build search service")
}

/// Handle the 'serve' command
async fn handle_serve(args: &StoreArgs, bind: Option<SocketAddr>) -> Result<()> {
    let config = resolve_config(args)?;
    let service = Arc::new(build_service(&config)?);

    let addr = bind.unwrap_or(config.bind_addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Press Ctrl+C to shutdown");
    http::serve(listener, service).await.context("HTTP server failed")?;

    Ok(())
}

/// Handle the 'search' command
async fn handle_search(
    args: &StoreArgs,
    title: Option<String>,
    params: Vec<(String, String)>,
) -> Result<()> {
    let config = resolve_config(args)?;
    let service = build_service(&config)?;

    let mut query_parameters: HashMap<String, String> = params.into_iter().collect();
    if let Some(title) = title {
        query_parameters.insert("title".to_string(), title);
    }

    let start = Instant::now();
    let response = service.handle(&SearchRequest::new(query_parameters)).await;
    let elapsed = start.elapsed();

    let status = response.status.to_string();
    let status = if response.is_success() {
        status.green()
    } else if response.status < 500 {
        status.yellow()
    } else {
        status.red()
    };
    eprintln!("{} in {:.2?}", status.bold(), elapsed);
    println!("{}", response.body);

    Ok(())
}

/// Catalog file to inspect: the config's memory backend, or `--catalog`
fn catalog_path(args: &StoreArgs) -> Result<PathBuf> {
    if args.config.is_none() {
        return Ok(args.catalog.clone());
    }

    match resolve_config(args)?.backend {
        BackendConfig::Memory { catalog_path, .. } => Ok(catalog_path),
        BackendConfig::Dynamodb(_) => {
            anyhow::bail!("The configured backend is dynamodb, which has no catalog file")
        }
    }
}

/// Handle the 'catalog' command
fn handle_catalog(args: &StoreArgs, limit: usize) -> Result<()> {
    let path = catalog_path(args)?;
    let store = InMemoryStore::load_from_file(&path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;

    println!(
        "{}",
        format!("Catalog {}: {} records", path.display(), store.len())
            .bold()
            .blue()
    );

    let (records, _) = store
        .clone()
        .with_page_size(limit.max(1))
        .scan_segment(&match_all(), 0);
    let movies: Vec<Movie> = Page::new(records)
        .decode()
        .context("Catalog contains records that are not movies")?;

    for (i, movie) in movies.iter().enumerate().take(limit) {
        println!(
            "{}. {} [{}] {}",
            (i + 1).to_string().green(),
            movie.title,
            movie.kind,
            movie.location
        );
    }

    Ok(())
}

/// Filter that keeps every record (every title contains "")
fn match_all() -> catalog::ScanFilter {
    catalog::ScanFilter::title_contains(&catalog::SearchQuery::new(""))
}

fn parse_param(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", s))
}
