use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcp_inventory::config::{Config, Destination};
use gcp_inventory::export::sink::{BucketSink, DirectorySink, InventorySink};
use gcp_inventory::export::{self, run_name};
use gcp_inventory::gcp::auth::GcpCredentials;
use gcp_inventory::gcp::client::GcpClient;
use gcp_inventory::gcp::projects::ResourceManagerDirectory;
use gcp_inventory::inventory::{Collector, ResourceKind};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Export a GCP resource inventory across every accessible project
#[derive(Parser, Debug)]
#[command(name = "gcp-inventory", version, about, long_about = None)]
struct Args {
    /// JSON config file (default: <config dir>/gcp-inventory/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Zones to scan, comma separated (overrides ZONES)
    #[arg(short, long, value_delimiter = ',')]
    zones: Vec<String>,

    /// Regions to scan, comma separated (overrides REGIONS)
    #[arg(short, long, value_delimiter = ',')]
    regions: Vec<String>,

    /// Only list projects under this organization (overrides ORG_ID)
    #[arg(long)]
    org_id: Option<String>,

    /// Project owning the export bucket (overrides EXPORT_PROJECT_ID)
    #[arg(long)]
    export_project: Option<String>,

    /// Export bucket name (overrides EXPORT_BUCKET_NAME)
    #[arg(long)]
    export_bucket: Option<String>,

    /// Write sheets to a local directory instead of a bucket
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Resource kinds to collect, comma separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    kinds: Vec<ResourceKind>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Bearer token to use instead of Application Default Credentials
    #[arg(long)]
    access_token: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match level.to_tracing_level() {
            Some(level) => EnvFilter::new(format!("gcp_inventory={}", level.as_str().to_lowercase())),
            None => return Ok(None),
        },
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Log file: {:?}", path);
    Ok(Some(guard))
}

/// File, then environment, then flags; validated for the requested kinds
fn resolve_config(args: &Args, kinds: &[ResourceKind]) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env();

    if !args.zones.is_empty() {
        config.zones = args.zones.clone();
    }
    if !args.regions.is_empty() {
        config.regions = args.regions.clone();
    }
    if args.org_id.is_some() {
        config.org_id = args.org_id.clone();
    }
    if args.export_project.is_some() {
        config.export_project_id = args.export_project.clone();
    }
    if args.export_bucket.is_some() {
        config.export_bucket_name = args.export_bucket.clone();
    }
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir.clone();
    }

    config.validate_for(kinds)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    let kinds = if args.kinds.is_empty() {
        ResourceKind::ALL.to_vec()
    } else {
        args.kinds.clone()
    };
    let config = resolve_config(&args, &kinds).context("Invalid configuration")?;

    tracing::info!(
        "Exporting {} kinds across {} zones and {} regions",
        kinds.len(),
        config.zones.len(),
        config.regions.len()
    );

    let credentials = match &args.access_token {
        Some(token) => GcpCredentials::from_static_token(token.clone()),
        None => GcpCredentials::from_env_or_default()
            .await
            .context("Failed to initialize GCP credentials")?,
    };
    let client = GcpClient::new(credentials).context("Failed to create GCP client")?;

    let sink: Box<dyn InventorySink> = match config.destination()? {
        Destination::Directory(dir) => Box::new(DirectorySink::new(dir)),
        Destination::Bucket { project, bucket } => {
            Box::new(BucketSink::new(client.clone(), project, bucket))
        }
    };

    let directory = ResourceManagerDirectory::new(client.clone(), config.org_id.clone());
    let collector = Collector::new(Arc::new(client));

    let run = run_name(chrono::Utc::now());
    let locations = export::export_inventory(
        &directory,
        &collector,
        &config.scopes(),
        &kinds,
        sink.as_ref(),
        &run,
    )
    .await?;

    for location in &locations {
        println!("{}", location);
    }
    tracing::info!("Inventory exported: {} sheets under {}", locations.len(), run);

    Ok(())
}
