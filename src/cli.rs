use clap::Parser;
use infra_snapshot::application::dto::OutputFormat;
use infra_snapshot::snapshot::domain::Section;
use std::path::PathBuf;

/// Resolve a point-in-time topology snapshot of a deployed application
#[derive(Parser, Debug)]
#[command(name = "infra-snapshot")]
#[command(version)]
#[command(
    about = "Resolve a point-in-time topology snapshot of a deployed application",
    long_about = None
)]
pub struct Args {
    /// Application name (matches app_<name>.json/.yaml in the definitions directory)
    pub app: String,

    /// Environment to resolve: dev, qa or prod
    pub env: String,

    /// Sections to resolve (comma-separated or repeated). Defaults to all sections.
    /// Valid: source, pipeline, ecs, alb, rds, s3, logs, cost, tickets, security
    #[arg(short, long = "section", value_name = "SECTION", value_delimiter = ',')]
    pub sections: Vec<Section>,

    /// Output format: json or markdown
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a config file (defaults to ./infra-snapshot.config.yml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding application definition files
    #[arg(short, long = "definitions", value_name = "DIR")]
    pub definitions_dir: Option<PathBuf>,

    /// Base URL of the infrastructure gateway
    #[arg(short, long, value_name = "URL")]
    pub gateway_url: Option<String>,

    /// Seconds after which a fetched section is considered stale
    #[arg(long = "section-ttl", value_name = "SECS")]
    pub section_ttl_secs: Option<u64>,

    /// Seconds a cached snapshot is kept
    #[arg(long = "cache-ttl", value_name = "SECS")]
    pub cache_ttl_secs: Option<u64>,

    /// Per-call gateway timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub call_timeout_secs: Option<u64>,

    /// Overall resolution deadline in seconds
    #[arg(long = "deadline", value_name = "SECS")]
    pub request_deadline_secs: Option<u64>,

    /// Maximum number of satellite sections resolved concurrently
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Show debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter directive implied by `--verbose` / `--quiet`.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
