mod cli;
mod config;

use cli::Args;
use config::{discover_config, load_config_from_path, RunConfig};
use infra_snapshot::adapters::outbound::clock::SystemClock;
use infra_snapshot::adapters::outbound::console::StderrProgressReporter;
use infra_snapshot::adapters::outbound::filesystem::FileSystemDefinitionRepository;
use infra_snapshot::adapters::outbound::network::HttpInfrastructureGateway;
use infra_snapshot::application::cache::SnapshotCache;
use infra_snapshot::application::dto::SnapshotRequest;
use infra_snapshot::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use infra_snapshot::application::use_cases::ResolveSnapshotUseCase;
use infra_snapshot::ports::outbound::Clock;
use infra_snapshot::shared::error::{ExitCode, SnapshotError};
use infra_snapshot::shared::Result;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    init_tracing(args.log_level());

    match run(args).await {
        Ok(()) => process::exit(ExitCode::Success.as_i32()),
        Err(e) => exit_with_error(&e),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the CLI verbosity.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("infra_snapshot={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_with_error(error: &anyhow::Error) -> ! {
    let colored = std::io::stderr().is_terminal();

    if colored {
        eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
    } else {
        eprintln!("\n❌ An error occurred:\n");
    }
    eprintln!("{}", error);

    for cause in error.chain().skip(1) {
        if colored {
            eprintln!("\n{} {}", "Caused by:".yellow(), cause);
        } else {
            eprintln!("\nCaused by: {}", cause);
        }
    }

    eprintln!();
    process::exit(ExitCode::for_error(error).as_i32());
}

async fn run(args: Args) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(Path::new("."))?,
    };
    let run_config = RunConfig::merge(&args, file_config)?;
    validate_definitions_dir(&run_config.definitions_dir)?;

    let request = SnapshotRequest::new(
        args.app.as_str(),
        args.env.as_str(),
        run_config.sections.iter().copied(),
    )?;

    // Create adapters (Dependency Injection)
    let gateway = Arc::new(HttpInfrastructureGateway::new(
        &run_config.gateway_url,
        run_config.settings.call_timeout,
    )?);
    let definitions = FileSystemDefinitionRepository::new(&run_config.definitions_dir);
    let progress_reporter = if args.quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(SnapshotCache::new(
        run_config.settings.cache_ttl,
        Arc::clone(&clock),
    ));

    let use_case = ResolveSnapshotUseCase::new(
        gateway,
        definitions,
        progress_reporter,
        cache,
        clock,
        run_config.settings,
    );

    let snapshot = use_case.execute(request).await?;

    if !args.quiet {
        eprintln!("{}", FormatterFactory::progress_message(run_config.format));
    }
    let formatter = FormatterFactory::create(run_config.format);
    let output = formatter.format(&snapshot)?;

    let presenter_type = match args.output {
        Some(path) => PresenterType::File(path),
        None => PresenterType::Stdout,
    };
    PresenterFactory::create(presenter_type).present(&output)?;

    Ok(())
}

fn validate_definitions_dir(path: &Path) -> Result<()> {
    let invalid = |reason: &str| SnapshotError::Validation {
        message: format!("Definitions directory {}: {}", path.display(), reason),
    };

    let metadata = std::fs::symlink_metadata(path).map_err(|_| invalid("does not exist"))?;
    if metadata.is_symlink() {
        return Err(invalid("is a symbolic link, which is not allowed").into());
    }
    if !metadata.is_dir() {
        return Err(invalid("is not a directory").into());
    }
    Ok(())
}
