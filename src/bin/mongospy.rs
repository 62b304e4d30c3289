//! mongospy - live dashboard for MongoDB serverStatus metrics.
//!
//! Usage:
//!   mongospy                          # ./mongospy.yaml, TUI
//!   mongospy -c metrics.yaml          # custom config
//!   mongospy --uri mongodb://db:27017 # override the configured server
//!   mongospy --headless -v            # log display updates instead of drawing
//!   mongospy --status-file status.json
//!                                     # replay a captured serverStatus document

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use mongospy::config::{Config, ConfigError};
use mongospy::handoff::{Shutdown, host_channel, metric_channel};
use mongospy::provider::{FileProvider, MongoProvider, ProviderError, StatusProvider};
use mongospy::sampler::Sampler;
use mongospy::series::SeriesStore;
use mongospy::sink::{LogSink, run_consumer};
use mongospy::tui::App;

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "mongospy.yaml";

/// Live dashboard for MongoDB serverStatus metrics.
#[derive(Parser)]
#[command(name = "mongospy", about = "MongoDB serverStatus dashboard", version)]
struct Args {
    /// Path to the YAML metric configuration.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// MongoDB connection string. Overrides `uri` from the config.
    #[arg(long)]
    uri: Option<String>,

    /// Polling interval (e.g. "1s", "500ms"). Overrides `refreshInterval`.
    #[arg(short, long, value_name = "DURATION")]
    interval: Option<String>,

    /// Read serverStatus from a JSON file instead of a server.
    /// Re-read every tick, so it can be rewritten while running.
    #[arg(long, value_name = "PATH")]
    status_file: Option<PathBuf>,

    /// Log display updates instead of drawing the dashboard.
    #[arg(long)]
    headless: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,

    /// Append logs to this file. In TUI mode logs are discarded without it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Fatal startup failures.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot connect: {0}")]
    Provider(#[from] ProviderError),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) -> Result<(), StartupError> {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    if let Ok(directive) = format!("mongospy={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    match (&args.log_file, args.headless) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| StartupError::Io {
                    context: "cannot open log file",
                    source,
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, true) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        // The dashboard owns the terminal; without a log file there is
        // nowhere to write.
        (None, false) => {}
    }
    Ok(())
}

fn run(args: Args) -> Result<(), StartupError> {
    let mut config = Config::read(&args.config)?;
    if let Some(uri) = args.uri {
        config.uri = Some(uri);
    }
    if let Some(interval) = args.interval {
        config.refresh_interval = interval;
    }
    let interval = config.validate()?;
    info!(
        "Loaded {} metrics from {}",
        config.metrics.len(),
        args.config.display()
    );

    let provider: Box<dyn StatusProvider> = match args.status_file {
        Some(path) => Box::new(FileProvider::new(path)),
        None => {
            let uri = config.uri.as_deref().ok_or(ConfigError::MissingUri)?;
            let provider = MongoProvider::connect(uri)?;
            // Printed as well as logged: in TUI mode logs may go nowhere.
            if let Err(e) = provider.ping() {
                warn!("MongoDB at {} is not reachable yet: {}", provider.describe(), e);
                eprintln!(
                    "Warning: MongoDB at {} is not reachable yet ({}), will keep retrying",
                    provider.describe(),
                    e
                );
            }
            Box::new(provider)
        }
    };

    let (trigger, shutdown) = Shutdown::new();
    let signal_trigger = trigger.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        signal_trigger.fire();
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let (values_tx, values_rx) = metric_channel();
    let (hosts, hosts_rx) = host_channel();
    let sampler = Sampler::new(provider, config.metrics.clone(), interval)
        .spawn(values_tx, hosts, shutdown.clone())
        .map_err(|source| StartupError::Io {
            context: "cannot start sampler thread",
            source,
        })?;

    let mut store = SeriesStore::new(config.metrics);
    let result = if args.headless {
        let mut sink = LogSink::new();
        let ticks = run_consumer(&mut store, &values_rx, &hosts_rx, &shutdown, &mut sink);
        info!("Consumed {} ticks", ticks);
        Ok(())
    } else {
        App::new(store, values_rx, hosts_rx, shutdown, trigger.clone())
            .run()
            .map_err(|source| StartupError::Io {
                context: "terminal error",
                source,
            })
    };

    trigger.fire();
    if sampler.join().is_err() {
        error!("Sampler thread panicked");
    }
    result
}
