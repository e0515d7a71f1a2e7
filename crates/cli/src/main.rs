//! Correlation selector trace simulator CLI.
//!
//! Replays a JSON-lines branch trace through the correlation selector
//! sitting on top of the reference gshare baseline, then prints the
//! selection report. It performs:
//! 1. **Configuration:** Built-in defaults, optionally overridden by a JSON file.
//! 2. **Replay:** Predict, speculative update and delayed resolve per branch.
//! 3. **Reporting:** Selection statistics and, on request, a correlator table dump.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use cscsim_core::baseline::GShareBaseline;
use cscsim_core::sim::TraceDriver;
use cscsim_core::sim::trace::load_trace;
use cscsim_core::{CscConfig, PredictorState};

#[derive(Parser, Debug)]
#[command(
    name = "cscsim",
    author,
    version,
    about = "Correlation selector branch predictor simulator",
    long_about = "Replay a branch trace through the correlation selector and report how predictions split between the correlator and the baseline.\n\nTraces are JSON lines: {\"seq_no\", \"piece\", \"pc\", \"class\", \"taken\", \"next_pc\"}.\nSet RUST_LOG=debug for threshold and epoch events.\n\nExamples:\n  cscsim run --trace traces/loop.jsonl\n  cscsim run --trace traces/loop.jsonl --config bloom.json --resolve-delay 32"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print selection statistics.
    Run {
        /// JSON-lines trace to replay.
        #[arg(short, long)]
        trace: PathBuf,

        /// JSON configuration file; missing fields take their defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Branches between prediction and resolution (overrides the config).
        #[arg(long)]
        resolve_delay: Option<usize>,

        /// Dump the correlator tables after the run.
        #[arg(long)]
        dump: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            trace,
            config,
            resolve_delay,
            dump,
        } => cmd_run(&trace, config.as_deref(), resolve_delay, dump),
    }
}

/// Loads the configuration at `path`, or the defaults when no path is given.
fn load_config(path: Option<&Path>) -> Result<CscConfig, String> {
    let Some(path) = path else {
        return Ok(CscConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

/// Replays `trace_path` and prints the report. Exits with code 1 on any
/// configuration or trace error.
fn cmd_run(trace_path: &Path, config_path: Option<&Path>, resolve_delay: Option<usize>, dump: bool) {
    let mut config = load_config(config_path).unwrap_or_else(|e| {
        eprintln!("[!] Config error: {e}");
        process::exit(1);
    });
    if let Some(delay) = resolve_delay {
        config.driver.resolve_delay = delay;
    }

    let records = load_trace(trace_path).unwrap_or_else(|e| {
        eprintln!("[!] Trace error: {}: {e}", trace_path.display());
        process::exit(1);
    });

    let delay = config.driver.resolve_delay;
    let state = PredictorState::new(config, GShareBaseline::default()).unwrap_or_else(|e| {
        eprintln!("[!] Invalid configuration: {e}");
        process::exit(1);
    });

    println!("[*] Trace: {} ({} branches)", trace_path.display(), records.len());
    println!(
        "    mode={:?} filter={:?} resolve_delay={delay}",
        state.config().arbiter.mode,
        state.config().effective_filter_kind()
    );

    let mut driver = TraceDriver::new(state, delay);
    driver.run(&records);
    driver.drain();

    if dump {
        println!("{}", driver.state().correlator());
    }

    driver.finish().print();
}
