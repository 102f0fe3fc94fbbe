use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arena_core::{AdaptiveQualityManager, ArenaConfig, GraphicsConfig, QualitySettings};
use arena_sim::{settings, trace, RunSummary, Scenario, TelemetryGenerator};
use clap::parser::ValueSource;
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "arena-sim")]
#[command(about = "Replay and simulate the Arena adaptive quality loop")]
struct Cli {
    /// TOML config file (defaults to ~/.arena/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Log every quality decision
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quality loop tuning; flags given here override the config file and
    /// may appear before or after the subcommand
    #[command(flatten)]
    quality: QualitySettings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a closed-loop simulation on a synthetic scenario
    Synth {
        #[arg(long, value_enum, default_value_t = Scenario::Overloaded)]
        scenario: Scenario,
        #[arg(long, default_value_t = 300)]
        ticks: u64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Frame time noise amplitude in milliseconds
        #[arg(long, default_value_t = 0.5)]
        jitter: f64,
        /// Write the generated telemetry as a CSV trace
        #[arg(long)]
        trace_out: Option<PathBuf>,
        /// Decision log path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        start: StartConfig,
    },
    /// Replay a recorded CSV trace through the quality manager
    Replay {
        /// Trace with columns fps,gpu_temp,cpu_usage,frame_time_ms
        input: PathBuf,
        /// Decision log path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        start: StartConfig,
    },
    /// Print the effective configuration as TOML
    ShowConfig,
}

/// Graphics config active on the first tick.
#[derive(Args)]
struct StartConfig {
    #[arg(long, default_value_t = 1.0)]
    start_scale: f64,
    #[arg(long, default_value = "medium")]
    start_ao: String,
    #[arg(long, default_value = "medium")]
    start_shadows: String,
}

impl StartConfig {
    fn graphics(&self) -> GraphicsConfig {
        GraphicsConfig::from_labels(self.start_scale, &self.start_ao, &self.start_shadows).clamp()
    }
}

/// Copy quality flags that were typed on the command line over `base`.
fn apply_quality_overrides(base: &mut QualitySettings, cli: &QualitySettings, matches: &ArgMatches) {
    let from_cli = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);
    if from_cli("window_capacity") {
        base.window_capacity = cli.window_capacity;
    }
    if from_cli("ridge_alpha") {
        base.ridge_alpha = cli.ridge_alpha;
    }
    if from_cli("target_frame_time_ms") {
        base.target_frame_time_ms = cli.target_frame_time_ms;
    }
    if from_cli("margin_tolerance_ms") {
        base.margin_tolerance_ms = cli.margin_tolerance_ms;
    }
    if from_cli("warmup_samples") {
        base.warmup_samples = cli.warmup_samples;
    }
}

fn init_tracing(json: bool, verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // Logs go to stderr; stdout carries CSV and TOML output.
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn log_summary(summary: &RunSummary) {
    let final_config = summary
        .final_config
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    info!(
        ticks = summary.ticks,
        scale_downs = summary.scale_downs,
        scale_ups = summary.scale_ups,
        holds = summary.holds,
        over_budget = summary.over_budget,
        mean_frame_time_ms = summary.mean_frame_time_ms,
        final_config = %final_config,
        "run complete"
    );
}

fn run(cli: Cli, matches: &ArgMatches) -> Result<()> {
    let mut config: ArenaConfig = settings::load(cli.config.as_deref())?;
    apply_quality_overrides(&mut config.quality, &cli.quality, matches);
    config.validate().context("validating effective config")?;
    let target = config.quality.target_frame_time_ms;

    match cli.command {
        Commands::Synth {
            scenario,
            ticks,
            seed,
            jitter,
            trace_out,
            output,
            start,
        } => {
            info!(scenario = scenario.label(), ticks, seed, "starting simulation");
            let mut manager = AdaptiveQualityManager::new(&config.quality)?;
            let mut generator = TelemetryGenerator::new(scenario, seed).with_jitter(jitter);
            let (samples, rows) =
                arena_sim::simulate(&mut manager, &mut generator, ticks, start.graphics())
                    .context("simulation aborted")?;

            if let Some(path) = trace_out.as_deref() {
                let file = File::create(path)
                    .with_context(|| format!("creating trace file {}", path.display()))?;
                trace::write_trace(file, &samples)?;
                info!(path = %path.display(), rows = samples.len(), "trace written");
            }
            trace::write_decisions(open_output(output.as_deref())?, &rows)?;
            log_summary(&RunSummary::from_rows(&rows, target));
        }
        Commands::Replay {
            input,
            output,
            start,
        } => {
            let file = File::open(&input)
                .with_context(|| format!("opening trace {}", input.display()))?;
            let samples = trace::read_trace(file)
                .with_context(|| format!("reading trace {}", input.display()))?;
            info!(path = %input.display(), rows = samples.len(), "replaying trace");

            let mut manager = AdaptiveQualityManager::new(&config.quality)?;
            let rows = arena_sim::replay(&mut manager, &samples, start.graphics())
                .context("replay aborted")?;
            trace::write_decisions(open_output(output.as_deref())?, &rows)?;
            log_summary(&RunSummary::from_rows(&rows, target));
        }
        Commands::ShowConfig => {
            let text = settings::to_toml(&config)?;
            io::stdout().write_all(text.as_bytes())?;
        }
    }

    Ok(())
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_tracing(cli.json_logs, cli.verbose);

    if let Err(e) = run(cli, &matches) {
        error!(error = %format!("{e:#}"), "fatal error");
        std::process::exit(1);
    }
}
