use std::path::PathBuf;

use clap::Parser;

use tractor_bench::calibration::CalibrationRunner;
use tractor_bench::config::CalibrationConfig;
use tractor_bench::logging::init_logging;

/// Checks pool survival estimates against sampled deals.
#[derive(Debug, Parser)]
#[command(
    name = "tractor-bench",
    author,
    version,
    about = "Deterministic survival calibration harness for Tractor"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/calibration.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of sampled deals.
    #[arg(long, value_name = "SAMPLES")]
    samples: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,

    /// Log analyzer decisions regardless of config (forces TRACTOR_LOG_DECISIONS=1).
    #[arg(long)]
    log_decisions: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = CalibrationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }
    if let Some(samples) = cli.samples {
        config.deal.samples = samples;
    }
    if let Some(seed) = cli.seed {
        config.deal.seed = Some(seed);
    }
    if cli.log_decisions {
        config.logging.decision_details = true;
    }

    config.validate()?;

    let outputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let probe_count = config.probes.len();
    println!(
        "Loaded configuration '{run_id}' with {probe_count} probe{} ({} samples, {} decks, {} players)",
        if probe_count == 1 { "" } else { "s" },
        config.deal.samples,
        config.deal.decks,
        config.deal.players,
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = CalibrationRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: calibration skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Calibration complete for '{run_id}': {} samples → {} rows at {}",
        summary.samples,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for probe in &summary.calibration.probes {
        println!(
            "  {}: {} observations, estimate {:.3}, observed {:.3}, Brier {:.4}",
            probe.name, probe.observations, probe.mean_estimate, probe.observed_survival, probe.brier
        );
    }
    if let Some(plot_path) = summary.plot_path.as_ref() {
        println!("Calibration plot: {}", plot_path.display());
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
