mod probe;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use tractor_bot::{AnalyzerParams, DealAnalyzer};
use tractor_core::model::card::Card;
use tractor_core::model::deal::DealParams;
use tractor_core::model::deck::Deck;
use tractor_core::model::suit::Suit;

use crate::analytics::{AnalyticsError, CalibrationCollector, CalibrationSummary};
use crate::config::{CalibrationConfig, ResolvedOutputs, ValidationError};
use crate::logging::telemetry_path;

pub use probe::{Observation, observe_deal};

/// Seat whose view of the pool produces the estimates.
const OBSERVER: usize = 0;

/// Deals seeded hands and scores the pool's survival estimates against
/// what the other hands actually hold.
pub struct CalibrationRunner {
    config: CalibrationConfig,
    outputs: ResolvedOutputs,
    params: DealParams,
    settings: AnalyzerParams,
    logging_enabled: bool,
}

pub struct RunSummary {
    pub samples: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub telemetry_path: Option<PathBuf>,
    pub calibration: CalibrationSummary,
}

impl CalibrationRunner {
    pub fn new(config: CalibrationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let params = config.deal.params()?;
        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            params,
            settings: AnalyzerParams::from_env(),
        })
    }

    /// Runs every sample, streaming one JSONL row per observation.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deal.seed.unwrap_or(0));
        let mut collector = CalibrationCollector::new(&self.config.probes);
        let mut rows_written = 0usize;
        let mut sure_leads = 0usize;

        for sample_index in 0..self.config.deal.samples {
            let deal_seed = rng.next_u64();
            let deal = self
                .params
                .deal(&Deck::shuffled_with_seed(self.params.decks, deal_seed));
            let mut analyzer =
                DealAnalyzer::new(self.params, OBSERVER, self.settings).ok_or(RunnerError::Observer)?;
            let hand: Vec<Card> = deal.hands[OBSERVER].iter().collect();
            analyzer.add_cards_to_hand(&hand);
            if analyzer.suggest_sure_lead().is_some() {
                sure_leads += 1;
            }

            let observations =
                observe_deal(analyzer.engine(), analyzer.pool(), &deal, &self.config.probes);
            for observation in &observations {
                collector.record(&observation.probe, observation.estimate, observation.survived)?;
                let row = ObservationRow {
                    run_id: &self.config.run_id,
                    sample_index,
                    deal_seed,
                    probe: &observation.probe,
                    suit: observation.suit,
                    leading: observation.leading,
                    identical: observation.identical,
                    sequences: observation.sequences,
                    cards: observation
                        .cards
                        .iter()
                        .map(Card::to_string)
                        .collect::<Vec<_>>()
                        .join(","),
                    estimate: observation.estimate,
                    survived: observation.survived,
                };
                serde_json::to_writer(&mut writer, &row)?;
                writer.write_all(b"\n")?;
                rows_written += 1;
            }

            if self.logging_enabled {
                event!(
                    target: "tractor_bench::sample",
                    Level::DEBUG,
                    sample_index,
                    deal_seed,
                    observations = observations.len(),
                    "sample scored"
                );
            }
        }

        writer.flush()?;

        let calibration = collector.finalize(self.config.deal.samples, sure_leads);
        calibration.write_markdown(&self.outputs.summary_md)?;
        let plot_path = match calibration.render_plot(&self.outputs.plots_dir) {
            Ok(path) => Some(path),
            Err(err) => {
                event!(Level::WARN, error = %err, "calibration plot skipped");
                eprintln!("WARN: {err}");
                None
            }
        };

        Ok(RunSummary {
            samples: self.config.deal.samples,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            plot_path,
            telemetry_path: self.logging_enabled.then(|| telemetry_path(&self.outputs)),
            calibration,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ObservationRow<'a> {
    run_id: &'a str,
    sample_index: usize,
    deal_seed: u64,
    probe: &'a str,
    suit: Suit,
    leading: u8,
    identical: u8,
    sequences: u8,
    cards: String,
    estimate: f64,
    survived: bool,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Config(#[from] ValidationError),
    #[error("observer seat is not at the table")]
    Observer,
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize observation row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
