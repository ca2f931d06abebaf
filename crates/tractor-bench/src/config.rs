use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use tractor_core::model::deal::DealParams;
use tractor_core::model::rank::Rank;
use tractor_core::model::suit::Suit;
use tractor_core::model::trump::Trump;
use tractor_core::property::MAX_SEQUENCES;

const DEFAULT_SAMPLES: usize = 200;
const DEFAULT_DECKS: u8 = 2;
const DEFAULT_PLAYERS: u8 = 4;
const NAME_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Calibration run configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CalibrationConfig {
    pub run_id: String,
    pub deal: DealConfig,
    pub probes: Vec<ProbeConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CalibrationConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ConfigError::Read {
            source,
            path: path.clone(),
        })?;
        let mut cfg: CalibrationConfig = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse {
                source,
                path: path.clone(),
            })?;
        cfg.validate()
            .map_err(|source| ConfigError::Invalid { path, source })?;
        Ok(cfg)
    }

    /// Checks every block and fills defaults; no I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_name("run_id", &self.run_id)?;
        self.deal.validate()?;
        validate_probes(&self.probes, self.deal.decks)?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Output paths with every `{run_id}` substituted.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
            plots_dir: resolve_template(&self.run_id, &self.outputs.plots_dir),
        }
    }
}

/// Table and sampling parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealConfig {
    pub trump_suit: Suit,
    pub trump_rank: Rank,
    #[serde(default = "default_decks")]
    pub decks: u8,
    #[serde(default = "default_players")]
    pub players: u8,
    pub seed: Option<u64>,
    #[serde(default = "default_samples")]
    pub samples: usize,
}

impl DealConfig {
    pub fn params(&self) -> Result<DealParams, ValidationError> {
        DealParams::new(Trump::new(self.trump_suit, self.trump_rank), self.decks, self.players)
            .map_err(|err| ValidationError::InvalidField {
                field: "deal".to_string(),
                message: err.to_string(),
            })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.samples == 0 {
            return Err(ValidationError::InvalidField {
                field: "deal.samples".to_string(),
                message: "sample count must be greater than zero".to_string(),
            });
        }
        self.params().map(|_| ())
    }
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

fn default_decks() -> u8 {
    DEFAULT_DECKS
}

fn default_players() -> u8 {
    DEFAULT_PLAYERS
}

/// A property shape whose survival estimates are checked.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProbeConfig {
    pub name: String,
    pub identical: u8,
    #[serde(default = "default_sequences")]
    pub sequences: u8,
}

fn default_sequences() -> u8 {
    1
}

fn validate_probes(probes: &[ProbeConfig], decks: u8) -> Result<(), ValidationError> {
    if probes.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "probes".to_string(),
            message: "at least one probe must be specified".to_string(),
        });
    }
    let mut seen = HashSet::new();
    for probe in probes {
        validate_name("probes.name", &probe.name)?;
        if !seen.insert(probe.name.as_str()) {
            return Err(ValidationError::InvalidField {
                field: "probes".to_string(),
                message: format!("probe '{}' defined more than once", probe.name),
            });
        }
        if probe.identical == 0 || probe.identical > decks {
            return Err(ValidationError::InvalidField {
                field: format!("probes[{}].identical", probe.name),
                message: format!("identical cards must be within 1..={decks}"),
            });
        }
        if probe.sequences == 0 || usize::from(probe.sequences) > MAX_SEQUENCES {
            return Err(ValidationError::InvalidField {
                field: format!("probes[{}].sequences", probe.name),
                message: format!("sequences must be within 1..={MAX_SEQUENCES}"),
            });
        }
        if probe.identical == 1 && probe.sequences > 1 {
            return Err(ValidationError::InvalidField {
                field: format!("probes[{}].sequences", probe.name),
                message: "single cards do not form sequences".to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
    pub plots_dir: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
            ("outputs.plots_dir", &self.plots_dir),
        ] {
            if value.trim().is_empty() || resolve_template(run_id, value).components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Structured logging stays off unless asked for.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    /// Forces analyzer decision events on.
    #[serde(default)]
    pub decision_details: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            decision_details: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        self.tracing_level.trim().parse().ok()
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if !value.chars().all(|c| NAME_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: "may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
    pub plots_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "pairs_2d"
deal:
  trump_suit: hearts
  trump_rank: two
  seed: 11
probes:
  - name: "single"
    identical: 1
  - name: "pair"
    identical: 2
  - name: "tractor"
    identical: 2
    sequences: 2
outputs:
  jsonl: "bench/out/{run_id}/observations.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
  plots_dir: "bench/out/{run_id}/plots"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> CalibrationConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    #[test]
    fn loads_defaults_and_resolves_outputs() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");
        assert_eq!(cfg.deal.decks, DEFAULT_DECKS);
        assert_eq!(cfg.deal.players, DEFAULT_PLAYERS);
        assert_eq!(cfg.deal.samples, DEFAULT_SAMPLES);
        assert_eq!(cfg.probes[1].sequences, 1);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert!(!cfg.logging.decision_details);
        assert_eq!(
            cfg.resolved_outputs().jsonl,
            PathBuf::from("bench/out/pairs_2d/observations.jsonl")
        );
    }

    #[test]
    fn rejects_probe_wider_than_shoe() {
        let yaml = BASIC_YAML.replace("identical: 2\n    sequences: 2", "identical: 3\n    sequences: 2");
        let err = parse(&yaml).validate().expect_err("three of a kind from two decks");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "probes[tractor].identical"
        ));
    }

    #[test]
    fn rejects_table_that_cannot_be_dealt() {
        let yaml = BASIC_YAML.replace("seed: 11", "seed: 11\n  players: 3");
        let err = parse(&yaml).validate().expect_err("three players");
        assert!(matches!(err, ValidationError::InvalidField { field, .. } if field == "deal"));
    }

    #[test]
    fn rejects_duplicate_probes_and_bad_run_id() {
        let yaml = BASIC_YAML.replace("name: \"tractor\"", "name: \"pair\"");
        let err = parse(&yaml).validate().expect_err("duplicate probe");
        assert!(matches!(err, ValidationError::InvalidField { field, .. } if field == "probes"));

        let yaml = BASIC_YAML.replace("pairs_2d", "pairs 2d");
        let err = parse(&yaml).validate().expect_err("space in run id");
        assert!(matches!(err, ValidationError::InvalidField { field, .. } if field == "run_id"));
    }

    #[test]
    fn template_replaces_every_occurrence() {
        let yaml = BASIC_YAML.replace("bench/out/{run_id}/plots", "bench/{run_id}/{run_id}/plots");
        let mut cfg = parse(&yaml);
        cfg.validate().expect("valid");
        assert_eq!(
            cfg.resolved_outputs().plots_dir,
            PathBuf::from("bench/pairs_2d/pairs_2d/plots")
        );
    }
}
