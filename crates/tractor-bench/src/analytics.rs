use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::ProbeConfig;

const CONFIDENCE: f64 = 0.95;
const BINS: usize = 10;
const SERIES_COLORS: [RGBColor; 5] = [RED, BLUE, GREEN, MAGENTA, CYAN];

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("observation for unknown probe '{0}'")]
    UnknownProbe(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Plot(String),
}

/// Accumulates estimate/outcome pairs per probe, in configuration order.
pub struct CalibrationCollector {
    probes: Vec<ProbeAccumulator>,
}

impl CalibrationCollector {
    pub fn new(probes: &[ProbeConfig]) -> Self {
        Self {
            probes: probes.iter().cloned().map(ProbeAccumulator::new).collect(),
        }
    }

    pub fn record(&mut self, probe: &str, estimate: f64, survived: bool) -> Result<(), AnalyticsError> {
        let acc = self
            .probes
            .iter_mut()
            .find(|acc| acc.config.name == probe)
            .ok_or_else(|| AnalyticsError::UnknownProbe(probe.to_string()))?;
        acc.record(estimate, survived);
        Ok(())
    }

    pub fn finalize(self, samples: usize, sure_leads: usize) -> CalibrationSummary {
        CalibrationSummary {
            samples,
            sure_leads,
            probes: self.probes.into_iter().map(ProbeAccumulator::into_report).collect(),
        }
    }
}

struct ProbeAccumulator {
    config: ProbeConfig,
    estimates: Vec<f64>,
    outcomes: Vec<bool>,
}

impl ProbeAccumulator {
    fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            estimates: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    fn record(&mut self, estimate: f64, survived: bool) {
        self.estimates.push(estimate.clamp(0.0, 1.0));
        self.outcomes.push(survived);
    }

    fn into_report(self) -> ProbeReport {
        let n = self.estimates.len();
        let observed: Vec<f64> = self.outcomes.iter().map(|s| if *s { 1.0 } else { 0.0 }).collect();
        let mean_estimate = mean(&self.estimates);
        let observed_survival = mean(&observed);
        let brier = if n == 0 {
            0.0
        } else {
            self.estimates
                .iter()
                .zip(&observed)
                .map(|(estimate, outcome)| (estimate - outcome).powi(2))
                .sum::<f64>()
                / n as f64
        };

        let mut bins = vec![(0.0, 0.0, 0usize); BINS];
        for (estimate, outcome) in self.estimates.iter().zip(&observed) {
            let bin = ((estimate * BINS as f64) as usize).min(BINS - 1);
            bins[bin].0 += estimate;
            bins[bin].1 += outcome;
            bins[bin].2 += 1;
        }
        let bins = bins
            .into_iter()
            .filter(|(_, _, count)| *count > 0)
            .map(|(estimates, outcomes, count)| CalibrationBin {
                mean_estimate: estimates / count as f64,
                observed_survival: outcomes / count as f64,
                count,
            })
            .collect();

        ProbeReport {
            name: self.config.name,
            identical: self.config.identical,
            sequences: self.config.sequences,
            observations: n,
            mean_estimate,
            observed_survival,
            brier,
            ci95: proportion_interval(observed_survival, n),
            bins,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalibrationBin {
    pub mean_estimate: f64,
    pub observed_survival: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub name: String,
    pub identical: u8,
    pub sequences: u8,
    pub observations: usize,
    pub mean_estimate: f64,
    pub observed_survival: f64,
    pub brier: f64,
    pub ci95: (f64, f64),
    pub bins: Vec<CalibrationBin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalibrationSummary {
    pub samples: usize,
    /// Deals in which seat 0 held a sure lead from the start.
    pub sure_leads: usize,
    pub probes: Vec<ProbeReport>,
}

impl CalibrationSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Survival Calibration\n\n");
        rows.push_str(&format!(
            "Deals sampled: {}; with a sure opening lead: {}\n\n",
            self.samples, self.sure_leads
        ));
        rows.push_str("| Probe | Shape | Observations | Mean estimate | Observed survival | 95% CI | Brier |\n");
        rows.push_str("|-------|-------|--------------|---------------|-------------------|--------|-------|\n");
        for probe in &self.probes {
            rows.push_str(&format!(
                "| {name} | {k}x{n} | {count} | {estimate:.3} | {observed:.3} | [{low:.3}, {high:.3}] | {brier:.4} |\n",
                name = probe.name,
                k = probe.identical,
                n = probe.sequences,
                count = probe.observations,
                estimate = probe.mean_estimate,
                observed = probe.observed_survival,
                low = probe.ci95.0,
                high = probe.ci95.1,
                brier = probe.brier,
            ));
        }
        fs::write(path.as_ref(), rows).map_err(|source| AnalyticsError::Io {
            context: "writing summary markdown",
            source,
        })
    }

    /// Draws estimate against observed survival per bin, one colour per
    /// probe, over the diagonal of perfect calibration.
    pub fn render_plot(&self, dir: impl AsRef<Path>) -> Result<PathBuf, AnalyticsError> {
        let dir = dir.as_ref();
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|source| AnalyticsError::Io {
                context: "creating plots directory",
                source,
            })?;
        }

        let output_path = dir.join("calibration.png");
        let probes = self.probes.clone();

        let prev_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let plot_attempt = std::panic::catch_unwind(move || {
            let plot_err = |e: &dyn std::fmt::Display| AnalyticsError::Plot(e.to_string());
            let root = BitMapBackend::new(&output_path, (640, 640)).into_drawing_area();
            root.fill(&WHITE).map_err(|e| plot_err(&e))?;

            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption("Survival estimate vs observed", ("sans-serif", 22))
                .set_label_area_size(LabelAreaPosition::Left, 50)
                .set_label_area_size(LabelAreaPosition::Bottom, 50)
                .build_cartesian_2d(0.0f64..1.0f64, 0.0f64..1.0f64)
                .map_err(|e| plot_err(&e))?;

            chart
                .configure_mesh()
                .x_desc("Estimated survival")
                .y_desc("Observed survival")
                .draw()
                .map_err(|e| plot_err(&e))?;

            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0.0, 0.0), (1.0, 1.0)],
                    BLACK.stroke_width(1),
                )))
                .map_err(|e| plot_err(&e))?;

            for (idx, probe) in probes.iter().enumerate() {
                let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
                chart
                    .draw_series(probe.bins.iter().map(|bin| {
                        Circle::new((bin.mean_estimate, bin.observed_survival), 4, color.filled())
                    }))
                    .map_err(|e| plot_err(&e))?;
            }

            drop(chart);
            root.present().map_err(|e| plot_err(&e))?;
            drop(root);
            Ok(output_path)
        });

        std::panic::set_hook(prev_hook);

        match plot_attempt {
            Ok(result) => result,
            Err(_) => Err(AnalyticsError::Plot(
                "plotters panicked while rendering (missing font support?)".into(),
            )),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Normal-approximation interval for a proportion, clamped to [0, 1].
fn proportion_interval(p: f64, n: usize) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }
    let z = Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + CONFIDENCE / 2.0))
        .unwrap_or(1.96);
    let margin = z * (p * (1.0 - p) / n as f64).sqrt();
    ((p - margin).max(0.0), (p + margin).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(name: &str) -> ProbeConfig {
        ProbeConfig {
            name: name.to_string(),
            identical: 2,
            sequences: 1,
        }
    }

    #[test]
    fn perfect_forecasts_score_zero() {
        let mut collector = CalibrationCollector::new(&[probe("pair")]);
        collector.record("pair", 1.0, true).expect("known probe");
        collector.record("pair", 0.0, false).expect("known probe");
        let summary = collector.finalize(2, 0);
        let report = &summary.probes[0];
        assert_eq!(report.observations, 2);
        assert_eq!(report.brier, 0.0);
        assert_eq!(report.observed_survival, 0.5);
        assert_eq!(report.bins.len(), 2);
    }

    #[test]
    fn brier_and_interval_follow_outcomes() {
        let mut collector = CalibrationCollector::new(&[probe("pair")]);
        for survived in [true, true, true, false] {
            collector.record("pair", 0.5, survived).expect("known probe");
        }
        let report = collector.finalize(4, 1).probes.remove(0);
        assert!((report.brier - 0.25).abs() < 1e-12);
        assert!((report.observed_survival - 0.75).abs() < 1e-12);
        let (low, high) = report.ci95;
        assert!((low - 0.3257).abs() < 1e-3);
        assert_eq!(high, 1.0);
    }

    #[test]
    fn unknown_probe_is_an_error() {
        let mut collector = CalibrationCollector::new(&[probe("pair")]);
        let err = collector.record("tractor", 0.5, true).expect_err("unknown");
        assert!(matches!(err, AnalyticsError::UnknownProbe(name) if name == "tractor"));
    }

    #[test]
    fn markdown_lists_every_probe() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut collector = CalibrationCollector::new(&[probe("pair"), probe("other")]);
        collector.record("pair", 0.9, true).expect("known probe");
        let path = dir.path().join("summary.md");
        collector.finalize(1, 0).write_markdown(&path).expect("write");
        let text = fs::read_to_string(&path).expect("read");
        assert!(text.contains("| pair | 2x1 | 1 |"));
        assert!(text.contains("| other | 2x1 | 0 |"));
    }
}
