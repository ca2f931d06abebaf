/// Knobs read from the environment when an analyzer is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerParams {
    /// Survival probability at or above which a property counts as a sure
    /// lead.
    pub sure_lead_threshold: f64,
    /// Emits `tractor_bot::lead` and `tractor_bot::observe` events.
    pub log_decisions: bool,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            sure_lead_threshold: 1.0,
            log_decisions: false,
        }
    }
}

impl AnalyzerParams {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let sure_lead_threshold = read("TRACTOR_SURE_LEAD_THRESHOLD")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && (0.0..=1.0).contains(value))
            .unwrap_or(defaults.sure_lead_threshold);
        let log_decisions = read("TRACTOR_LOG_DECISIONS")
            .map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(defaults.log_decisions);
        Self {
            sure_lead_threshold,
            log_decisions,
        }
    }
}
