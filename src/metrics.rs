use anyhow::Context;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const EVALUATIONS_TOTAL: &str = "validator_evaluations_total";
pub const FETCH_ERRORS_TOTAL: &str = "validator_fetch_errors_total";
pub const FINAL_SCORE: &str = "validator_final_score";

/// One-time metrics registration (so series carry descriptions once a recorder exists).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            EVALUATIONS_TOTAL,
            "Evaluations finished, labelled by outcome (rated / validation_error)."
        );
        describe_counter!(
            FETCH_ERRORS_TOTAL,
            "Page fetch failures, labelled by error kind."
        );
        describe_histogram!(FINAL_SCORE, "Weighted final credibility score (0-100).");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder for this process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Prometheus exposition text for everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
