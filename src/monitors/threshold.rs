use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::{
    Metric, Sample,
    alerts::{Alert, AlertSeverity},
    config::{Config, MetricProfile},
};

/// Margin above the threshold beyond which a breach is critical
pub const CRITICAL_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Ok,
    Warning,
    Critical,
}

impl Evaluation {
    pub fn evaluate(value: f64, threshold: f64) -> Evaluation {
        // at or below the threshold nothing is raised
        if value <= threshold {
            return Evaluation::Ok;
        }

        if value > threshold + CRITICAL_MARGIN {
            return Evaluation::Critical;
        }

        Evaluation::Warning
    }

    pub fn severity(self) -> Option<AlertSeverity> {
        match self {
            Evaluation::Ok => None,
            Evaluation::Warning => Some(AlertSeverity::Warning),
            Evaluation::Critical => Some(AlertSeverity::Critical),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThresholdEvaluator {
    thresholds: BTreeMap<Metric, f64>,
}

impl ThresholdEvaluator {
    pub fn new(config: &Config) -> Self {
        let thresholds = Metric::ALL
            .into_iter()
            .map(|metric| (metric, config.profile(metric).threshold))
            .collect();

        Self { thresholds }
    }

    pub fn threshold(&self, metric: Metric) -> f64 {
        self.thresholds
            .get(&metric)
            .copied()
            .unwrap_or_else(|| MetricProfile::default_for(metric).threshold)
    }

    pub fn classify(&self, metric: Metric, value: f64) -> Evaluation {
        Evaluation::evaluate(value, self.threshold(metric))
    }

    /// Build an alert if `value` breaches the metric's threshold.
    ///
    /// Pure: appending to the log and deriving events is up to the caller.
    pub fn evaluate(
        &self,
        host: &str,
        metric: Metric,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Option<Alert> {
        let threshold = self.threshold(metric);
        let evaluation = self.classify(metric, value);

        trace!("{host}: {metric} {value} (max: {threshold}) -> {evaluation:?}");

        evaluation.severity().map(|severity| Alert {
            timestamp,
            server: host.to_string(),
            metric,
            value,
            threshold,
            severity,
        })
    }

    pub fn evaluate_sample(&self, sample: &Sample) -> Option<Alert> {
        self.evaluate(&sample.host, sample.metric, sample.value, sample.timestamp)
    }
}

impl Default for ThresholdEvaluator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
