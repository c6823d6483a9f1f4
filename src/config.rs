use tracing::trace;

use crate::Metric;

/// Hub configuration
///
/// Every field is optional in the JSON file; missing fields fall back to the
/// built-in demo fleet and thresholds.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Hosts to fabricate metrics for
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Seconds between background ticks
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Number of alerts retained in the recent-alert history
    #[serde(default = "default_alert_history")]
    pub alert_history: usize,

    /// Per-metric overrides of sampling range and threshold
    #[serde(default)]
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            interval: default_interval(),
            alert_history: default_alert_history(),
            limits: Limits::default(),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Limits {
    pub cpu_usage: Option<Limit>,
    pub memory_usage: Option<Limit>,
    pub disk_usage: Option<Limit>,
    pub network_traffic: Option<Limit>,
}

impl Limits {
    fn get(&self, metric: Metric) -> Option<&Limit> {
        match metric {
            Metric::CpuUsage => self.cpu_usage.as_ref(),
            Metric::MemoryUsage => self.memory_usage.as_ref(),
            Metric::DiskUsage => self.disk_usage.as_ref(),
            Metric::NetworkTraffic => self.network_traffic.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Limit {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub threshold: Option<f64>,
}

/// Fully resolved sampling range and alert threshold of one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricProfile {
    pub min: f64,
    pub max: f64,
    pub threshold: f64,
}

impl MetricProfile {
    pub fn default_for(metric: Metric) -> MetricProfile {
        let (min, max, threshold) = match metric {
            Metric::CpuUsage => (20.0, 95.0, 80.0),
            Metric::MemoryUsage => (30.0, 92.0, 85.0),
            Metric::DiskUsage => (40.0, 88.0, 90.0),
            Metric::NetworkTraffic => (10.0, 85.0, 75.0),
        };
        MetricProfile {
            min,
            max,
            threshold,
        }
    }

    pub fn is_valid_range(&self) -> bool {
        // finite endpoints are not enough, max - min can still overflow
        self.min <= self.max && (self.max - self.min).is_finite()
    }
}

impl Config {
    pub fn profile(&self, metric: Metric) -> MetricProfile {
        let default = MetricProfile::default_for(metric);
        let Some(limit) = self.limits.get(metric) else {
            return default;
        };

        MetricProfile {
            min: limit.min.unwrap_or(default.min),
            max: limit.max.unwrap_or(default.max),
            threshold: limit.threshold.unwrap_or(default.threshold),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval == 0 {
            anyhow::bail!("interval must be at least one second");
        }

        if self.alert_history == 0 {
            anyhow::bail!("alert_history must keep at least one alert");
        }

        for metric in Metric::ALL {
            let profile = self.profile(metric);
            if !profile.is_valid_range() {
                anyhow::bail!(
                    "invalid range for {metric}: [{}, {}]",
                    profile.min,
                    profile.max
                );
            }
            if !profile.threshold.is_finite() {
                anyhow::bail!("invalid threshold for {metric}: {}", profile.threshold);
            }
        }

        Ok(())
    }
}

fn default_hosts() -> Vec<String> {
    (1..=5).map(|i| format!("laptop-{i:02}")).collect()
}

fn default_interval() -> u64 {
    60
}

fn default_alert_history() -> usize {
    crate::alerts::DEFAULT_ALERT_CAPACITY
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))?;
    config.validate()?;
    Ok(config)
}
