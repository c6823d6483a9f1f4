use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::trace;

use crate::{
    Metric,
    config::{Config, MetricProfile},
    error::{MonitorError, MonitorResult},
    util::round2,
};

/// Source of raw readings
///
/// The sampler hands every draw the configured range; implementations decide
/// where inside (or outside) it the value lands. Closures implement this, which
/// is how tests pin readings for a given host.
pub trait ValueSource: Send {
    fn draw(&mut self, host: &str, metric: Metric, range: RangeInclusive<f64>) -> f64;
}

impl<F> ValueSource for F
where
    F: FnMut(&str, Metric, RangeInclusive<f64>) -> f64 + Send,
{
    fn draw(&mut self, host: &str, metric: Metric, range: RangeInclusive<f64>) -> f64 {
        self(host, metric, range)
    }
}

/// Uniform draws from an OS-seeded [`StdRng`]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSource for RandomSource {
    fn draw(&mut self, _host: &str, _metric: Metric, range: RangeInclusive<f64>) -> f64 {
        self.rng.random_range(range)
    }
}

pub struct MetricSampler {
    ranges: BTreeMap<Metric, MetricProfile>,
    source: Box<dyn ValueSource>,
}

impl fmt::Debug for MetricSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricSampler")
            .field("ranges", &self.ranges)
            .finish_non_exhaustive()
    }
}

impl MetricSampler {
    pub fn new(config: &Config, source: Box<dyn ValueSource>) -> Self {
        let ranges = Metric::ALL
            .into_iter()
            .map(|metric| (metric, config.profile(metric)))
            .collect();

        Self { ranges, source }
    }

    pub fn random(config: &Config) -> Self {
        Self::new(config, Box::new(RandomSource::new()))
    }

    /// Draw one reading for `host`, rounded to two decimals.
    pub fn sample(&mut self, host: &str, metric: Metric) -> MonitorResult<f64> {
        let profile = self
            .ranges
            .get(&metric)
            .copied()
            .unwrap_or_else(|| MetricProfile::default_for(metric));

        if !profile.is_valid_range() {
            return Err(MonitorError::InvalidRange {
                metric,
                min: profile.min,
                max: profile.max,
            });
        }

        let value = round2(self.source.draw(host, metric, profile.min..=profile.max));
        trace!("{host}: sampled {metric} = {value}");

        Ok(value)
    }
}
