//! Helper functions for integration tests

use std::ops::RangeInclusive;

use itom_monitor::{
    Metric, actors::monitor::MonitorHandle, config::Config, monitors::sampler::ValueSource,
};

/// Long enough that no background tick fires during a test
pub const QUIET_INTERVAL: u64 = 3600;

pub fn create_test_config(hosts: &[&str], interval: u64) -> Config {
    Config {
        hosts: hosts.iter().map(|host| host.to_string()).collect(),
        interval,
        ..Config::default()
    }
}

/// Every reading is 10, well below every threshold
pub fn calm_source() -> Box<dyn ValueSource> {
    Box::new(|_: &str, _: Metric, _: RangeInclusive<f64>| 10.0)
}

/// `metric` on `host` reads `value`, everything else stays calm
pub fn pinned_source(host: &str, metric: Metric, value: f64) -> Box<dyn ValueSource> {
    let pinned_host = host.to_string();
    Box::new(move |host: &str, m: Metric, _: RangeInclusive<f64>| {
        if host == pinned_host && m == metric {
            value
        } else {
            10.0
        }
    })
}

/// Five demo laptops with cpu on laptop-01 pinned to 95
pub fn spawn_hot_monitor() -> MonitorHandle {
    let config = create_test_config(
        &["laptop-01", "laptop-02", "laptop-03", "laptop-04", "laptop-05"],
        QUIET_INTERVAL,
    );
    MonitorHandle::spawn_with_source(&config, pinned_source("laptop-01", Metric::CpuUsage, 95.0))
}

pub fn spawn_calm_monitor(hosts: &[&str]) -> MonitorHandle {
    MonitorHandle::spawn_with_source(&create_test_config(hosts, QUIET_INTERVAL), calm_source())
}
