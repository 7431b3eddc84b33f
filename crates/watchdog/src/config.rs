//! Watchdog configuration

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;
use watchdog_lib::monitor::MonitorConfig;

/// Raw watchdog settings as found in the process environment
///
/// Values are kept as text here; numeric parsing is lenient and happens in
/// [`WatchdogSettings::into_monitor_config`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchdogSettings {
    /// Name fragment of the container whose CPU is measured
    #[serde(default)]
    pub tracked_container: Option<String>,

    /// Name fragment of the container to restart
    #[serde(default)]
    pub restarted_container: Option<String>,

    /// Seconds between iterations
    #[serde(default)]
    pub sleep_interval: Option<String>,

    /// CPU percentage above which the restart triggers
    #[serde(default)]
    pub cpu_threshold: Option<String>,
}

/// Environment variables the watchdog reads; nothing else is consulted
pub const WATCHDOG_VARS: [&str; 4] = [
    "TRACKED_CONTAINER",
    "RESTARTED_CONTAINER",
    "SLEEP_INTERVAL",
    "CPU_THRESHOLD",
];

impl WatchdogSettings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self> {
        let vars = WATCHDOG_VARS.iter().filter_map(|name| {
            std::env::var_os(name)
                .map(|value| (name.to_string(), value.to_string_lossy().into_owned()))
        });

        Self::from_vars(vars)
    }

    /// Build settings from `(NAME, value)` pairs, ignoring unknown names
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .filter(|(name, _)| WATCHDOG_VARS.contains(&name.as_str()))
            .collect();

        let config = config::Config::builder()
            .add_source(config::Environment::default().source(Some(vars)))
            .build()?;

        Self::from_config(&config)
    }

    pub fn from_config(config: &config::Config) -> Result<Self> {
        Ok(config.clone().try_deserialize()?)
    }

    /// Validate name fragments and parse the numeric settings
    ///
    /// Empty or missing fragments are an error. An unparsable interval or
    /// threshold becomes zero.
    pub fn into_monitor_config(self) -> Result<MonitorConfig> {
        let interval = parse_interval(self.sleep_interval.as_deref());
        let threshold = parse_threshold(self.cpu_threshold.as_deref());

        Ok(MonitorConfig::new(
            self.tracked_container.unwrap_or_default(),
            self.restarted_container.unwrap_or_default(),
            interval,
            threshold,
        )?)
    }
}

/// Parse `SLEEP_INTERVAL` as whole seconds; negative values sleep zero
fn parse_interval(raw: Option<&str>) -> Duration {
    match raw.map(str::parse::<i64>) {
        Some(Ok(secs)) => Duration::from_secs(secs.max(0) as u64),
        _ => {
            warn!(value = ?raw, "SLEEP_INTERVAL is not an integer, using 0 seconds");
            Duration::ZERO
        }
    }
}

fn parse_threshold(raw: Option<&str>) -> f64 {
    match raw.map(str::parse::<f64>) {
        Some(Ok(threshold)) => threshold,
        _ => {
            warn!(value = ?raw, "CPU_THRESHOLD is not a number, using 0.0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> WatchdogSettings {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        WatchdogSettings::from_config(&builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_full_settings() {
        let config = settings(&[
            ("tracked_container", "postgres"),
            ("restarted_container", "api"),
            ("sleep_interval", "15"),
            ("cpu_threshold", "75.5"),
        ])
        .into_monitor_config()
        .unwrap();

        assert_eq!(config.tracked_container, "postgres");
        assert_eq!(config.restarted_container, "api");
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.cpu_threshold, 75.5);
    }

    #[test]
    fn test_empty_tracked_container_is_fatal() {
        let result = settings(&[("tracked_container", ""), ("restarted_container", "api")])
            .into_monitor_config();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_restarted_container_is_fatal() {
        let result = settings(&[("tracked_container", "postgres")]).into_monitor_config();

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_numbers_become_zero() {
        let config = settings(&[
            ("tracked_container", "postgres"),
            ("restarted_container", "api"),
            ("sleep_interval", "five"),
            ("cpu_threshold", "high"),
        ])
        .into_monitor_config()
        .unwrap();

        assert_eq!(config.interval, Duration::ZERO);
        assert_eq!(config.cpu_threshold, 0.0);
    }

    #[test]
    fn test_missing_numbers_become_zero() {
        let config = settings(&[("tracked_container", "postgres"), ("restarted_container", "api")])
            .into_monitor_config()
            .unwrap();

        assert_eq!(config.interval, Duration::ZERO);
        assert_eq!(config.cpu_threshold, 0.0);
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars_reads_watchdog_variables() {
        let config = WatchdogSettings::from_vars(vars(&[
            ("TRACKED_CONTAINER", "postgres"),
            ("RESTARTED_CONTAINER", "api"),
            ("SLEEP_INTERVAL", "10"),
            ("CPU_THRESHOLD", "90"),
        ]))
        .unwrap()
        .into_monitor_config()
        .unwrap();

        assert_eq!(config.tracked_container, "postgres");
        assert_eq!(config.restarted_container, "api");
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.cpu_threshold, 90.0);
    }

    #[test]
    fn test_from_vars_ignores_unrelated_variables() {
        let config = WatchdogSettings::from_vars(vars(&[
            ("TRACKED_CONTAINER", "postgres"),
            ("RESTARTED_CONTAINER", "api"),
            ("tracked_container.x", "1"),
            ("PATH", "/usr/bin"),
        ]))
        .unwrap()
        .into_monitor_config()
        .unwrap();

        assert_eq!(config.tracked_container, "postgres");
    }

    #[test]
    fn test_from_vars_ignores_lowercase_names() {
        let settings = WatchdogSettings::from_vars(vars(&[
            ("tracked_container", "postgres"),
            ("RESTARTED_CONTAINER", "api"),
        ]))
        .unwrap();

        assert_eq!(settings.tracked_container, None);
        assert!(settings.into_monitor_config().is_err());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval(Some("30")), Duration::from_secs(30));
        assert_eq!(parse_interval(Some("-3")), Duration::ZERO);
        assert_eq!(parse_interval(Some("1.5")), Duration::ZERO);
        assert_eq!(parse_interval(None), Duration::ZERO);
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold(Some("50")), 50.0);
        assert_eq!(parse_threshold(Some("12.25")), 12.25);
        assert_eq!(parse_threshold(Some("")), 0.0);
    }
}
