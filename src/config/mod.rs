// src/config/mod.rs
//! Runtime settings. Built once at startup from, in order of precedence,
//! CLI flags, `VC_*` environment variables, an optional config file and
//! the defaults below, then handed to the checker by value.

pub mod cli;
pub mod file;

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::geo::{Point, METERS_PER_KILOMETER};
use crate::search::http::placeholder_count;

pub use cli::Cli;
pub use file::FileConfig;

pub const DEFAULT_SEARCH_URL_PATTERN: &str = "https://www.vaccinespotter.org/api/v0/states/%s.json";
pub const DEFAULT_SEARCH_METHOD: &str = "GET";
pub const DEFAULT_NOTIFICATION_URL: &str = "https://api.virtualbuttons.com/v1";
pub const DEFAULT_NOTIFICATION_METHOD: &str = "GET";
pub const DEFAULT_DISTANCE_KM: f64 = 10.0;
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// URL with `%s` placeholders filled positionally from `params`.
    pub url_pattern: String,
    pub method: String,
    pub params: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    pub url: String,
    pub method: String,
    /// Appended to the URL as `?a&b`; also sent as the body for POST-like methods.
    pub params: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_km: f64,
    pub include_second_dose_only: bool,
    pub silent: bool,
    pub check_interval: Duration,
    pub tick_interval: Duration,
    pub search: SearchSettings,
    pub notification: NotificationSettings,
    pub metrics_addr: Option<SocketAddr>,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            distance_km: DEFAULT_DISTANCE_KM,
            include_second_dose_only: false,
            silent: false,
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            tick_interval: Duration::from_secs(DEFAULT_TICK_INTERVAL_SECS),
            search: SearchSettings {
                url_pattern: DEFAULT_SEARCH_URL_PATTERN.to_string(),
                method: DEFAULT_SEARCH_METHOD.to_string(),
                params: Vec::new(),
                timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            },
            notification: NotificationSettings {
                url: DEFAULT_NOTIFICATION_URL.to_string(),
                method: DEFAULT_NOTIFICATION_METHOD.to_string(),
                params: Vec::new(),
                timeout: Duration::from_secs(DEFAULT_NOTIFICATION_TIMEOUT_SECS),
            },
            metrics_addr: None,
            log_json: false,
        }
    }
}

impl Settings {
    /// Merge CLI/env values over the file over the defaults.
    pub fn layered(cli: &Cli, file: Option<FileConfig>) -> Self {
        let f = file.unwrap_or_default();
        let d = Settings::default();

        Self {
            latitude: cli.latitude.or(f.latitude),
            longitude: cli.longitude.or(f.longitude),
            distance_km: cli.distance.or(f.distance).unwrap_or(d.distance_km),
            include_second_dose_only: cli
                .include_second_dose_only
                .or(f.include_second_dose_only)
                .unwrap_or(d.include_second_dose_only),
            silent: cli.silent.or(f.silent).unwrap_or(d.silent),
            check_interval: cli
                .check_interval_secs
                .or(f.check_interval_secs)
                .map(Duration::from_secs)
                .unwrap_or(d.check_interval),
            tick_interval: cli
                .tick_interval_secs
                .or(f.tick_interval_secs)
                .map(Duration::from_secs)
                .unwrap_or(d.tick_interval),
            search: SearchSettings {
                url_pattern: pick(&cli.search_url_pattern, f.search_url_pattern)
                    .unwrap_or(d.search.url_pattern),
                method: pick(&cli.search_method, f.search_method).unwrap_or(d.search.method),
                params: pick(&cli.search_params, f.search_params).unwrap_or(d.search.params),
                timeout: cli
                    .search_timeout_secs
                    .or(f.search_timeout_secs)
                    .map(Duration::from_secs)
                    .unwrap_or(d.search.timeout),
            },
            notification: NotificationSettings {
                url: pick(&cli.notification_url, f.notification_url)
                    .unwrap_or(d.notification.url),
                method: pick(&cli.notification_method, f.notification_method)
                    .unwrap_or(d.notification.method),
                params: pick(&cli.notification_params, f.notification_params)
                    .unwrap_or(d.notification.params),
                timeout: cli
                    .notification_timeout_secs
                    .or(f.notification_timeout_secs)
                    .map(Duration::from_secs)
                    .unwrap_or(d.notification.timeout),
            },
            metrics_addr: cli.metrics_addr.or(f.metrics_addr),
            log_json: cli.log_json.or(f.log_json).unwrap_or(d.log_json),
        }
    }

    /// Check every parameter and return the location to search around.
    /// All problems are collected before failing.
    pub fn validate(&self) -> Result<Point, ConfigError> {
        let mut violations = Vec::new();

        match self.latitude {
            None => violations.push("missing --latitude".to_string()),
            Some(lat) if !(-90.0..=90.0).contains(&lat) => {
                violations.push(format!("latitude {lat} out of range [-90, 90]"))
            }
            Some(_) => {}
        }
        match self.longitude {
            None => violations.push("missing --longitude".to_string()),
            Some(lon) if !(-180.0..=180.0).contains(&lon) => {
                violations.push(format!("longitude {lon} out of range [-180, 180]"))
            }
            Some(_) => {}
        }

        if !self.silent && self.notification.url.trim().is_empty() {
            violations.push("missing --notification-url".to_string());
        }
        if !(self.distance_km.is_finite() && self.distance_km > 0.0) {
            violations.push(format!(
                "distance must be a positive number of kilometers, got {}",
                self.distance_km
            ));
        }
        if self.check_interval.is_zero() {
            violations.push("check-interval-secs must be greater than 0".to_string());
        }
        if self.tick_interval.is_zero() {
            violations.push("tick-interval-secs must be greater than 0".to_string());
        }

        let expected = placeholder_count(&self.search.url_pattern);
        if expected != self.search.params.len() {
            violations.push(format!(
                "search-url-pattern expects {expected} param(s), got {}",
                self.search.params.len()
            ));
        }
        for (flag, method) in [
            ("search-method", &self.search.method),
            ("notification-method", &self.notification.method),
        ] {
            if reqwest::Method::from_bytes(method.as_bytes()).is_err() {
                violations.push(format!("invalid {flag} {method:?}"));
            }
        }

        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) if violations.is_empty() => Ok(Point::new(lon, lat)),
            _ => Err(ConfigError { violations }),
        }
    }

    pub fn radius_meters(&self) -> f64 {
        self.distance_km * METERS_PER_KILOMETER
    }
}

fn pick<T: Clone>(cli: &Option<T>, file: Option<T>) -> Option<T> {
    cli.clone().or(file)
}
