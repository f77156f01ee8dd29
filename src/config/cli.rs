// src/config/cli.rs
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Every value is optional here so an unset flag/env falls through to the
/// config file and then the defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "vaccine-checker",
    version,
    about = "Watch a vaccine appointment feed and notify on new nearby availability"
)]
pub struct Cli {
    /// Config file (TOML or JSON); defaults to ./config.toml or ./config.json when present
    #[arg(long, env = "VC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pattern for the search URL; each %s is replaced by the next --search-params value
    #[arg(long, env = "VC_SEARCH_URL_PATTERN")]
    pub search_url_pattern: Option<String>,

    /// HTTP method to hit the search URL with
    #[arg(long, env = "VC_SEARCH_METHOD")]
    pub search_method: Option<String>,

    /// Values substituted into the search URL pattern
    #[arg(long, env = "VC_SEARCH_PARAMS", value_delimiter = ',')]
    pub search_params: Option<Vec<String>>,

    #[arg(long, env = "VC_SEARCH_TIMEOUT_SECS")]
    pub search_timeout_secs: Option<u64>,

    /// Latitude of the location to check around
    #[arg(long, env = "VC_LATITUDE", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Longitude of the location to check around
    #[arg(long, env = "VC_LONGITUDE", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Kilometers from the location to check
    #[arg(long, env = "VC_DISTANCE")]
    pub distance: Option<f64>,

    /// Include sites that are only giving second doses
    #[arg(long, env = "VC_INCLUDE_SECOND_DOSE_ONLY", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub include_second_dose_only: Option<bool>,

    /// URL to hit when new appointments are found
    #[arg(long, env = "VC_NOTIFICATION_URL")]
    pub notification_url: Option<String>,

    /// HTTP method to hit the notification URL with
    #[arg(long, env = "VC_NOTIFICATION_METHOD")]
    pub notification_method: Option<String>,

    /// Query params (and body params for POST) sent with the notification
    #[arg(long, env = "VC_NOTIFICATION_PARAMS", value_delimiter = ',')]
    pub notification_params: Option<Vec<String>>,

    #[arg(long, env = "VC_NOTIFICATION_TIMEOUT_SECS")]
    pub notification_timeout_secs: Option<u64>,

    /// How often to check, in seconds
    #[arg(long, env = "VC_CHECK_INTERVAL_SECS")]
    pub check_interval_secs: Option<u64>,

    /// How often to log an alive message, in seconds
    #[arg(long, env = "VC_TICK_INTERVAL_SECS")]
    pub tick_interval_secs: Option<u64>,

    /// Skip notification
    #[arg(long, env = "VC_SILENT", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub silent: Option<bool>,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9000)
    #[arg(long, env = "VC_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,

    /// Emit JSON log lines instead of compact text
    #[arg(long, env = "VC_LOG_JSON", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub log_json: Option<bool>,
}
