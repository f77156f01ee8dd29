// src/config/file.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = "config.toml";
const DEFAULT_JSON: &str = "config.json";

/// Optional on-disk settings. Keys match the CLI flag names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub search_url_pattern: Option<String>,
    pub search_method: Option<String>,
    pub search_params: Option<Vec<String>>,
    pub search_timeout_secs: Option<u64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance: Option<f64>,
    pub include_second_dose_only: Option<bool>,
    pub notification_url: Option<String>,
    pub notification_method: Option<String>,
    pub notification_params: Option<Vec<String>>,
    pub notification_timeout_secs: Option<u64>,
    pub check_interval_secs: Option<u64>,
    pub tick_interval_secs: Option<u64>,
    pub silent: Option<bool>,
    pub metrics_addr: Option<SocketAddr>,
    pub log_json: Option<bool>,
}

/// Load settings from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing config {}", path.display()))
}

/// Resolve the config file:
/// 1) `explicit` (from --config / $VC_CONFIG), which must exist
/// 2) ./config.toml
/// 3) ./config.json
///
/// No file at all is fine and yields `None`.
pub fn load_config_default(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    if let Some(p) = explicit {
        if !p.exists() {
            return Err(anyhow!("config file {} does not exist", p.display()));
        }
        return load_config_from(p).map(Some);
    }
    for candidate in [DEFAULT_TOML, DEFAULT_JSON] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_config_from(&p).map(Some);
        }
    }
    Ok(None)
}

fn parse_config(s: &str, hint_ext: &str) -> Result<FileConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => {
            // Unknown extension: TOML first, then JSON.
            if let Ok(v) = toml::from_str(s) {
                return Ok(v);
            }
            serde_json::from_str(s).map_err(|_| anyhow!("unsupported config format"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_and_json_use_flag_names() {
        let toml = r#"
latitude = 42.36
longitude = -71.06
search-params = ["MA"]
silent = true
check-interval-secs = 60
"#;
        let t = parse_config(toml, "toml").unwrap();
        assert_eq!(t.latitude, Some(42.36));
        assert_eq!(t.search_params, Some(vec!["MA".to_string()]));
        assert_eq!(t.silent, Some(true));
        assert_eq!(t.check_interval_secs, Some(60));

        let json = r#"{"notification-url": "https://hook.example/x", "distance": 25}"#;
        let j = parse_config(json, "json").unwrap();
        assert_eq!(j.notification_url.as_deref(), Some("https://hook.example/x"));
        assert_eq!(j.distance, Some(25.0));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config("lattitude = 1.0", "toml").is_err());
    }

    #[test]
    fn unknown_extension_tries_both() {
        assert_eq!(
            parse_config(r#"{"silent": true}"#, "").unwrap().silent,
            Some(true)
        );
        assert_eq!(parse_config("silent = false", "cfg").unwrap().silent, Some(false));
        assert!(parse_config("::nope::", "").is_err());
    }
}
