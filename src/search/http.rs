// src/search/http.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use reqwest::{Client, Method};

use crate::config::SearchSettings;
use crate::error::FetchError;
use crate::search::{decode_feature_collection, SearchResult, SiteSource};

/// Number of `%s` placeholders in a URL pattern (`%%` is a literal percent).
pub fn placeholder_count(pattern: &str) -> usize {
    let mut n = 0;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '%' && chars.next() == Some('s') {
            n += 1;
        }
    }
    n
}

/// Substitute `params` into the `%s` placeholders of `pattern`, in order.
/// Returns `None` when the counts disagree.
pub fn expand_url_pattern(pattern: &str, params: &[String]) -> Option<String> {
    if placeholder_count(pattern) != params.len() {
        return None;
    }

    let mut out = String::with_capacity(pattern.len() + params.iter().map(String::len).sum::<usize>());
    let mut next = params.iter();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push_str(next.next()?),
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    Some(out)
}

/// Search source backed by the appointment API.
pub struct HttpSiteSource {
    client: Client,
    method: Method,
    url: String,
}

impl HttpSiteSource {
    pub fn from_settings(cfg: &SearchSettings) -> Result<Self> {
        let url = expand_url_pattern(&cfg.url_pattern, &cfg.params).ok_or_else(|| {
            anyhow!(
                "search url pattern {:?} does not take {} param(s)",
                cfg.url_pattern,
                cfg.params.len()
            )
        })?;
        let method = Method::from_bytes(cfg.method.as_bytes())
            .with_context(|| format!("invalid search method {:?}", cfg.method))?;
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .context("building search client")?;

        Ok(Self {
            client,
            method,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SiteSource for HttpSiteSource {
    async fn fetch(&self) -> Result<SearchResult, FetchError> {
        let t0 = std::time::Instant::now();
        let resp = self
            .client
            .request(self.method.clone(), &self.url)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        histogram!("checker_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        decode_feature_collection(&body)
    }

    fn name(&self) -> &'static str {
        "search-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_placeholders_and_skips_escapes() {
        assert_eq!(placeholder_count("https://x/%s.json"), 1);
        assert_eq!(placeholder_count("https://x/%s/%s?q=100%%"), 2);
        assert_eq!(placeholder_count("https://x/static.json"), 0);
    }

    #[test]
    fn expands_in_order() {
        let url = expand_url_pattern(
            "https://api/%s/%s.json?pct=5%%",
            &["v0".to_string(), "MA".to_string()],
        );
        assert_eq!(url.as_deref(), Some("https://api/v0/MA.json?pct=5%"));
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        assert_eq!(expand_url_pattern("https://api/%s.json", &[]), None);
        assert_eq!(
            expand_url_pattern("https://api/all.json", &["MA".to_string()]),
            None
        );
    }
}
