// src/notify/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Method, StatusCode};

use super::Notifier;
use crate::checker::NearbySite;
use crate::config::NotificationSettings;
use crate::error::NotifyError;

/// `base` with `params` appended literally as `?a&b`.
pub fn notification_url(base: &str, params: &[String]) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    format!("{base}?{}", params.join("&"))
}

/// Form body for methods that carry one; GET/HEAD (or no params) send nothing.
pub fn notification_body(method: &Method, params: &[String]) -> Option<String> {
    if params.is_empty() || *method == Method::GET || *method == Method::HEAD {
        return None;
    }
    Some(params.join("&"))
}

/// Hits a configured URL (webhook, IFTTT-style button, ...) once per batch of new sites.
pub struct HttpNotifier {
    client: Client,
    method: Method,
    url: String,
    body: Option<String>,
}

impl HttpNotifier {
    pub fn from_settings(cfg: &NotificationSettings) -> Result<Self> {
        let method = Method::from_bytes(cfg.method.as_bytes())
            .with_context(|| format!("invalid notification method {:?}", cfg.method))?;
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .context("building notification client")?;

        Ok(Self {
            url: notification_url(&cfg.url, &cfg.params),
            body: notification_body(&method, &cfg.params),
            client,
            method,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, new_sites: &[NearbySite]) -> Result<(), NotifyError> {
        let mut req = self.client.request(self.method.clone(), &self.url);
        if let Some(body) = &self.body {
            req = req
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.clone());
        }

        println!("notifying at {}", chrono::Local::now().to_rfc2822());
        tracing::info!(new = new_sites.len(), url = %self.url, "sending notification");

        let resp = req.send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(NotifyError::Status(status.as_u16()));
        }

        match resp.text().await {
            Ok(text) if !text.is_empty() => println!("{text}"),
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "could not read notification response body"),
        }
        Ok(())
    }
}
