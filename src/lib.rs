// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod checker;
pub mod config;
pub mod error;
pub mod geo;
pub mod metrics;
pub mod notify;
pub mod report;
pub mod scheduler;
pub mod search;

// ---- Re-exports for stable public API ----
pub use crate::checker::{Checker, CheckerConfig, CycleReport, NearbySite, NotifyOutcome};
pub use crate::config::Settings;
pub use crate::error::{ConfigError, FetchError, NotifyError};
pub use crate::geo::Point;
pub use crate::notify::Notifier;
pub use crate::search::{SearchResult, Site, SiteSource};

use anyhow::Result;

use crate::notify::http::HttpNotifier;
use crate::search::http::HttpSiteSource;

/// Wire the HTTP-backed checker from validated settings.
pub fn build_checker(settings: &Settings, location: Point) -> Result<Checker> {
    let source = HttpSiteSource::from_settings(&settings.search)?;
    let notifier = HttpNotifier::from_settings(&settings.notification)?;
    tracing::info!(
        search = source.url(),
        notify = notifier.url(),
        radius_m = settings.radius_meters(),
        silent = settings.silent,
        "checker configured"
    );

    Ok(Checker::new(
        CheckerConfig::from_settings(settings, location),
        Box::new(source),
        Box::new(notifier),
    ))
}
