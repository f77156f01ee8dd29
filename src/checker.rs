// src/checker.rs
//! One poll cycle: fetch → filter → dedupe against the previous cycle → notify.
//!
//! The checker owns the only piece of state in the program, the set of
//! nearby sites found on the previous cycle. It is replaced wholesale at the
//! end of every successful fetch, whether or not the notification went out.

use std::collections::HashSet;

use metrics::{counter, gauge};

use crate::config::Settings;
use crate::error::{FetchError, NotifyError};
use crate::geo::Point;
use crate::metrics::ensure_described;
use crate::notify::Notifier;
use crate::report::{format_site, summary_line};
use crate::search::{SearchResult, Site, SiteSource};

/// A site inside the radius, with its distance from the configured location.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySite {
    pub site: Site,
    pub distance_m: f64,
}

impl NearbySite {
    pub fn id(&self) -> Option<i64> {
        self.site.id
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutcome {
    pub found: Vec<NearbySite>,
    /// Sites that passed the availability filters, at any distance.
    pub available: usize,
    pub total: usize,
}

/// Keep available sites within `radius_m` of `location` (inclusive).
pub fn filter_sites(
    result: &SearchResult,
    location: &Point,
    radius_m: f64,
    include_second_dose_only: bool,
) -> FilterOutcome {
    let mut out = FilterOutcome {
        total: result.len(),
        ..FilterOutcome::default()
    };

    for site in &result.sites {
        if !site.appointments_available {
            continue;
        }
        if !include_second_dose_only && site.second_dose_only {
            continue;
        }
        out.available += 1;

        let Some(point) = site.point else {
            tracing::warn!(id = ?site.id, name = ?site.name, "available site has no point geometry");
            continue;
        };
        let distance_m = point.distance_to(location);
        if distance_m <= radius_m {
            out.found.push(NearbySite {
                site: site.clone(),
                distance_m,
            });
        }
    }
    out
}

/// Sites in `found` whose id was not in `previous`. Sites without an id are
/// always new; it is better to notify twice than to miss one.
pub fn diff_new(found: &[NearbySite], previous: &[NearbySite]) -> Vec<NearbySite> {
    let seen: HashSet<i64> = previous.iter().filter_map(NearbySite::id).collect();
    found
        .iter()
        .filter(|s| !matches!(s.id(), Some(id) if seen.contains(&id)))
        .cloned()
        .collect()
}

/// What happened on the notification side of a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    NothingNew,
    Silent,
    Sent,
    Failed(NotifyError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub found: usize,
    pub available: usize,
    pub total: usize,
    pub new: usize,
    pub notification: NotifyOutcome,
}

/// Fixed inputs of every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerConfig {
    pub location: Point,
    pub radius_m: f64,
    pub include_second_dose_only: bool,
    pub silent: bool,
}

impl CheckerConfig {
    pub fn from_settings(settings: &Settings, location: Point) -> Self {
        Self {
            location,
            radius_m: settings.radius_meters(),
            include_second_dose_only: settings.include_second_dose_only,
            silent: settings.silent,
        }
    }
}

pub struct Checker {
    cfg: CheckerConfig,
    source: Box<dyn SiteSource>,
    notifier: Box<dyn Notifier>,
    last_found: Vec<NearbySite>,
}

impl Checker {
    pub fn new(
        cfg: CheckerConfig,
        source: Box<dyn SiteSource>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            cfg,
            source,
            notifier,
            last_found: Vec::new(),
        }
    }

    /// Nearby sites from the previous cycle.
    pub fn last_found(&self) -> &[NearbySite] {
        &self.last_found
    }

    /// Run one full cycle. A fetch error aborts it before any state changes.
    pub async fn check(&mut self) -> Result<CycleReport, FetchError> {
        ensure_described();
        counter!("checker_cycles_total").increment(1);
        println!(
            "\n*** Checking at {} ***\n",
            chrono::Local::now().to_rfc2822()
        );

        let result = match self.source.fetch().await {
            Ok(r) => r,
            Err(e) => {
                counter!("checker_fetch_errors_total").increment(1);
                return Err(e);
            }
        };
        tracing::debug!(source = self.source.name(), sites = result.len(), "fetched");

        Ok(self.handle(&result).await)
    }

    /// Filter, report, notify and roll the state forward for one fetched result.
    pub async fn handle(&mut self, result: &SearchResult) -> CycleReport {
        let outcome = filter_sites(
            result,
            &self.cfg.location,
            self.cfg.radius_m,
            self.cfg.include_second_dose_only,
        );

        for nearby in &outcome.found {
            print!("{}", format_site(nearby));
        }
        println!(
            "{}",
            summary_line(outcome.found.len(), outcome.available, outcome.total)
        );

        let new_sites = diff_new(&outcome.found, &self.last_found);
        let notification = if new_sites.is_empty() {
            NotifyOutcome::NothingNew
        } else {
            counter!("checker_new_sites_total").increment(new_sites.len() as u64);
            self.notify(&new_sites).await
        };

        let report = CycleReport {
            found: outcome.found.len(),
            available: outcome.available,
            total: outcome.total,
            new: new_sites.len(),
            notification,
        };

        gauge!("checker_sites_nearby").set(report.found as f64);
        gauge!("checker_sites_available").set(report.available as f64);
        gauge!("checker_sites_total").set(report.total as f64);
        gauge!("checker_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        tracing::info!(
            found = report.found,
            available = report.available,
            total = report.total,
            new = report.new,
            "cycle complete"
        );

        // Always the latest set, even if the notification failed.
        self.last_found = outcome.found;
        report
    }

    async fn notify(&self, new_sites: &[NearbySite]) -> NotifyOutcome {
        if self.cfg.silent {
            tracing::debug!(new = new_sites.len(), "silent; skipping notification");
            return NotifyOutcome::Silent;
        }

        match self.notifier.notify(new_sites).await {
            Ok(()) => {
                counter!("checker_notifications_total").increment(1);
                NotifyOutcome::Sent
            }
            Err(e) => {
                tracing::error!(error = %e, "notification failed");
                counter!("checker_notify_errors_total").increment(1);
                NotifyOutcome::Failed(e)
            }
        }
    }
}
