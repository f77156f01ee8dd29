// src/notify/mod.rs
pub mod http;

use async_trait::async_trait;

use crate::checker::NearbySite;
use crate::error::NotifyError;

/// Delivers one notification about newly-available sites.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, new_sites: &[NearbySite]) -> Result<(), NotifyError>;
}
