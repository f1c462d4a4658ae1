//! Storage abstractions for widget state.
//!
//! Two key-value records back the widget: the admin-owned config and the
//! last good rating snapshot. A record is always replaced wholesale; a
//! concurrent reader sees either the old or the new value, never a partial
//! one. Uninstalling the widget leaves both records in place.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{RatingSnapshot, WidgetConfig};

// Re-export for convenience
pub use local::LocalStorage;

/// Persistence for the scraped rating snapshot.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Load the last good snapshot, if any scrape ever succeeded.
    async fn get(&self) -> Result<Option<RatingSnapshot>>;

    /// Atomically replace the snapshot.
    async fn set(&self, snapshot: &RatingSnapshot) -> Result<()>;
}

/// Persistence for the admin-owned widget configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the current config, with unset fields defaulted.
    async fn get_config(&self) -> Result<WidgetConfig>;

    /// Sanitize and store the config.
    async fn set_config(&self, config: WidgetConfig) -> Result<()>;
}
