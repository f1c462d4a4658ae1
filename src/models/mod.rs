// src/models/mod.rs

//! Domain models for the rating widget.

mod config;
mod selectors;
mod snapshot;

// Re-export all public types
pub use config::{HttpConfig, ScheduleConfig, Settings, WidgetConfig, sanitize_text};
pub use selectors::{CompiledSelectors, RatingSelectors};
pub use snapshot::RatingSnapshot;
