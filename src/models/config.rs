//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Admin-owned widget configuration, stored alongside the snapshot.
///
/// The scraper and presenter only ever read this record; writes come from
/// whatever admin surface fronts `ConfigStore::set_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Listing page to scrape; empty until configured
    #[serde(default)]
    pub source_url: String,

    /// Caption shown next to the stars
    #[serde(default = "defaults::display_text")]
    pub display_text: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            display_text: defaults::display_text(),
        }
    }
}

impl WidgetConfig {
    /// Sanitize free-text fields for storage.
    pub fn sanitized(self) -> Self {
        Self {
            source_url: sanitize_text(&self.source_url),
            display_text: sanitize_text(&self.display_text),
        }
    }
}

/// Strip markup tags and control characters from a free-text field, then
/// collapse runs of whitespace and trim.
pub fn sanitize_text(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() => {}
            c => stripped.push(c),
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Application settings loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Daily trigger time
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings or return defaults if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Settings load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate settings values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.schedule.hour > 23 {
            return Err(AppError::config("schedule.hour must be 0-23"));
        }
        if self.schedule.minute > 59 {
            return Err(AppError::config("schedule.minute must be 0-59"));
        }
        Ok(())
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Daily trigger time, local wall clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hour of day (0-23)
    #[serde(default = "defaults::schedule_hour")]
    pub hour: u32,

    /// Minute of hour (0-59)
    #[serde(default = "defaults::schedule_minute")]
    pub minute: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour: defaults::schedule_hour(),
            minute: defaults::schedule_minute(),
        }
    }
}

mod defaults {
    // Widget defaults
    pub fn display_text() -> String {
        "Chrome Web Store Rating".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; rating-widget/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Schedule defaults
    pub fn schedule_hour() -> u32 {
        12
    }
    pub fn schedule_minute() -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_settings_ok() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut settings = Settings::default();
        settings.http.user_agent = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut settings = Settings::default();
        settings.http.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_schedule() {
        let mut settings = Settings::default();
        settings.schedule.hour = 24;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_default_display_text() {
        let config = WidgetConfig::default();
        assert_eq!(config.display_text, "Chrome Web Store Rating");
        assert!(config.source_url.is_empty());
    }

    #[test]
    fn test_display_text_defaulted_on_deserialize() {
        let config: WidgetConfig =
            serde_json::from_str(r#"{"sourceUrl": "https://example.com"}"#).unwrap();
        assert_eq!(config.display_text, "Chrome Web Store Rating");
    }

    #[test]
    fn test_sanitize_strips_tags_and_trims() {
        assert_eq!(
            sanitize_text("  <b>Our</b>   rating\t<script>x()</script> "),
            "Our rating"
        );
        assert_eq!(sanitize_text("plain text"), "plain text");
    }

    #[test]
    fn test_sanitize_keeps_url_intact() {
        let url = "https://chromewebstore.google.com/detail/abc?hl=en&ref=widget";
        assert_eq!(sanitize_text(url), url);
    }

    #[test]
    fn test_sanitized_config() {
        let config = WidgetConfig {
            source_url: " https://example.com/listing ".to_string(),
            display_text: "<em>Store</em> Rating".to_string(),
        };
        let clean = config.sanitized();
        assert_eq!(clean.source_url, "https://example.com/listing");
        assert_eq!(clean.display_text, "Store Rating");
    }
}
