// src/scheduler.rs

//! Daily scrape scheduling.
//!
//! The scrape job runs once at startup (install-time behavior) and then
//! every day at a fixed local wall-clock time. A trigger that fires while
//! the previous scrape is still in flight is skipped, and no failure ever
//! escapes past the job boundary.

use std::sync::Arc;

use chrono::{DateTime, Days, Local};
use tokio::sync::Mutex;

use crate::models::{RatingSnapshot, ScheduleConfig};
use crate::services::RatingScraper;

/// Fixed local time-of-day trigger.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub hour: u32,
    pub minute: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            hour: 12,
            minute: 0,
        }
    }
}

impl From<&ScheduleConfig> for Schedule {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            hour: config.hour,
            minute: config.minute,
        }
    }
}

impl Schedule {
    /// Next trigger time strictly after `after`.
    pub fn next_occurrence(&self, after: DateTime<Local>) -> DateTime<Local> {
        // Two days ahead covers a trigger time that falls into a DST gap.
        for days_ahead in 0..=2 {
            let candidate = (after.date_naive() + Days::new(days_ahead))
                .and_hms_opt(self.hour, self.minute, 0)
                .and_then(|naive| naive.and_local_timezone(Local).earliest());
            if let Some(candidate) = candidate {
                if candidate > after {
                    return candidate;
                }
            }
        }
        after + chrono::Duration::days(1)
    }
}

/// Non-reentrant wrapper around the scraper for scheduled execution.
pub struct ScrapeJob {
    scraper: RatingScraper,
    guard: Mutex<()>,
}

impl ScrapeJob {
    pub fn new(scraper: RatingScraper) -> Self {
        Self {
            scraper,
            guard: Mutex::new(()),
        }
    }

    /// Run one scrape unless a previous run is still in flight.
    ///
    /// Every failure is logged and swallowed here; the trigger never sees
    /// an error and the cached snapshot is never cleared.
    pub async fn run_once(&self) -> Option<RatingSnapshot> {
        let Ok(_guard) = self.guard.try_lock() else {
            log::warn!("Previous scrape still running, skipping this trigger");
            return None;
        };

        match self.scraper.run().await {
            Ok(snapshot) => {
                log::info!(
                    "Scraped rating {} with {} reviews",
                    snapshot.rating,
                    snapshot.review_count
                );
                Some(snapshot)
            }
            Err(error) => {
                log::error!("Scrape failed: {error}");
                None
            }
        }
    }
}

/// Run the job once immediately, then daily at the scheduled time.
pub async fn run_daily(job: Arc<ScrapeJob>, schedule: Schedule) {
    job.run_once().await;

    loop {
        let now = Local::now();
        let next = schedule.next_occurrence(now);
        let wait = (next - now).to_std().unwrap_or_default();

        log::info!("Next scrape at {}", next.format("%Y-%m-%d %H:%M:%S"));
        tokio::time::sleep(wait).await;

        job.run_once().await;
    }
}
