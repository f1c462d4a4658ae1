//! Service layer for the rating widget.
//!
//! This module contains the business logic for:
//! - Scraping the listing page (`RatingScraper`)
//! - Rendering the widget (`RatingPresenter`)

mod presenter;
mod scraper;

pub use presenter::{RatingPresenter, StarState, WidgetMarkup, star_states};
pub use scraper::RatingScraper;
