// src/models/selectors.rs

//! CSS selectors for locating rating fields on the listing page.

use scraper::Selector;

use crate::error::{AppError, Result};

/// Selectors for the rating and review-count elements.
///
/// These track the markup of the Chrome Web Store listing page. They are a
/// build-time concern and are not exposed through the admin config.
#[derive(Debug, Clone)]
pub struct RatingSelectors {
    /// Selector for the element holding the numeric rating text
    pub rating_selector: String,

    /// Selector for the element holding the review-count text
    pub review_count_selector: String,
}

impl Default for RatingSelectors {
    fn default() -> Self {
        Self {
            rating_selector: "span.Vq0ZA".to_string(),
            review_count_selector: "span.qwG2Hd".to_string(),
        }
    }
}

impl RatingSelectors {
    /// Compile both selectors for use against a parsed document.
    pub fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            rating: parse_selector(&self.rating_selector)?,
            review_count: parse_selector(&self.review_count_selector)?,
        })
    }
}

/// Parsed form of [`RatingSelectors`].
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub rating: Selector,
    pub review_count: Selector,
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
