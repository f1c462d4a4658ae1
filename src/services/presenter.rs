// src/services/presenter.rs

//! Widget presenter.
//!
//! Turns the cached snapshot into star glyphs and embeddable markup. A
//! render reads only the cache and config; it never touches the network,
//! so page rendering stays O(cache lookup) whatever the scrape state.

use std::sync::Arc;

use crate::models::{RatingSnapshot, WidgetConfig};
use crate::storage::{ConfigStore, RatingStore};

/// Static stylesheet published alongside the widget markup.
const WIDGET_CSS: &str = include_str!("widget.css");

/// Display state of a single star glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarState {
    Full,
    Half,
    Empty,
}

impl StarState {
    /// CSS class fragment for this state.
    pub fn class(&self) -> &'static str {
        match self {
            StarState::Full => "full",
            StarState::Half => "half",
            StarState::Empty => "empty",
        }
    }

    /// Glyph for this state. Half stars use the filled glyph; the
    /// stylesheet overlays a clipped outline on top.
    pub fn glyph(&self) -> &'static str {
        match self {
            StarState::Full | StarState::Half => "★",
            StarState::Empty => "☆",
        }
    }
}

/// Map a fractional rating onto five star glyphs.
///
/// Full stars up to the integer part, a half star once the fraction
/// reaches .5 (so 3.7 shows three full and one half), empty stars after.
/// Ratings above five cap at five full stars; the stored numeric rating is
/// displayed unclamped alongside.
pub fn star_states(rating: f64) -> [StarState; 5] {
    let mut stars = [StarState::Empty; 5];
    for (i, star) in stars.iter_mut().enumerate() {
        let position = (i + 1) as f64;
        if position <= rating {
            *star = StarState::Full;
        } else if position - 0.5 <= rating {
            *star = StarState::Half;
        }
    }
    stars
}

/// Rendered widget, ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetMarkup {
    /// Glyph sequence, left to right
    pub stars: [StarState; 5],

    /// Numeric rating as stored, unclamped
    pub rating: f64,

    /// Review count as stored
    pub review_count: u64,

    /// Configured caption
    pub display_text: String,

    /// Anchor target; `#` when no source URL is configured
    pub link_target: String,
}

impl WidgetMarkup {
    /// Anchor markup for the widget: a stars container plus the numeric
    /// rating and the configured caption.
    pub fn to_html(&self) -> String {
        let mut stars_html = String::new();
        for star in &self.stars {
            stars_html.push_str(&format!(
                "<span class=\"star {}\">{}</span>",
                star.class(),
                star.glyph()
            ));
        }

        format!(
            "<a href=\"{href}\" target=\"_blank\" class=\"chrome-store-rating\">\
             <div class=\"stars\">{stars_html}</div>\
             <span class=\"rating\">{rating}</span>\
             <span class=\"review-count\">{text}</span>\
             </a>",
            href = escape_html(&self.link_target),
            rating = self.rating,
            text = escape_html(&self.display_text),
        )
    }
}

/// Service that renders the widget from cached state.
pub struct RatingPresenter {
    config_store: Arc<dyn ConfigStore>,
    rating_store: Arc<dyn RatingStore>,
}

impl RatingPresenter {
    /// Create a new presenter over the given stores.
    pub fn new(config_store: Arc<dyn ConfigStore>, rating_store: Arc<dyn RatingStore>) -> Self {
        Self {
            config_store,
            rating_store,
        }
    }

    /// Render the widget from the cached snapshot and config.
    ///
    /// An empty cache renders as the zero snapshot: zero rating, zero
    /// reviews, five empty stars. A failed read degrades the same way, so
    /// the embed point always gets markup back, never an error.
    pub async fn render(&self) -> WidgetMarkup {
        let config = self.config_store.get_config().await.unwrap_or_else(|e| {
            log::warn!("Config read failed, using defaults: {e}");
            WidgetConfig::default()
        });
        let snapshot = match self.rating_store.get().await {
            Ok(snapshot) => snapshot.unwrap_or_else(RatingSnapshot::zero),
            Err(e) => {
                log::warn!("Snapshot read failed, rendering zero rating: {e}");
                RatingSnapshot::zero()
            }
        };

        let link_target = if config.source_url.is_empty() {
            "#".to_string()
        } else {
            config.source_url
        };

        WidgetMarkup {
            stars: star_states(snapshot.rating),
            rating: snapshot.rating,
            review_count: snapshot.review_count,
            display_text: config.display_text,
            link_target,
        }
    }

    /// Stylesheet to publish alongside the widget markup.
    pub fn stylesheet() -> &'static str {
        WIDGET_CSS
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
