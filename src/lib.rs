// src/lib.rs

//! Store rating widget library.
//!
//! Scrapes a web store listing page for its star rating on a daily
//! schedule, caches the last good snapshot, and renders it as embeddable
//! markup. Page rendering never waits on the network: the widget always
//! serves the cached value, or an all-zero default before the first
//! successful scrape.

pub mod error;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod storage;
pub mod utils;
