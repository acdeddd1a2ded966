//! Product listing scraper
//!
//! Extracts repeated product records (name, price, rating) from HTML pages
//! using CSS selectors and writes them to CSV:
//! - Selector-driven extraction with per-container skip on failure
//! - Price normalization
//! - CSV export with a fixed `name,price,rating` layout
//! - Blocking page fetcher and a fetch → extract → export pipeline
//! - FFI entry points returning JSON

pub mod config;
pub mod error;
pub mod export;
pub mod extractors;
pub mod ffi;
pub mod fetch;
pub mod pipeline;

#[cfg(test)]
mod test_utils;

pub use config::*;
pub use error::*;
pub use export::*;
pub use extractors::*;
pub use fetch::*;
pub use pipeline::*;
