//! Product record extraction
//!
//! A [`ProductExtractor`] turns a parsed page into an ordered set of
//! [`Record`]s, one per matched container.

mod css_extractor;
mod price;
mod product_extractor;

pub use css_extractor::*;
pub use price::*;
pub use product_extractor::*;

use serde::{Deserialize, Serialize};

/// Placeholder for a field that could not be extracted
pub const SENTINEL: &str = "N/A";

/// Output column order
pub const COLUMNS: [&str; 3] = ["name", "price", "rating"];

/// One extracted product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub price: String,
    pub rating: String,
}

impl Record {
    pub fn new(name: impl Into<String>, price: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            rating: rating.into(),
        }
    }

    /// Field values in [`COLUMNS`] order
    pub fn values(&self) -> [&str; 3] {
        [&self.name, &self.price, &self.rating]
    }
}

/// Records in document order
pub type RecordSet = Vec<Record>;

/// Result of extracting a single container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerOutcome {
    Extracted(Record),
    /// `index` is the zero-based position among matched containers
    Skipped { index: usize, reason: String },
}

impl ContainerOutcome {
    pub fn into_record(self) -> Option<Record> {
        match self {
            ContainerOutcome::Extracted(record) => Some(record),
            ContainerOutcome::Skipped { .. } => None,
        }
    }
}
