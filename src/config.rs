//! Selector configuration, site presets and fetch settings
//!
//! All configuration is plain serde data so it can be loaded from JSON
//! files or handed across the FFI boundary as a JSON string.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ScrapeError, ScrapeResult};

/// CSS selectors describing one repeated product listing.
///
/// `container` selects every product node in the document; the three field
/// selectors are evaluated inside each container. All four keys are required
/// when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub container: String,
    pub name: String,
    pub price: String,
    pub rating: String,
}

impl SelectorConfig {
    pub fn new(
        container: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
        rating: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            name: name.into(),
            price: price.into(),
            rating: rating.into(),
        }
    }

    pub fn from_json_str(json: &str) -> ScrapeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> ScrapeResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
        Self::from_json_str(&json)
    }
}

/// How a matched field element is turned into a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAccessor {
    /// Visible text content, trimmed
    Text,
    /// Value of the named attribute
    Attr(String),
}

/// Split a field selector into the CSS part and its accessor.
///
/// Supports a trailing `::text` or `::attr(name)`; anything else is plain
/// CSS read as text.
pub fn split_accessor(input: &str) -> (&str, FieldAccessor) {
    let input = input.trim();

    if let Some(css) = input.strip_suffix("::text") {
        return (css.trim_end(), FieldAccessor::Text);
    }

    if input.ends_with(')') {
        if let Some(pos) = input.rfind("::attr(") {
            let attr_name = input[pos + 7..input.len() - 1].trim();
            if !attr_name.is_empty() {
                return (input[..pos].trim_end(), FieldAccessor::Attr(attr_name.to_string()));
            }
        }
    }

    (input, FieldAccessor::Text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        };
        f.write_str(label)
    }
}

/// Ready-made selector table for a known site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitePreset {
    pub key: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub notes: Option<String>,
    pub difficulty: Difficulty,
}

impl SitePreset {
    /// Built-in presets, in display order
    pub fn builtin() -> Vec<SitePreset> {
        vec![
            preset(
                "books_toscrape",
                "Books.toscrape.com",
                "https://books.toscrape.com/",
                "Sandbox catalogue that explicitly allows scraping",
                SelectorConfig::new("article.product_pod", "h3 a", "p.price_color", "p.star-rating"),
                Some("No authentication needed, good for learning"),
                Difficulty::Easy,
            ),
            preset(
                "quotes_toscrape",
                "Quotes.toscrape.com",
                "https://quotes.toscrape.com/",
                "Simple structured website for learning",
                // tags stand in for price and the author for rating
                SelectorConfig::new("div.quote", "span.text", "span.tag-item", "small.author"),
                Some("Great for learning basic scraping techniques"),
                Difficulty::Easy,
            ),
            preset(
                "generic_store",
                "Generic E-commerce Store",
                "https://example-ecommerce.com/products",
                "Template for static HTML e-commerce sites",
                SelectorConfig::new(
                    "div.product, article.product-item",
                    "h3.product-name, .product-title",
                    "span.price, .product-price",
                    r#".rating, .stars, [class*="review"]"#,
                ),
                Some("Customize selectors based on actual site structure"),
                Difficulty::Easy,
            ),
            preset(
                "ebay_example",
                "eBay",
                "https://www.ebay.com/sch/i.html",
                "Offers an official API as a better alternative",
                SelectorConfig::new(".s-item", ".s-item__title", ".s-item__price", ".s-item__reviews"),
                Some("Prefer the official API where possible"),
                Difficulty::Medium,
            ),
            preset(
                "amazon_example",
                "Amazon",
                "https://www.amazon.com/s",
                "Listing is rendered by JavaScript",
                SelectorConfig::new(
                    r#"[data-component-type="s-search-result"]"#,
                    "h2 a span",
                    ".a-price-whole",
                    ".a-star-small",
                ),
                Some("Needs a rendering browser; static fetches usually return no products"),
                Difficulty::Hard,
            ),
            preset(
                "walmart_example",
                "Walmart",
                "https://www.walmart.com/search/",
                "JavaScript heavy, dynamic content",
                SelectorConfig::new(
                    "[data-item-id]",
                    r#"a.absolute[href*="/ip/"]"#,
                    "span.price",
                    r#"div[aria-label*="star"]"#,
                ),
                Some("May require JavaScript rendering"),
                Difficulty::Hard,
            ),
        ]
    }

    /// Look up a built-in preset by key
    pub fn find(key: &str) -> ScrapeResult<SitePreset> {
        let presets = Self::builtin();
        let available = presets
            .iter()
            .map(|p| p.key.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        presets
            .iter()
            .find(|p| p.key == key)
            .cloned()
            .ok_or_else(|| {
                ScrapeError::Config(format!("unknown site '{}', available: {}", key, available))
            })
    }
}

fn preset(
    key: &str,
    name: &str,
    url: &str,
    description: &str,
    selectors: SelectorConfig,
    notes: Option<&str>,
    difficulty: Difficulty,
) -> SitePreset {
    SitePreset {
        key: key.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        description: description.to_string(),
        selectors,
        notes: notes.map(String::from),
        difficulty,
    }
}

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Settings for the page fetcher and multi-page runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub user_agent: String,
    /// Whole-request timeout
    pub timeout_secs: u64,
    /// Pause between consecutive page fetches
    pub page_delay_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            page_delay_ms: 1000,
        }
    }
}

impl FetchSettings {
    pub fn from_json_file(path: &Path) -> ScrapeResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}
