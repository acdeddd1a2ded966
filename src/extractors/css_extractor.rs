//! CSS selector-based field reading
//!
//! Uses the scraper crate to select elements by CSS selectors, scoped to a
//! single container element.

use scraper::{ElementRef, Selector};
use tracing::warn;

use crate::config::{split_accessor, FieldAccessor};
use crate::error::{ScrapeError, ScrapeResult};

/// Compile a selector, keeping the source text in the error
pub fn compile_selector(selector_str: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector_str).map_err(|e| ScrapeError::Query {
        selector: selector_str.to_string(),
        message: e.to_string(),
    })
}

/// Text content of an element with every text node trimmed before joining,
/// so markup indentation never reaches the field
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// First descendant of `scope` matching `selector`.
///
/// scraper's `select` also tests the scope element itself, which is skipped
/// here so a field never resolves to its own container.
pub fn select_first_within<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).find(|el| el.id() != scope.id())
}

/// A compiled field selector together with its accessor
#[derive(Debug, Clone)]
pub struct FieldQuery {
    source: String,
    /// `None` when the selector failed to compile; such a field never matches
    selector: Option<Selector>,
    accessor: FieldAccessor,
}

impl FieldQuery {
    pub fn compile(field: &str, source: &str) -> Self {
        let (css, accessor) = split_accessor(source);

        let selector = match compile_selector(css) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("Selector for '{}' will never match: {}", field, e);
                None
            }
        };

        Self {
            source: source.to_string(),
            selector,
            accessor,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.selector.is_some()
    }

    /// Read the first match inside `scope`.
    ///
    /// Returns `None` when nothing matches, or when an attribute accessor
    /// names an attribute the element does not carry.
    pub fn read(&self, scope: ElementRef<'_>) -> Option<String> {
        let selector = self.selector.as_ref()?;
        let element = select_first_within(scope, selector)?;

        match &self.accessor {
            FieldAccessor::Text => Some(element_text(element)),
            FieldAccessor::Attr(name) => element.value().attr(name).map(|v| v.trim().to_string()),
        }
    }
}
