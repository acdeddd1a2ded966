//! Container-driven product extraction

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, info_span, warn, Span};

use super::{compile_selector, normalize_price, ContainerOutcome, FieldQuery, Record, RecordSet, SENTINEL};
use crate::config::SelectorConfig;
use crate::error::ScrapeResult;

/// Extracts one [`Record`] per container matched by a [`SelectorConfig`].
///
/// Selectors are compiled once; the extractor holds no per-document state
/// and can be reused for any number of pages.
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    container: Selector,
    name: FieldQuery,
    price: FieldQuery,
    rating: FieldQuery,
    span: Span,
}

impl ProductExtractor {
    /// Compile the configured selectors.
    ///
    /// Fails only when the container selector is invalid. A broken field
    /// selector is logged and then behaves as "no match".
    pub fn new(config: &SelectorConfig) -> ScrapeResult<Self> {
        let span = info_span!("extract", container = %config.container);
        let container = compile_selector(config.container.trim())?;

        let (name, price, rating) = span.in_scope(|| {
            (
                FieldQuery::compile("name", &config.name),
                FieldQuery::compile("price", &config.price),
                FieldQuery::compile("rating", &config.rating),
            )
        });

        Ok(Self {
            container,
            name,
            price,
            rating,
            span,
        })
    }

    /// Replace the span all extraction events are recorded under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Extract records from every container, in document order.
    ///
    /// A document without matching containers yields an empty set.
    pub fn extract(&self, document: &Html) -> RecordSet {
        let _entered = self.span.enter();

        let outcomes = self.collect_outcomes(document, |container| Ok(self.read_container(container)));
        let found = outcomes.len();
        let records: RecordSet = outcomes
            .into_iter()
            .filter_map(ContainerOutcome::into_record)
            .collect();

        info!(
            "Successfully extracted {} product(s) from {} container(s)",
            records.len(),
            found
        );
        records
    }

    /// Run `read` over every container and keep the per-container outcome.
    ///
    /// A container whose reader fails is reported as
    /// [`ContainerOutcome::Skipped`]; its siblings are unaffected.
    pub fn extract_with<F>(&self, document: &Html, read: F) -> Vec<ContainerOutcome>
    where
        F: FnMut(ElementRef<'_>) -> ScrapeResult<Record>,
    {
        let _entered = self.span.enter();
        self.collect_outcomes(document, read)
    }

    /// Read the three fields of one container
    pub fn read_container(&self, container: ElementRef<'_>) -> Record {
        let name = self.name.read(container);
        let price = self.price.read(container).map(|text| normalize_price(&text));
        let rating = self.rating.read(container);

        Record {
            name: name.unwrap_or_else(|| SENTINEL.to_string()),
            price: price.unwrap_or_else(|| SENTINEL.to_string()),
            rating: rating.unwrap_or_else(|| SENTINEL.to_string()),
        }
    }

    fn collect_outcomes<F>(&self, document: &Html, mut read: F) -> Vec<ContainerOutcome>
    where
        F: FnMut(ElementRef<'_>) -> ScrapeResult<Record>,
    {
        let containers: Vec<ElementRef<'_>> = document.select(&self.container).collect();
        info!("Found {} product(s)", containers.len());

        containers
            .into_iter()
            .enumerate()
            .map(|(index, container)| match read(container) {
                Ok(record) => {
                    debug!("Extracted product at index {}: {}", index, record.name);
                    ContainerOutcome::Extracted(record)
                }
                Err(e) => {
                    warn!("Skipping product at index {}: {}", index, e);
                    ContainerOutcome::Skipped {
                        index,
                        reason: e.to_string(),
                    }
                }
            })
            .collect()
    }
}

/// Extract records from `document` with a one-off extractor
pub fn extract(document: &Html, config: &SelectorConfig) -> ScrapeResult<RecordSet> {
    Ok(ProductExtractor::new(config)?.extract(document))
}
