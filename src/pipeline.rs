//! Fetch → extract → export

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{error, info, info_span, warn};

use crate::config::{FetchSettings, SelectorConfig};
use crate::error::ScrapeResult;
use crate::export::CsvExporter;
use crate::extractors::{ProductExtractor, RecordSet};
use crate::fetch::PageFetcher;

/// How a scrape run ended when nothing failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// No container matched, so no file was written
    NoRecords,
    Written { path: PathBuf, records: usize },
}

pub struct ScrapePipeline {
    fetcher: PageFetcher,
    exporter: CsvExporter,
}

impl Default for ScrapePipeline {
    fn default() -> Self {
        Self::new(PageFetcher::default(), CsvExporter::new())
    }
}

impl ScrapePipeline {
    pub fn new(fetcher: PageFetcher, exporter: CsvExporter) -> Self {
        Self { fetcher, exporter }
    }

    pub fn with_settings(settings: FetchSettings) -> Self {
        Self::new(PageFetcher::new(settings), CsvExporter::new())
    }

    /// Scrape one page into `output` (or a timestamped file)
    pub fn scrape(
        &self,
        url: &str,
        selectors: &SelectorConfig,
        output: Option<&Path>,
    ) -> ScrapeResult<ScrapeOutcome> {
        self.scrape_pages(&[url], selectors, output)
    }

    /// Scrape several pages in order and export all records to one file.
    ///
    /// Waits the configured page delay between consecutive fetches.
    pub fn scrape_pages<S: AsRef<str>>(
        &self,
        urls: &[S],
        selectors: &SelectorConfig,
        output: Option<&Path>,
    ) -> ScrapeResult<ScrapeOutcome> {
        let span = info_span!("scrape", pages = urls.len());
        let _entered = span.enter();

        let result = self
            .collect(urls, selectors)
            .and_then(|records| self.export(&records, output));

        if let Err(e) = &result {
            error!("Scraping failed: {}", e);
        }
        result
    }

    fn collect<S: AsRef<str>>(&self, urls: &[S], selectors: &SelectorConfig) -> ScrapeResult<RecordSet> {
        let extractor = ProductExtractor::new(selectors)?;
        let delay = Duration::from_millis(self.fetcher.settings().page_delay_ms);
        let mut records = RecordSet::new();

        for (page, url) in urls.iter().enumerate() {
            if page > 0 && !delay.is_zero() {
                thread::sleep(delay);
            }

            let document = self.fetcher.fetch(url.as_ref())?;
            let page_records = extractor.extract(&document);
            info!("Page {} yielded {} product(s)", page + 1, page_records.len());
            records.extend(page_records);
        }

        Ok(records)
    }

    fn export(&self, records: &RecordSet, output: Option<&Path>) -> ScrapeResult<ScrapeOutcome> {
        if records.is_empty() {
            warn!("No products found to export");
            return Ok(ScrapeOutcome::NoRecords);
        }

        let path = self.exporter.export(records, output)?;
        Ok(ScrapeOutcome::Written {
            path,
            records: records.len(),
        })
    }
}

/// Scrape one page with default fetch settings
pub fn scrape_website(
    url: &str,
    selectors: &SelectorConfig,
    output: Option<&Path>,
) -> ScrapeResult<ScrapeOutcome> {
    ScrapePipeline::default().scrape(url, selectors, output)
}
