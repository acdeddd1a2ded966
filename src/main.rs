use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use product_scraper::{FetchSettings, ScrapeOutcome, ScrapePipeline, SelectorConfig, SitePreset};

#[derive(Parser, Debug)]
#[command(name = "product-scraper", about = "Scrape product names, prices and ratings into CSV")]
struct Cli {
    /// Page to scrape (defaults to the preset's URL when --site is given)
    #[arg(long)]
    url: Option<String>,

    /// Built-in site preset, see --list-sites
    #[arg(long)]
    site: Option<String>,

    /// JSON file with container, name, price and rating selectors
    #[arg(long, value_name = "PATH")]
    selectors: Option<PathBuf>,

    /// Product container selector
    #[arg(long)]
    container: Option<String>,

    /// Name selector, evaluated inside each container
    #[arg(long)]
    name: Option<String>,

    /// Price selector, evaluated inside each container
    #[arg(long)]
    price: Option<String>,

    /// Rating selector, evaluated inside each container
    #[arg(long)]
    rating: Option<String>,

    /// Extra pages to scrape after --url (or the preset's URL)
    #[arg(long, value_name = "URL", num_args = 1..)]
    pages: Vec<String>,

    /// JSON file with user_agent, timeout_secs and page_delay_ms
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Output CSV path (default: products_YYYYMMDD_HHMMSS.csv)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the built-in site presets and exit
    #[arg(long)]
    list_sites: bool,

    /// Log file written alongside console output
    #[arg(long, value_name = "PATH", default_value = "scraper.log")]
    log_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(&cli.log_file, cli.verbose);

    if cli.list_sites {
        list_sites();
        return Ok(());
    }

    let preset = cli.site.as_deref().map(SitePreset::find).transpose()?;
    let selectors = resolve_selectors(&cli, preset.as_ref())?;

    let urls = resolve_urls(&cli, preset.as_ref())?;

    let settings = match &cli.settings {
        Some(path) => FetchSettings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => FetchSettings::default(),
    };

    let pipeline = ScrapePipeline::with_settings(settings);
    let outcome = pipeline
        .scrape_pages(&urls, &selectors, cli.output.as_deref())
        .context("scraping failed")?;

    match outcome {
        ScrapeOutcome::Written { path, records } => {
            println!("Scraped {} product(s), saved to {}", records, path.display());
        }
        ScrapeOutcome::NoRecords => {
            println!("No products were found; check the selectors.");
        }
    }

    Ok(())
}

/// Console plus plain-text file logging; the guard flushes the file on drop
fn init_logging(log_file: &Path, verbose: bool) -> WorkerGuard {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (dir, file_name) = split_log_path(log_file);
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    guard
}

fn split_log_path(path: &Path) -> (&Path, &OsStr) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    (dir, path.file_name().unwrap_or(OsStr::new("scraper.log")))
}

/// The start page (`--url`, else the preset's URL) followed by `--pages`
fn resolve_urls(cli: &Cli, preset: Option<&SitePreset>) -> Result<Vec<String>> {
    let start = cli.url.clone().or_else(|| preset.map(|p| p.url.clone()));

    let urls: Vec<String> = start.into_iter().chain(cli.pages.iter().cloned()).collect();
    if urls.is_empty() {
        bail!("nothing to scrape: pass --url, --pages or --site");
    }
    Ok(urls)
}

fn resolve_selectors(cli: &Cli, preset: Option<&SitePreset>) -> Result<SelectorConfig> {
    let base = match (&cli.selectors, preset) {
        (Some(path), _) => Some(
            SelectorConfig::from_json_file(path)
                .with_context(|| format!("loading selectors from {}", path.display()))?,
        ),
        (None, Some(preset)) => Some(preset.selectors.clone()),
        (None, None) => None,
    };

    let pick = |flag: &Option<String>, from_base: Option<&String>, key: &str| -> Result<String> {
        match (flag, from_base) {
            (Some(value), _) => Ok(value.clone()),
            (None, Some(value)) => Ok(value.clone()),
            (None, None) => bail!("missing selector '{}': pass --{} or use --site/--selectors", key, key),
        }
    };

    Ok(SelectorConfig {
        container: pick(&cli.container, base.as_ref().map(|b| &b.container), "container")?,
        name: pick(&cli.name, base.as_ref().map(|b| &b.name), "name")?,
        price: pick(&cli.price, base.as_ref().map(|b| &b.price), "price")?,
        rating: pick(&cli.rating, base.as_ref().map(|b| &b.rating), "rating")?,
    })
}

fn list_sites() {
    for preset in SitePreset::builtin() {
        println!("{} ({})", preset.name, preset.key);
        println!("  URL: {}", preset.url);
        println!("  Difficulty: {}", preset.difficulty);
        println!("  {}", preset.description);
        if let Some(notes) = &preset.notes {
            println!("  Notes: {}", notes);
        }
        let s = &preset.selectors;
        println!(
            "  Selectors: container={} name={} price={} rating={}",
            s.container, s.name, s.price, s.rating
        );
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("product-scraper").chain(args.iter().copied())).unwrap()
    }

    fn urls_for(args: &[&str]) -> Result<Vec<String>> {
        let cli = parse(args);
        let preset = cli.site.as_deref().map(SitePreset::find).transpose()?;
        resolve_urls(&cli, preset.as_ref())
    }

    #[test]
    fn test_site_with_extra_pages_keeps_preset_url() {
        let preset = SitePreset::find("books_toscrape").unwrap();
        let urls = urls_for(&["--site", "books_toscrape", "--pages", "https://example.com/p2"]).unwrap();
        assert_eq!(urls, vec![preset.url.clone(), "https://example.com/p2".to_string()]);
    }

    #[test]
    fn test_url_overrides_preset_url() {
        let urls = urls_for(&[
            "--site",
            "books_toscrape",
            "--url",
            "https://example.com/start",
            "--pages",
            "https://example.com/2",
            "https://example.com/3",
        ])
        .unwrap();
        assert_eq!(
            urls,
            vec!["https://example.com/start", "https://example.com/2", "https://example.com/3"]
        );
    }

    #[test]
    fn test_repeated_pages_flag_appends() {
        let urls = urls_for(&["--pages", "https://a.test/1", "--pages", "https://a.test/2"]).unwrap();
        assert_eq!(urls, vec!["https://a.test/1", "https://a.test/2"]);
    }

    #[test]
    fn test_nothing_to_scrape() {
        let err = urls_for(&["--container", "div"]).unwrap_err();
        assert!(err.to_string().contains("--pages"));
    }

    #[test]
    fn test_singular_page_flag_is_rejected() {
        assert!(Cli::try_parse_from(["product-scraper", "--page", "https://a.test/1"]).is_err());
    }

    #[test]
    fn test_log_file_defaults_to_working_directory() {
        let cli = parse(&[]);
        assert_eq!(cli.log_file, PathBuf::from("scraper.log"));

        let (dir, file) = split_log_path(&cli.log_file);
        assert_eq!(dir, Path::new("."));
        assert_eq!(file, OsStr::new("scraper.log"));

        let custom = PathBuf::from("/var/log/scrapes/run.log");
        let (dir, file) = split_log_path(&custom);
        assert_eq!(dir, Path::new("/var/log/scrapes"));
        assert_eq!(file, OsStr::new("run.log"));
    }
}
