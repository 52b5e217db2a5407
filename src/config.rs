// src/config.rs
// =============================================================================
// Run configuration.
//
// Every value has a compiled-in default aimed at the Cangjie language manual,
// so `doc-harvester` with no arguments performs the standard crawl. The CLI
// (cli.rs) can override any of them; `from_cli` merges the two.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::cli::Cli;
use crate::crawl::DEFAULT_MAX_PAGES;
use crate::error::{CrawlError, Result};
use crate::extract::{ConverterOptions, LinkPolicy};
use crate::output::DEFAULT_OUTPUT;
use crate::render::{BrowserSettings, RenderTiming};

/// Entry points of the manual, crawled in this order.
pub const DEFAULT_SEEDS: &[&str] = &[
    "https://docs.cangjie-lang.cn/docs/1.0.3/user_manual/source_zh_cn/first_understanding/hello_world.html",
    "https://docs.cangjie-lang.cn/docs/1.0.3/user_manual/source_zh_cn/index.html",
];

/// Pause after every page.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seeds: Vec<Url>,
    pub max_pages: usize,
    pub policy: LinkPolicy,
    pub delay: Duration,
    pub timing: RenderTiming,
    pub converter: ConverterOptions,
    /// Appended to the built-in content rule table, in order
    pub extra_content_rules: Vec<String>,
    pub browser: BrowserSettings,
    pub output: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            // The constants above are valid URLs; see test_default_seeds_parse
            seeds: DEFAULT_SEEDS
                .iter()
                .filter_map(|seed| Url::parse(seed).ok())
                .collect(),
            max_pages: DEFAULT_MAX_PAGES,
            policy: LinkPolicy::default(),
            delay: DEFAULT_DELAY,
            timing: RenderTiming::default(),
            converter: ConverterOptions::default(),
            extra_content_rules: Vec::new(),
            browser: BrowserSettings::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl CrawlConfig {
    // Builds the configuration for this run from parsed arguments.
    // Anything the user did not pass keeps its default.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::default();

        if !cli.seeds.is_empty() {
            config.seeds = cli
                .seeds
                .iter()
                .map(|seed| parse_seed(seed))
                .collect::<Result<Vec<_>>>()?;
        }
        if let Some(output) = &cli.output {
            config.output = output.clone();
        }
        if let Some(max_pages) = cli.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(domain) = &cli.domain {
            config.policy.domain = domain.clone();
        }
        if let Some(suffix) = &cli.suffix {
            config.policy.suffix = suffix.clone();
        }
        if let Some(ms) = cli.delay_ms {
            config.delay = Duration::from_millis(ms);
        }
        if let Some(secs) = cli.page_load_timeout_secs {
            config.timing.page_load_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = cli.settle_ms {
            config.timing.settle_delay = Duration::from_millis(ms);
        }
        if let Some(language) = &cli.code_language {
            config.converter.code_language = if language.is_empty() {
                None
            } else {
                Some(language.clone())
            };
        }
        config
            .extra_content_rules
            .extend(cli.content_selectors.iter().cloned());
        if let Some(chrome) = &cli.chrome {
            config.browser.executable = Some(chrome.clone());
        }
        config.browser.headless = !cli.headful;

        Ok(config)
    }
}

fn parse_seed(seed: &str) -> Result<Url> {
    Url::parse(seed).map_err(|source| CrawlError::InvalidSeed {
        url: seed.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_seeds_parse() {
        let config = CrawlConfig::default();
        assert_eq!(config.seeds.len(), DEFAULT_SEEDS.len());
        assert_eq!(config.max_pages, 500);
        assert_eq!(config.delay, Duration::from_secs(1));
        assert_eq!(config.policy.domain, "docs.cangjie-lang.cn");
    }

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let cli = Cli::parse_from(["doc-harvester"]);
        let config = CrawlConfig::from_cli(&cli).unwrap();
        assert_eq!(config.seeds, CrawlConfig::default().seeds);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(config.browser.headless);
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::parse_from([
            "doc-harvester",
            "https://docs.example.cn/start.html",
            "--max-pages",
            "10",
            "--domain",
            "docs.example.cn",
            "--delay-ms",
            "0",
            "--code-language",
            "",
            "--content-selector",
            "div.doc",
        ]);
        let config = CrawlConfig::from_cli(&cli).unwrap();
        assert_eq!(config.seeds.len(), 1);
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.policy.domain, "docs.example.cn");
        assert_eq!(config.delay, Duration::ZERO);
        assert_eq!(config.converter.code_language, None);
        assert_eq!(config.extra_content_rules, vec!["div.doc".to_string()]);
    }

    #[test]
    fn test_invalid_seed_rejected() {
        let cli = Cli::parse_from(["doc-harvester", "not a url"]);
        assert!(matches!(
            CrawlConfig::from_cli(&cli),
            Err(CrawlError::InvalidSeed { .. })
        ));
    }
}
