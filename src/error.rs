// src/error.rs
// =============================================================================
// Error types for the crawl pipeline.
//
// Most faults during a crawl are recovered locally (a page that fails to load,
// a link that cannot be parsed) and never become a CrawlError. What ends up
// here is either a setup problem (bad seed URL, browser that will not start)
// or a failure that makes continuing pointless (the output file cannot be
// written).
//
// main.rs wraps these in anyhow::Error to attach context before printing.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// A seed URL from the configuration could not be parsed
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A CSS selector in the content rule table is malformed
    #[error("invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// The headless browser could not be configured or launched
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// A DevTools protocol call failed
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// HTML to Markdown conversion failed
    #[error("markdown conversion failed: {0}")]
    Convert(String),

    /// The crawl loop panicked; the renderer was still shut down
    #[error("crawl aborted by panic: {0}")]
    Panicked(String),

    /// The aggregate output file could not be written
    #[error("failed to write output '{path}': {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CrawlError>;
