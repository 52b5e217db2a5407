// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Everything is optional. Running `doc-harvester` alone crawls the Cangjie
// manual with the defaults from config.rs; the flags exist to point it at a
// different entry page, a smaller page budget, or another output file.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "doc-harvester",
    version,
    about = "Crawl a JavaScript-rendered documentation site into a single Markdown file",
    long_about = "doc-harvester loads every page of a documentation site in headless Chromium, \
                  keeps the main content, converts it to Markdown and appends it to one file. \
                  Press Ctrl-C to stop early; pages already written are kept."
)]
pub struct Cli {
    /// Start URLs, crawled breadth-first in the order given
    ///
    /// Defaults to the entry pages of the Cangjie user manual
    pub seeds: Vec<String>,

    /// File that converted pages are appended to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after this many pages have been dispatched (default: 500)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Only follow links on this host
    #[arg(long)]
    pub domain: Option<String>,

    /// Only follow links ending with this suffix (default: .html)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Pause between pages, in milliseconds (default: 1000)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Navigation timeout per page, in seconds (default: 30)
    #[arg(long)]
    pub page_load_timeout_secs: Option<u64>,

    /// Extra wait after a page is ready, in milliseconds (default: 2000)
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Extra CSS selector for the content area, tried after the built-in ones
    ///
    /// Can be given several times; earlier ones win
    #[arg(long = "content-selector", value_name = "CSS")]
    pub content_selectors: Vec<String>,

    /// Language tag for unlabelled code blocks; pass "" to leave them bare
    #[arg(long)]
    pub code_language: Option<String>,

    /// Path to the Chrome/Chromium binary
    #[arg(long)]
    pub chrome: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headful: bool,

    /// Print the crawl report as JSON when done
    #[arg(long)]
    pub json: bool,

    /// Log per-link and per-selector details
    #[arg(short, long)]
    pub verbose: bool,
}
