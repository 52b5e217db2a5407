// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - Breadth-first traversal from one or more seed URLs
// - At-most-once dispatch of every canonical URL per run
// - A page ceiling to bound runs on sites with link cycles
// - A fixed pause between pages to stay polite to the server
// - Clean stop on Ctrl-C, with the browser always released
//
// Submodules:
// - frontier: queue + visited set + ceiling
// - driver: the per-page state machine and the session wrapper
// - interrupt: Ctrl-C flag shared with the driver
// =============================================================================

mod driver;
mod frontier;
mod interrupt;

pub use driver::{run_session, CrawlDriver, CrawlReport, StopReason};
pub use frontier::DEFAULT_MAX_PAGES;
pub use interrupt::Interrupt;
