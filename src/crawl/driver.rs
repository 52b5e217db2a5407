// src/crawl/driver.rs
// =============================================================================
// The crawl loop.
//
// Per URL:
//   queued -> fetching -> fetched | fetch_failed
//   fetched -> select content -> convert -> written | discarded (too short)
//   fetched -> extract links -> enqueue new ones
//
// The URL is marked visited before it is fetched, so a failed page is never
// retried in the same run. A timed-out page is processed with whatever markup
// the browser had. Only a failure to write the output file ends the crawl
// with an error; everything else is logged and counted.
//
// `run_session` wraps a crawl so that the renderer is shut down no matter how
// the loop ends: completed, interrupted, failed or panicked.
// =============================================================================

use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::frontier::Frontier;
use super::interrupt::Interrupt;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};
use crate::extract::{extract_links, ContentSelector, Conversion, LinkPolicy, MarkdownConverter};
use crate::output::AggregateWriter;
use crate::render::{Release, RenderOutcome, RenderTiming, Renderer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Nothing left in the queue
    #[default]
    Exhausted,
    /// The page ceiling was hit with URLs still queued
    CeilingReached,
    Interrupted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub visited: usize,
    pub written: usize,
    pub discarded: usize,
    pub fetch_failures: usize,
    pub timeouts: usize,
    pub conversion_failures: usize,
    pub links_enqueued: usize,
    pub links_skipped: usize,
    pub stop: StopReason,
}

pub struct CrawlDriver {
    frontier: Frontier,
    policy: LinkPolicy,
    timing: RenderTiming,
    delay: Duration,
    selector: ContentSelector,
    converter: MarkdownConverter,
}

impl CrawlDriver {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        // Seeds get the same canonical form as discovered links
        let seeds = config.seeds.iter().map(|seed| {
            let mut seed = seed.clone();
            seed.set_fragment(None);
            seed
        });

        let selector = config
            .extra_content_rules
            .iter()
            .try_fold(ContentSelector::new()?, |selector, css| selector.with_rule(css))?;
        debug!(
            rules = ?selector.rule_names().collect::<Vec<_>>(),
            "content rules"
        );

        Ok(Self {
            frontier: Frontier::with_seeds(seeds, config.max_pages),
            policy: config.policy.clone(),
            timing: config.timing,
            delay: config.delay,
            selector,
            converter: MarkdownConverter::new(config.converter.clone()),
        })
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    // Runs until the frontier is empty, the page ceiling is reached, or the
    // interrupt is raised.
    //
    // Returns: counters for the run, or the output error that stopped it
    pub async fn run<R: Renderer>(
        &mut self,
        renderer: &mut R,
        writer: &AggregateWriter,
        interrupt: &mut Interrupt,
    ) -> Result<CrawlReport> {
        let mut report = CrawlReport::default();

        loop {
            if interrupt.is_raised() {
                report.stop = StopReason::Interrupted;
                break;
            }

            let Some(url) = self.frontier.pop() else {
                report.stop = if self.frontier.ceiling_reached() && !self.frontier.is_empty() {
                    StopReason::CeilingReached
                } else {
                    StopReason::Exhausted
                };
                break;
            };

            self.frontier.mark_visited(&url);
            report.visited += 1;
            info!(
                "📊 progress {}/{}: {}",
                self.frontier.visited_count(),
                self.frontier.max_pages(),
                url
            );

            let outcome = tokio::select! {
                outcome = renderer.render(&url, &self.timing) => Some(outcome),
                _ = interrupt.raised() => None,
            };
            let Some(outcome) = outcome else {
                warn!(%url, "page abandoned by interrupt");
                report.stop = StopReason::Interrupted;
                break;
            };

            self.process_page(&url, outcome, writer, &mut report)?;
            info!("   queue remaining: {}", self.frontier.queued_count());

            tokio::time::sleep(self.delay).await;
        }

        Ok(report)
    }

    fn process_page(
        &mut self,
        url: &Url,
        outcome: RenderOutcome,
        writer: &AggregateWriter,
        report: &mut CrawlReport,
    ) -> Result<()> {
        let markup = match &outcome {
            RenderOutcome::Ready(html) => html,
            RenderOutcome::TimedOut(html) => {
                warn!(%url, "⏱️  load timed out, continuing with partial markup");
                report.timeouts += 1;
                html
            }
            RenderOutcome::Failed(reason) => {
                warn!(%url, "❌ load failed: {}", reason);
                report.fetch_failures += 1;
                return Ok(());
            }
        };

        let selected = self.selector.select(markup);
        debug!(%url, matched = %selected.matched, "content selected");

        match self.converter.convert(&selected, url) {
            Ok(Conversion::Document(document)) => {
                writer.append(&document.to_string())?;
                report.written += 1;
                info!("   ✅ appended to {}", writer.path().display());
            }
            Ok(Conversion::TooShort { length }) => {
                info!("   skipped: only {} characters of content", length);
                report.discarded += 1;
            }
            Err(e) => {
                warn!(%url, "conversion failed: {}", e);
                report.conversion_failures += 1;
            }
        }

        match extract_links(markup, url, &self.policy, self.frontier.visited()) {
            Ok(extraction) => {
                for skipped in &extraction.skipped {
                    debug!(href = %skipped.href, reason = %skipped.reason, "link skipped");
                }
                report.links_skipped += extraction.skipped.len();

                let found = extraction.links.len();
                let added = extraction
                    .links
                    .into_iter()
                    .filter(|link| self.frontier.enqueue(link.clone()))
                    .count();
                report.links_enqueued += added;
                info!("   found {} links, {} new", found, added);
            }
            Err(e) => warn!(%url, "⚠️  link extraction failed: {}", e),
        }

        Ok(())
    }
}

// Drives a full crawl and then releases the renderer, on every exit path.
//
// Returns: the crawl result (a panic inside the loop becomes
// CrawlError::Panicked) together with how the renderer was released
pub async fn run_session<R: Renderer>(
    mut renderer: R,
    driver: &mut CrawlDriver,
    writer: &AggregateWriter,
    interrupt: &mut Interrupt,
) -> (Result<CrawlReport>, Release) {
    let result = AssertUnwindSafe(driver.run(&mut renderer, writer, interrupt))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(CrawlError::Panicked(panic_message(panic.as_ref()))));

    let release = renderer.shutdown().await;
    (result, release)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
