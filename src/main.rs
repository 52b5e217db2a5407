// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments and build the run configuration
// 2. Set up logging and the Ctrl-C listener
// 3. Launch headless Chromium and run the crawl session
// 4. Print a summary and exit with a code describing how the run ended:
//      0   = finished (frontier exhausted or page ceiling reached)
//      130 = stopped by Ctrl-C
//      2   = fatal error (bad config, browser launch, output I/O, panic)
//
// The browser is released inside run_session on every path, including
// interrupts and errors, before we get back here.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod extract;
mod output;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CrawlConfig;
use crawl::{run_session, CrawlDriver, CrawlReport, Interrupt, StopReason};
use output::AggregateWriter;
use render::{ChromeRenderer, Release};

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 2;
// Conventional 128 + SIGINT
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:?} on anyhow::Error prints the whole cause chain
            error!("❌ {:?}", e);
            EXIT_FAILURE
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,doc_harvester=debug,chromiumoxide=warn"
    } else {
        "info,chromiumoxide=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = CrawlConfig::from_cli(&cli).context("invalid configuration")?;

    println!("{}", "=".repeat(70));
    println!("🚀 doc-harvester: appending every page to one Markdown file");
    println!("{}", "=".repeat(70));
    println!("📁 Output: {}", config.output.display());
    println!("🎯 Seeds: {}", config.seeds.len());
    println!("📊 Max pages: {}\n", config.max_pages);

    let mut driver = CrawlDriver::new(&config).context("failed to build crawl pipeline")?;
    let writer = AggregateWriter::new(&config.output);

    // Listen before launching so an early Ctrl-C still goes through cleanup
    let mut interrupt = Interrupt::on_ctrl_c();

    let renderer = ChromeRenderer::launch(&config.browser)
        .await
        .context("could not start headless Chromium")?;

    let (result, release) = run_session(renderer, &mut driver, &writer, &mut interrupt).await;
    match release {
        Release::Graceful => info!("🔒 browser closed"),
        Release::Killed => warn!("🔒 browser killed after graceful shutdown failed"),
        Release::Failed(reason) => error!("browser may still be running: {}", reason),
    }

    let report = result.context("crawl aborted")?;
    print_summary(&report, &writer, driver.frontier().queued_count());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(match report.stop {
        StopReason::Interrupted => EXIT_INTERRUPTED,
        StopReason::Exhausted | StopReason::CeilingReached => EXIT_OK,
    })
}

fn print_summary(report: &CrawlReport, writer: &AggregateWriter, left_in_queue: usize) {
    println!("\n{}", "=".repeat(70));
    match report.stop {
        StopReason::Interrupted => {
            println!("⚠️  Interrupted, {} page(s) crawled", report.visited)
        }
        StopReason::CeilingReached => {
            println!("✨ Page limit reached, {} page(s) crawled", report.visited)
        }
        StopReason::Exhausted => println!("✨ Crawl complete, {} page(s) crawled", report.visited),
    }
    println!("   ✅ Written: {}", report.written);
    println!("   🗑️  Too short: {}", report.discarded);
    println!("   ❌ Failed: {}", report.fetch_failures);
    println!("   ⏱️  Timed out: {}", report.timeouts);
    println!("   🔗 Links queued: {} ({} never fetched)", report.links_enqueued, left_in_queue);
    println!("📂 Saved to: {}", writer.path().display());
    println!("{}", "=".repeat(70));
}
