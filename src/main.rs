// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Crawl the website, stopping early on Ctrl+C or the --deadline
// 4. Print the JSON report to stdout
// 5. Exit with proper code (0 = report printed, 2 = invalid root URL / error)
// =============================================================================

mod checker;
mod cli;
mod config;
mod crawl;
mod error;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use crawl::Website;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise info (or debug with --verbose) for
// this crate only. Logs go to stderr so stdout stays valid JSON.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "site_census=debug"
    } else {
        "site_census=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Fails fast on a malformed root URL, before any request is made
    let website = Website::with_config(&cli.root_url, cli.crawl_config())?;

    // Ctrl+C stops the crawl but still prints what was found so far
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C, finishing with partial results");
                cancel.cancel();
            }
        });
    }

    let status = website.get_status(cancel).await;
    println!("{}", status.to_json(!cli.compact)?);

    Ok(())
}
