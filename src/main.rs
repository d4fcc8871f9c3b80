//!
//! src/main.rs  Andrew Belles  Oct 18th, 2026
//!
//! Entry point: scores one artist (optionally a second for comparison),
//! writes one csv per artist and prints the summary
//!
//!

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use sbi_crawler::{cli, config, fetch, logging, pipeline, reporter, sink, SbiError};
use sbi_crawler::joiner::JoinOptions;

#[tokio::main]
async fn main() -> Result<(), SbiError> {
    let args = cli::Args::parse();
    let cfgs = config::load_config()?;
    let _logger = logging::init_logging(&cfgs.logging)?;

    info!(
        service = "sbi-crawler",
        version = %env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let mut concurrency = cfgs.concurrency.clone();
    if let Some(n) = args.concurrency {
        concurrency.feature_concurrency = n.max(1);
    }
    if args.no_duration {
        concurrency.fetch_duration = false;
    }

    let spotify = Arc::new(fetch::SpotifyCatalog::new(&cfgs.http, &cfgs.spotify)?);
    let mut pipeline = pipeline::Pipeline::new(spotify, JoinOptions::from(&concurrency));
    if let Some(formula) = args.formula()? {
        pipeline = pipeline.with_formula(formula);
    }

    let shutdown = pipeline.shutdown();
    let trigger = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(msg = "cancelling pipeline run", "sbi.signal");
            shutdown.cancel();
        }
    });

    let catalogs = pipeline.run_all(&args.requests()).await;
    trigger.abort();
    let catalogs = catalogs?;

    let output_dir = args.output_dir.clone().unwrap_or_else(|| cfgs.output.dir.clone());
    let sink = sink::CsvSink::new(output_dir);
    for catalog in &catalogs {
        sink.write_catalog(catalog)?;
    }

    let report = reporter::compare(&catalogs, args.top)?;
    println!("{report}");

    for title in &args.tracks {
        for catalog in &catalogs {
            match reporter::find_by_title(&catalog.records, title) {
                Some(record) => println!("{}: {}", catalog.artist, reporter::TrackDetail(record)),
                None => warn!(artist = %catalog.artist, track = %title, "sbi.track.missing")
            }
        }
    }

    info!("sbi.exit");
    Ok(())
}
