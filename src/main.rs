#![deny(clippy::all)]
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use downbooru::{
    cli::Cli, client, config::ApiConfig, FetchQueue, FetchSummary, GelbooruSource,
    HttpImageFetcher, Verbosity,
};
use log::debug;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    let verbosity = args.verbosity();
    verbosity.init_logger();

    let config = ApiConfig::load().await?;
    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.timeout());
    debug!("Request timeout: {:?}", timeout);

    let client = client!(timeout)?;

    let queue = FetchQueue::new(
        GelbooruSource::new(client.clone(), &config),
        HttpImageFetcher::new(client),
        verbosity,
    );

    let options = args.fetch_options();

    let summary = match args.post {
        Some(id) => queue.run_single(id, &options).await?,
        None => queue.run(&options).await?,
    };

    if verbosity != Verbosity::Quiet {
        print_results(&summary);
    }

    Ok(())
}

fn print_results(summary: &FetchSummary) {
    println!(
        "{} {} {}",
        summary.saved.to_string().bold().blue(),
        "files".bold().blue(),
        "downloaded".bold()
    );

    if summary.existing > 0 {
        println!(
            "{} {}",
            summary.existing.to_string().bold().green(),
            "files were already present.".bold().green()
        );
    }

    if summary.duplicates > 0 {
        println!(
            "{} {}",
            summary.duplicates.to_string().bold().yellow(),
            "duplicate images were dropped.".bold().yellow()
        );
    }

    if summary.failed > 0 {
        println!(
            "{} {}",
            summary.failed.to_string().bold().red(),
            "posts failed to download.".bold().red()
        );
    }

    println!(
        "{} {}",
        "Manifest written to".bold(),
        summary.manifest_path.display().to_string().bold().blue().italic()
    );
}
