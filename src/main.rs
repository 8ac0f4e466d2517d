//! CLI entry point for gitgrab.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use gitgrab_core::{Pipeline, RunReport, TOKEN_FILE_NAME, TokenStore};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

/// Shown whenever the user needs to mint a token.
const TOKEN_HELP_URL: &str =
    "https://github.com/settings/tokens/new?description=Download%20GitHub%20directory&scopes=repo";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let store = TokenStore::new(TOKEN_FILE_NAME);
    let mut token = match store.load()? {
        Some(token) => token,
        None => {
            eprintln!("To avoid rate limits, generate a GitHub token here:\n  {TOKEN_HELP_URL}");
            let token = prompt_token()?;
            store.save(&token)?;
            token
        }
    };

    let archive_name = cli::ensure_zip_extension(&args.output);
    let archive_path = args.dest.join(&archive_name);
    let extract_dir = args.dest.join(cli::extraction_dir_name(&archive_name));
    std::fs::create_dir_all(&args.dest)
        .with_context(|| format!("cannot create destination {}", args.dest.display()))?;

    let counter = Arc::new(AtomicU64::new(0));

    loop {
        let pipeline = Pipeline::with_api_base(&token, &args.api_base);

        let spinner = start_spinner(&args, &counter);
        let result = pipeline
            .run(&args.url, &archive_path, &extract_dir, &counter)
            .await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result {
            Ok(report) => {
                report_success(&report);
                return Ok(());
            }
            Err(error) if error.is_rate_limited() => {
                warn!("GitHub rate limit exhausted; a fresh token is required");
                eprintln!("Rate limit exceeded. Generate a new token here:\n  {TOKEN_HELP_URL}");
                token = prompt_token()?;
                store.save(&token)?;
                info!("token replaced, restarting download from the top");
            }
            Err(error) => return Err(error.into()),
        }
    }
}

fn report_success(report: &RunReport) {
    info!(
        downloaded = report.files_fetched,
        packed = report.files_packed,
        archive = %report.archive_path.display(),
        extracted = %report.extract_dir.display(),
        "done"
    );
    println!(
        "Downloaded {} files, packed {} into {} and extracted to {}",
        report.files_fetched,
        report.files_packed,
        report.archive_path.display(),
        report.extract_dir.display()
    );
}

/// Spawns a spinner fed from the shared file counter. Disabled in quiet
/// mode and when stderr is not a terminal (indicatif hides itself there).
fn start_spinner(args: &Args, counter: &Arc<AtomicU64>) -> Option<ProgressBar> {
    if args.quiet {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(120));

    let counter = Arc::clone(counter);
    let ticker = bar.clone();
    tokio::spawn(async move {
        while !ticker.is_finished() {
            let n = counter.load(Ordering::SeqCst);
            ticker.set_message(format!("downloading... {n} files"));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    });

    Some(bar)
}

/// Reads a token from stdin, rejecting empty input.
fn prompt_token() -> Result<String> {
    eprint!("Enter your GitHub token: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let token = line.trim().to_string();
    if token.is_empty() {
        bail!("no token provided");
    }
    Ok(token)
}
