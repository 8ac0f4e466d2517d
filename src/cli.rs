//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use gitgrab_core::DEFAULT_API_BASE;

/// Download a GitHub repository subtree and repack it as a zip archive.
///
/// Gitgrab mirrors the subtree behind a `github.com/<owner>/<repo>/tree/...`
/// URL, writes it into a single zip archive, then expands that archive
/// next to it.
#[derive(Parser, Debug)]
#[command(name = "gitgrab")]
#[command(author, version, about)]
pub struct Args {
    /// GitHub subtree URL (https://github.com/<owner>/<repo>/tree/<branch>[/<path>])
    pub url: String,

    /// Name of the output archive (".zip" is appended when missing)
    #[arg(short, long, default_value = "github_download")]
    pub output: String,

    /// Directory receiving the archive and the extracted tree
    #[arg(short, long, default_value = ".")]
    pub dest: PathBuf,

    /// Base URL of the GitHub API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Appends `.zip` to an archive name unless it already ends with it
/// (case-insensitively).
pub fn ensure_zip_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".zip") {
        name.to_string()
    } else {
        format!("{name}.zip")
    }
}

/// Derives the extraction directory name from an archive name by
/// dropping the `.zip` suffix.
pub fn extraction_dir_name(archive_name: &str) -> String {
    archive_name
        .strip_suffix(".zip")
        .unwrap_or(archive_name)
        .to_string()
}
