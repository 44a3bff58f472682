mod genius;
mod lyrics;
mod process;
mod tagging;
#[cfg(test)]
mod testutil;
mod walk;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;
use genius::GeniusClient;
use process::{Outcome, process_file};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walk::walk_tree;

/// Environment variable consulted when --genius-access-token is absent.
const TOKEN_ENV_VAR: &str = "GENIUS_CLIENT_ACCESS_TOKEN";

static EXAMPLES: &str = r"EXAMPLES:
    Fetch lyrics for a whole library:
    sanat ~/Music

    Fetch lyrics for a single file:
    sanat ~/Music/song.mp3

    Use .txt sidecar files and chattier logs:
    sanat --lyrics-ext txt --log-level debug ~/Music";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = EXAMPLES
)]
struct Args {
    /// Music file or directory to process
    path: PathBuf,

    /// Extension given to the sidecar lyrics files
    #[arg(long, default_value = "lyrics")]
    lyrics_ext: String,

    /// Genius API access token, falls back to GENIUS_CLIENT_ACCESS_TOKEN
    #[arg(long)]
    genius_access_token: Option<String>,

    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Values already present in the environment win over .env entries.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if !args.path.exists() {
        bail!("Path does not exist: {}", args.path.display());
    }

    let Some(token) = resolve_token(
        args.genius_access_token,
        std::env::var(TOKEN_ENV_VAR).ok(),
    ) else {
        bail!("No Genius access token, pass --genius-access-token or set {TOKEN_ENV_VAR}");
    };

    let lyrics_ext = normalize_ext(&args.lyrics_ext);
    let genius = GeniusClient::new(token).context("Failed to init Genius client")?;

    if args.path.is_dir() {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, finishing the current file");
                flag.store(true, Ordering::Relaxed);
            }
        });

        let stats = walk_tree(&genius, &args.path, &lyrics_ext, &stop).await;

        println!("\nDone:");
        println!("  Succeeded: {}", style(stats.succeeded).green());
        println!("  Skipped: {}", style(stats.skipped).yellow());
        println!("  Failed: {}", style(stats.failed).red());
        return Ok(());
    }

    let dir = args.path.parent().unwrap_or(Path::new(""));
    let Some(filename) = args.path.file_name().and_then(|name| name.to_str()) else {
        bail!("Not a usable file name: {}", args.path.display());
    };

    let outcome = process_file(&genius, dir, filename, &lyrics_ext).await?;
    single_file_result(outcome, &args.path)
}

/// Maps a named target's outcome to the process result. A file passed
/// directly is expected to be music with findable lyrics, so those two
/// misses are hard failures.
fn single_file_result(outcome: Outcome, path: &Path) -> Result<()> {
    match outcome {
        Outcome::Succeeded => {
            info!("done");
            Ok(())
        }
        Outcome::Skipped => {
            info!("nothing to do");
            Ok(())
        }
        Outcome::NotMusic => bail!("Not a recognized music file: {}", path.display()),
        Outcome::NoLyricsFound => bail!("No lyrics found for: {}", path.display()),
    }
}

/// A token passed on the command line wins over the environment; an empty
/// value in either place counts as missing.
fn resolve_token(flag: Option<String>, env: Option<String>) -> Option<String> {
    flag.or(env).filter(|token| !token.is_empty())
}

/// Accepts both "lyrics" and ".lyrics".
fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockSource, write_tagged_mp3};
    use tempfile::tempdir;

    #[test]
    fn named_target_misses_are_hard_failures() {
        let path = Path::new("missing.mp3");
        assert!(single_file_result(Outcome::NotMusic, path).is_err());
        assert!(single_file_result(Outcome::NoLyricsFound, path).is_err());
    }

    #[test]
    fn named_target_success_and_skip_exit_cleanly() {
        let path = Path::new("song.mp3");
        assert!(single_file_result(Outcome::Succeeded, path).is_ok());
        assert!(single_file_result(Outcome::Skipped, path).is_ok());
    }

    #[tokio::test]
    async fn lookup_miss_on_a_named_target_fails_the_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.mp3");
        write_tagged_mp3(&path, "Missing", "Band");
        let source = MockSource::new();

        let outcome = process_file(&source, dir.path(), "missing.mp3", "lyrics")
            .await
            .unwrap();

        assert!(single_file_result(outcome, &path).is_err());
    }

    #[test]
    fn token_flag_wins_over_environment() {
        assert_eq!(
            resolve_token(Some("flag".into()), Some("env".into())).as_deref(),
            Some("flag")
        );
    }

    #[test]
    fn token_falls_back_to_environment() {
        assert_eq!(
            resolve_token(None, Some("env".into())).as_deref(),
            Some("env")
        );
    }

    #[test]
    fn empty_token_counts_as_missing() {
        assert_eq!(resolve_token(None, None), None);
        assert_eq!(resolve_token(None, Some(String::new())), None);
        // an explicit empty flag is not patched up from the environment
        assert_eq!(resolve_token(Some(String::new()), Some("env".into())), None);
    }

    #[test]
    fn sidecar_extension_accepts_a_leading_dot() {
        assert_eq!(normalize_ext("lyrics"), "lyrics");
        assert_eq!(normalize_ext(".lyrics"), "lyrics");
        assert_eq!(normalize_ext(" txt "), "txt");
    }
}
