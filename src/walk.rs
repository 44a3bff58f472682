use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::lyrics::LyricsSource;
use crate::process::{Outcome, process_file};

/// Counters for one directory run.
#[derive(Debug, Default, PartialEq)]
pub struct RunStats {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Walks `root` recursively and feeds every file to the pipeline. One
/// file's failure never aborts the walk; non-music files are not counted.
/// The `stop` flag is checked between files only, so the file in flight
/// always finishes.
pub async fn walk_tree<S: LyricsSource>(
    source: &S,
    root: &Path,
    lyrics_ext: &str,
    stop: &AtomicBool,
) -> RunStats {
    let mut stats = RunStats::default();
    info!("start walking \"{}\"", root.display());

    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if stop.load(Ordering::Relaxed) {
            warn!("interrupted, stopping the walk");
            break;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let dir = path.parent().unwrap_or(root);

        match process_file(source, dir, filename, lyrics_ext).await {
            Ok(Outcome::Succeeded) => stats.succeeded += 1,
            Ok(Outcome::Skipped) => stats.skipped += 1,
            Ok(Outcome::NoLyricsFound) => stats.failed += 1,
            Ok(Outcome::NotMusic) => {}
            Err(e) => {
                error!("failed to process \"{}\": {e:#}", path.display());
                stats.failed += 1;
            }
        }
    }

    stats
}
