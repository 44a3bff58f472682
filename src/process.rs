use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lofty::tag::ItemKey;
use tracing::{debug, info};

use crate::lyrics::{LyricsSource, clean_lyrics};
use crate::tagging::SongTags;

/// File extensions treated as music files.
const MUSIC_EXTENSIONS: &[&str] = &["mp3", "m4a"];

/// What became of one candidate file. Unexpected faults (I/O, tag parsing,
/// transport) travel as `Err` beside these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Extension is not a recognized music extension.
    NotMusic,
    /// A sidecar lyrics file already exists.
    Skipped,
    /// The lookup had no match for the track.
    NoLyricsFound,
    /// Lyrics fetched, tagged and written to the sidecar.
    Succeeded,
}

/// Runs one file through the pipeline: extension check, sidecar check, tag
/// read, lookup, clean, tag write, sidecar write. Stops at the first
/// outcome that applies.
pub async fn process_file<S: LyricsSource>(
    source: &S,
    dir: &Path,
    filename: &str,
    lyrics_ext: &str,
) -> Result<Outcome> {
    let name = Path::new(filename);
    let is_music = name
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MUSIC_EXTENSIONS.contains(&ext));
    if !is_music {
        return Ok(Outcome::NotMusic);
    }

    let stem = name
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename);
    let lyrics_path = dir.join(format!("{stem}.{lyrics_ext}"));
    debug!("lyrics file for \"{filename}\" is \"{}\"", lyrics_path.display());

    if lyrics_path.is_file() {
        info!("lyrics file for \"{stem}\" already exists, skipping");
        return Ok(Outcome::Skipped);
    }

    let file_path = dir.join(filename);
    let mut tags = SongTags::load(&file_path)?;
    let title = tags.text_or_empty(&ItemKey::TrackTitle);
    let artist = tags.text_or_empty(&ItemKey::TrackArtist);

    info!("fetching lyrics for \"{title}\" by \"{artist}\"");
    let Some(raw) = source.search(&title, &artist).await? else {
        info!("no lyrics found for \"{title}\" by \"{artist}\"");
        return Ok(Outcome::NoLyricsFound);
    };

    let lyrics = clean_lyrics(&raw);

    info!("writing lyrics for \"{title}\" by \"{artist}\"");
    tags.set_lyrics(&lyrics)?;
    fs::write(&lyrics_path, &lyrics)
        .with_context(|| format!("Failed to write {}", lyrics_path.display()))?;

    Ok(Outcome::Succeeded)
}
