use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing artifact Genius leaves on scraped lyrics, e.g.
/// "42EmbedShare URLCopyEmbedCopy". The leading digit run is optional.
static EMBED_ARTIFACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\d+)?EmbedShare URLCopyEmbedCopy").expect("embed regex"));

/// A lyrics backend, queried by track title and artist.
///
/// Returns `Ok(None)` when the backend has no match for the track; `Err` is
/// reserved for transport and protocol failures.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    async fn search(&self, title: &str, artist: &str) -> Result<Option<String>>;
}

/// Strips the embed artifact from the end of fetched lyrics.
///
/// Only the first match is considered, and its length is cut from the tail
/// of the text whether or not the match itself sits there. A mid-text
/// occurrence therefore truncates unrelated trailing characters; the tests
/// below pin that behavior.
pub fn clean_lyrics(lyrics: &str) -> String {
    let Some(artifact) = EMBED_ARTIFACT.find(lyrics) else {
        return lyrics.to_string();
    };

    // Count characters, not bytes, so the cut never splits a multi-byte
    // character when the removed tail is not the artifact itself.
    let keep = lyrics.chars().count() - artifact.as_str().chars().count();
    lyrics.chars().take(keep).collect()
}
