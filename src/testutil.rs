//! Shared test fixtures: synthetic MP3 files small enough to assemble by
//! hand, and a scripted lyrics source that records its lookups.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::{ItemKey, Tag, TagType};

use crate::lyrics::LyricsSource;

/// Writes a bare MPEG stream: four CBR MPEG-1 Layer III frames
/// (128 kbps, 44.1 kHz, 417 bytes each), no tags.
pub fn write_mp3(path: &Path) {
    let mut data = Vec::new();
    for _ in 0..4 {
        data.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        data.extend_from_slice(&[0u8; 413]);
    }
    fs::write(path, data).unwrap();
}

/// Writes a minimal MP3 carrying a title and artist tag.
pub fn write_tagged_mp3(path: &Path, title: &str, artist: &str) {
    write_mp3(path);

    let mut tag = Tag::new(TagType::Id3v2);
    tag.insert_text(ItemKey::TrackTitle, title.to_string());
    tag.insert_text(ItemKey::TrackArtist, artist.to_string());
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}

/// Lyrics source serving canned answers keyed by (title, artist).
pub struct MockSource {
    lyrics: HashMap<(String, String), String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            lyrics: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, title: &str, artist: &str, lyrics: &str) -> Self {
        self.lyrics
            .insert((title.to_string(), artist.to_string()), lyrics.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LyricsSource for MockSource {
    async fn search(&self, title: &str, artist: &str) -> Result<Option<String>> {
        let key = (title.to_string(), artist.to_string());
        self.calls.lock().unwrap().push(key.clone());
        Ok(self.lyrics.get(&key).cloned())
    }
}
