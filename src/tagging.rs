use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lofty::config::WriteOptions;
use lofty::file::TaggedFile;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

/// A music file's embedded tags, read once and saved back in place.
pub struct SongTags {
    path: PathBuf,
    file: TaggedFile,
}

impl SongTags {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let mut probe = Probe::new(file);

        // Hint the file type based on extension if possible
        if let Some(file_type) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(lofty::file::FileType::from_ext)
        {
            probe = probe.set_file_type(file_type);
        }

        let file = probe
            .read()
            .with_context(|| format!("Failed to read tags from {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Text of a tag item, or the empty string when the item (or the whole
    /// tag) is missing.
    pub fn text_or_empty(&self, key: &ItemKey) -> String {
        self.file
            .primary_tag()
            .or_else(|| self.file.first_tag())
            .and_then(|tag| tag.get_string(key))
            .unwrap_or_default()
            .to_string()
    }

    /// Sets the lyrics item and persists all tags back to the file.
    pub fn set_lyrics(&mut self, lyrics: &str) -> Result<()> {
        if self.file.primary_tag().is_none() {
            self.file.insert_tag(Tag::new(self.file.primary_tag_type()));
        }

        let tag = self
            .file
            .primary_tag_mut()
            .context("No primary tag found")?;
        tag.insert_text(ItemKey::Lyrics, lyrics.to_string());

        self.file
            .save_to_path(&self.path, WriteOptions::default())
            .with_context(|| format!("Failed to write tags to {}", self.path.display()))
    }
}
