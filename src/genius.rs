//! Genius lookup: song search through the public API, lyrics scraped from
//! the song page since the API itself does not serve lyrics text.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header;
use select::document::Document;
use select::predicate::Attr;
use serde::Deserialize;
use tracing::debug;

use crate::lyrics::LyricsSource;

const USER_AGENT: &str = "sanat/0.1.0";
const SEARCH_URL: &str = "https://api.genius.com/search";

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("html tag regex"));

pub struct GeniusClient {
    client: reqwest::Client,
    token: String,
}

impl GeniusClient {
    pub fn new(token: String) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, token })
    }

    /// Returns the first search hit that is a song, if any.
    async fn search_song(&self, title: &str, artist: &str) -> Result<Option<GeniusSong>> {
        let query = format!("{title} {artist}");
        let response = self
            .client
            .get(SEARCH_URL)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .query(&[("q", query.as_str())])
            .send()
            .await
            .context("Failed to send Genius search request")?;

        if !response.status().is_success() {
            bail!("Genius search failed: HTTP {}", response.status());
        }

        let search: GeniusSearchResponse = response
            .json()
            .await
            .context("Failed to decode Genius search response")?;

        Ok(search
            .response
            .hits
            .into_iter()
            .find(|hit| hit.kind == "song")
            .map(|hit| hit.result))
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .with_context(|| format!("Failed to fetch Genius page {url}"))?;

        if !response.status().is_success() {
            bail!("Genius page fetch failed: HTTP {}", response.status());
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl LyricsSource for GeniusClient {
    async fn search(&self, title: &str, artist: &str) -> Result<Option<String>> {
        let Some(song) = self.search_song(title, artist).await? else {
            return Ok(None);
        };

        debug!("Genius hit \"{}\" at {}", song.full_title, song.url);

        let html = self.fetch_page(&song.url).await?;
        Ok(extract_lyrics(&html))
    }
}

/// Pulls the text out of the `data-lyrics-container` nodes of a song page.
/// Genius renders line breaks as `<br>`, so those are restored before the
/// remaining markup is stripped.
fn extract_lyrics(html: &str) -> Option<String> {
    let document = Document::from(html);
    let mut text = String::new();

    for node in document.find(Attr("data-lyrics-container", "true")) {
        let inner = node
            .inner_html()
            .replace("<br>", "\n")
            .replace("<br/>", "\n")
            .replace("<br />", "\n");
        let stripped = HTML_TAG.replace_all(&inner, "");
        text.push_str(&decode_entities(&stripped));
        text.push('\n');
    }

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[derive(Debug, Deserialize)]
struct GeniusSearchResponse {
    response: GeniusHits,
}

#[derive(Debug, Deserialize)]
struct GeniusHits {
    #[serde(default)]
    hits: Vec<GeniusHit>,
}

#[derive(Debug, Deserialize)]
struct GeniusHit {
    #[serde(rename = "type")]
    kind: String,
    result: GeniusSong,
}

#[derive(Debug, Deserialize)]
struct GeniusSong {
    url: String,
    #[serde(default)]
    full_title: String,
}
