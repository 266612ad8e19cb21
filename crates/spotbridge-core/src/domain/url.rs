//! Spotify URL validation.
//!
//! Matching is anchored at the start of the input only. Anything after a
//! valid ID (query strings, trailing garbage) is tolerated.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Message attached to rejected URLs.
pub const INVALID_URL_MESSAGE: &str = "Invalid Spotify URL";

static TRACK_RE: LazyLock<Regex> = LazyLock::new(|| prefix_pattern("track"));
static PLAYLIST_RE: LazyLock<Regex> = LazyLock::new(|| prefix_pattern("playlist"));
static ALBUM_RE: LazyLock<Regex> = LazyLock::new(|| prefix_pattern("album"));

static ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"spotify\.com/(track|playlist|album)/([a-zA-Z0-9]+)")
        .unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

fn prefix_pattern(kind: &str) -> Regex {
    Regex::new(&format!(r"^https?://open\.spotify\.com/{kind}/[a-zA-Z0-9]+"))
        .unwrap_or_else(|e| unreachable!("static pattern: {e}"))
}

/// Category of a Spotify link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlKind {
    Track,
    Playlist,
    Album,
}

impl UrlKind {
    /// All categories in match order.
    pub const ALL: [Self; 3] = [Self::Track, Self::Playlist, Self::Album];

    /// Path segment used by Spotify for this category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Playlist => "playlist",
            Self::Album => "album",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Track => &*TRACK_RE,
            Self::Playlist => &*PLAYLIST_RE,
            Self::Album => &*ALBUM_RE,
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == segment)
    }
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating a URL.
///
/// Serializes to `{"valid": .., "type": .., "url": .., "message"?: ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(rename = "type")]
    pub kind: Option<UrlKind>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Validate a Spotify track, playlist or album URL.
pub fn validate_url(url: &str) -> ValidationResult {
    let kind = UrlKind::ALL
        .into_iter()
        .find(|kind| kind.pattern().is_match(url));

    match kind {
        Some(kind) => ValidationResult {
            valid: true,
            kind: Some(kind),
            url: url.to_string(),
            message: None,
        },
        None => ValidationResult {
            valid: false,
            kind: None,
            url: url.to_string(),
            message: Some(INVALID_URL_MESSAGE.to_string()),
        },
    }
}

/// Find the category and ID of a Spotify link anywhere in `url`.
pub fn extract_spotify_id(url: &str) -> Option<(UrlKind, String)> {
    let caps = ID_RE.captures(url)?;
    let kind = UrlKind::from_segment(caps.get(1)?.as_str())?;
    Some((kind, caps.get(2)?.as_str().to_string()))
}
