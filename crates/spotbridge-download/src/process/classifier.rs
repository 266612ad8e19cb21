//! Classification of `spotdl` console output.
//!
//! `spotdl` has no machine-readable progress protocol, so each output line
//! is matched against the phrases it is known to print. All knowledge of
//! that wording lives here, behind `OutputClassifier`, so a change in the
//! tool's output only touches this module.
//!
//! # Phases
//!
//! | Phase       | Example line                              | Event                      |
//! |-------------|-------------------------------------------|----------------------------|
//! | discovery   | `Found 12 songs in My Playlist (12)`      | downloading / info         |
//! | downloading | `Downloading: 42%`                        | downloading / info         |
//! | converting  | `Converting to mp3`                       | converting / info          |
//! | skip        | `Skipping Song (file already exists)`     | downloading / warning      |
//! | error       | `AudioProviderError: YT-DLP download error` | error / error            |
//!
//! Discovery and skip lines produce their own event and stop there. The
//! error check runs last and overrides whatever status the line had.

use std::sync::LazyLock;

use regex::Regex;

use spotbridge_core::{DownloadStatus, Progress, ProgressEvent, Severity};

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d{1,3}(?:\.\d+)?)\s*%"));
static FOUND_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bfound\s+(\d+)\s+songs?\b"));
static DISCOVERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(processing query|fetching (?:metadata|playlist|album|song)s?|searching)\b")
});
static DOWNLOADING_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bdownload(?:ing|ed)?\b"));
static CONVERTING_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(convert(?:ing|ed)?|processing|embedding|post-?processing|ffmpeg)\b")
});
static SKIP_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(skipping|already exists|duplicate)\b"));
static ERROR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(error|\bfailed\b|\bfailure\b|exception|traceback)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| unreachable!("static pattern {pattern}: {e}"))
}

/// Turns one line of tool output into a progress event.
pub trait OutputClassifier: Send + Sync {
    /// Classify `line`. Returns `None` for lines that should not be forwarded.
    fn classify(&self, line: &str) -> Option<ProgressEvent>;
}

/// Classifier for `spotdl download` console output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpotdlClassifier;

impl SpotdlClassifier {
    /// Create a new classifier.
    pub const fn new() -> Self {
        Self
    }
}

/// First percentage in a line, or unknown.
pub fn parse_percent(line: &str) -> Progress {
    PERCENT_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map_or(Progress::Unknown, Progress::percent)
}

impl OutputClassifier for SpotdlClassifier {
    fn classify(&self, line: &str) -> Option<ProgressEvent> {
        let text = line.trim();
        if text.is_empty() {
            return None;
        }

        let progress = parse_percent(text);

        if let Some(caps) = FOUND_RE.captures(text) {
            let count = caps.get(1).map_or("0", |m| m.as_str());
            let message = format!("Found {count} song(s)");
            return Some(
                ProgressEvent::new(DownloadStatus::Downloading, progress, message, Severity::Info)
                    .with_detail(line),
            );
        }
        if DISCOVERY_RE.is_match(text) && !ERROR_RE.is_match(text) {
            return Some(
                ProgressEvent::new(DownloadStatus::Downloading, progress, text, Severity::Info)
                    .with_detail(line),
            );
        }

        let mut status = DownloadStatus::Downloading;
        let mut severity = Severity::Info;

        if DOWNLOADING_RE.is_match(text) {
            status = DownloadStatus::Downloading;
        }
        if CONVERTING_RE.is_match(text) {
            status = DownloadStatus::Converting;
        }

        if SKIP_RE.is_match(text) {
            return Some(
                ProgressEvent::new(DownloadStatus::Downloading, progress, text, Severity::Warning)
                    .with_detail(line),
            );
        }

        if ERROR_RE.is_match(text) {
            status = DownloadStatus::Error;
            severity = Severity::Error;
        }

        Some(ProgressEvent::new(status, progress, text, severity).with_detail(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> ProgressEvent {
        SpotdlClassifier::new()
            .classify(line)
            .expect("line should produce an event")
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        assert!(SpotdlClassifier::new().classify("").is_none());
        assert!(SpotdlClassifier::new().classify("   \r").is_none());
    }

    #[test]
    fn test_percentage_is_parsed() {
        let event = classify("Downloading: 42%");
        assert_eq!(event.progress, Progress::Percent(42));
        assert_eq!(event.status, DownloadStatus::Downloading);
        assert_eq!(event.severity, Severity::Info);
        assert_eq!(event.detail.as_deref(), Some("Downloading: 42%"));
    }

    #[test]
    fn test_fractional_and_oversized_percentages() {
        assert_eq!(parse_percent("[download]  57.3% of 3.2MiB"), Progress::Percent(57));
        assert_eq!(parse_percent("weird 180%"), Progress::COMPLETE);
        assert_eq!(parse_percent("no number here"), Progress::Unknown);
    }

    #[test]
    fn test_line_without_percentage_is_unknown() {
        let event = classify("Downloaded \"Song\": https://music.youtube.com/watch?v=x");
        assert_eq!(event.progress, Progress::Unknown);
        assert_eq!(event.status, DownloadStatus::Downloading);
    }

    #[test]
    fn test_found_songs_short_circuits() {
        let event = classify("Found 12 songs in Road Trip (12)");
        assert_eq!(event.status, DownloadStatus::Downloading);
        assert_eq!(event.message, "Found 12 song(s)");
        assert_eq!(event.severity, Severity::Info);
    }

    #[test]
    fn test_discovery_lines() {
        let event = classify("Processing query: https://open.spotify.com/track/abc");
        assert_eq!(event.status, DownloadStatus::Downloading);
        assert_eq!(event.severity, Severity::Info);
    }

    #[test]
    fn test_converting_overrides_downloading() {
        let event = classify("Converting downloaded file to mp3 80%");
        assert_eq!(event.status, DownloadStatus::Converting);
        assert_eq!(event.progress, Progress::Percent(80));
    }

    #[test]
    fn test_skip_is_always_warning_downloading() {
        for line in [
            "Skipping Artist - Song (file already exists) 100%",
            "Skipping Artist - Song (duplicate)",
            "Converting: file already exists, 55%",
            "Skipping download: error cache",
        ] {
            let event = classify(line);
            assert_eq!(event.status, DownloadStatus::Downloading, "{line}");
            assert_eq!(event.severity, Severity::Warning, "{line}");
        }
    }

    #[test]
    fn test_error_overrides_downloading() {
        let event = classify("AudioProviderError: YT-DLP download error - 30%");
        assert_eq!(event.status, DownloadStatus::Error);
        assert_eq!(event.severity, Severity::Error);
        assert_eq!(event.progress, Progress::Percent(30));

        let event = classify("Traceback (most recent call last):");
        assert_eq!(event.status, DownloadStatus::Error);
    }

    #[test]
    fn test_plain_line_is_forwarded() {
        let event = classify("  some other log line  ");
        assert_eq!(event.status, DownloadStatus::Downloading);
        assert_eq!(event.message, "some other log line");
        assert_eq!(event.progress, Progress::Unknown);
    }
}
