use std::fmt;

use serde::Serialize;
use url::Url;

use crate::error::PipelineError;

/// Hosts served by the video extractor. Subdomains of `youtube.com` match too.
const VIDEO_HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];

/// A validated `http(s)` URL. The only way to get one is [`Locator::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator(Url);

impl Locator {
    pub fn parse(input: &str) -> Result<Self, PipelineError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "Please provide a URL to proceed.".to_string(),
            });
        }

        let invalid = || PipelineError::InvalidInput {
            reason: "Please enter a valid URL (YouTube or website).".to_string(),
        };

        let url = Url::parse(input).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Locator(url)),
            _ => Err(invalid()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Video,
    Page,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Video => f.write_str("video"),
            SourceKind::Page => f.write_str("page"),
        }
    }
}

/// Picks the extractor for a locator. Pure, and never revisited after extraction fails.
pub fn classify(locator: &Locator) -> SourceKind {
    let host = locator.host().to_ascii_lowercase();
    let is_video = VIDEO_HOSTS
        .iter()
        .any(|video_host| host == *video_host || host.ends_with(&format!(".{video_host}")));

    if is_video {
        SourceKind::Video
    } else {
        SourceKind::Page
    }
}
