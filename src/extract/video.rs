use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;

use crate::{
    config::FetchConfig, document::Document, error::ExtractError, extract::Extractor,
    source::Locator,
};

pub const TITLE_PLACEHOLDER: &str = "Video";
pub const DESCRIPTION_PLACEHOLDER: &str = "No description available.";

/// The subset of video metadata the summarizer cares about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub uploader: Option<String>,
    /// Length in seconds.
    pub duration: Option<f64>,
}

/// Where video metadata comes from. Implementations must never fetch media streams.
pub trait VideoMetadataSource {
    fn fetch_metadata(
        &self,
        locator: &Locator,
    ) -> impl Future<Output = Result<VideoMetadata, ExtractError>> + Send;
}

/// Metadata lookup through the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    timeout: Duration,
}

impl YtDlp {
    const ARGS: [&'static str; 5] = [
        "--dump-single-json",
        "--skip-download",
        "--no-playlist",
        "--no-warnings",
        "--quiet",
    ];

    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(&config.ytdlp_path, config.ytdlp_timeout)
    }
}

impl VideoMetadataSource for YtDlp {
    #[tracing::instrument(skip_all, fields(url = %locator))]
    async fn fetch_metadata(&self, locator: &Locator) -> Result<VideoMetadata, ExtractError> {
        let mut command = Command::new(&self.program);
        command
            .args(Self::ARGS)
            .arg(locator.as_str())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ExtractError::Timeout(self.timeout))?
            .map_err(|source| ExtractError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Metadata(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        tracing::debug!(bytes = output.stdout.len(), "Received video metadata");
        parse_metadata(&output.stdout)
    }
}

/// Parses the JSON document `yt-dlp --dump-single-json` prints.
pub fn parse_metadata(raw: &[u8]) -> Result<VideoMetadata, ExtractError> {
    serde_json::from_slice(raw)
        .map_err(|e| ExtractError::Metadata(format!("unreadable yt-dlp output: {e}")))
}

/// Title, blank line, description. Missing or blank fields get placeholders.
pub fn render_video_text(metadata: &VideoMetadata) -> String {
    let title = non_blank(&metadata.title).unwrap_or(TITLE_PLACEHOLDER);
    let description = non_blank(&metadata.description).unwrap_or(DESCRIPTION_PLACEHOLDER);
    format!("{title}\n\n{description}")
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Extractor for video-hosting links: metadata only, rendered as text.
pub struct VideoExtractor<M> {
    source: M,
}

impl<M: VideoMetadataSource> VideoExtractor<M> {
    pub fn new(source: M) -> Self {
        Self { source }
    }
}

impl VideoExtractor<YtDlp> {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(YtDlp::from_config(config))
    }
}

impl<M: VideoMetadataSource + Send + Sync> Extractor for VideoExtractor<M> {
    async fn extract(&self, locator: &Locator) -> Result<Document, ExtractError> {
        let metadata = self.source.fetch_metadata(locator).await?;

        let mut document =
            Document::new(render_video_text(&metadata)).with_metadata("source", locator.as_str());
        if let Some(title) = non_blank(&metadata.title) {
            document = document.with_metadata("title", title);
        }
        if let Some(uploader) = non_blank(&metadata.uploader) {
            document = document.with_metadata("uploader", uploader);
        }
        if let Some(duration) = metadata.duration {
            document = document.with_metadata("duration_seconds", format!("{}", duration.round()));
        }
        Ok(document)
    }
}
