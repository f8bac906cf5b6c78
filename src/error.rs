use std::time::Duration;

use axum::http::StatusCode;
use serde::Serialize;

use crate::source::SourceKind;

/// The pipeline step an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    VideoExtraction,
    PageExtraction,
    Summarization,
}

/// Everything a caller of [`crate::pipeline::Pipeline::run`] can get back instead of a summary.
///
/// Every variant is terminal for the invocation and recoverable for the caller,
/// who may retry with a different locator.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Failed to extract {source_kind} content: {reason}")]
    ExtractionFailed {
        source_kind: SourceKind,
        reason: String,
    },

    #[error("Summarization failed: {reason}")]
    BackendFailed { reason: String },
}

impl PipelineError {
    pub fn extraction(source_kind: SourceKind, err: ExtractError) -> Self {
        PipelineError::ExtractionFailed {
            source_kind,
            reason: err.to_string(),
        }
    }

    pub fn backend(err: BackendError) -> Self {
        PipelineError::BackendFailed {
            reason: err.to_string(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::InvalidInput { .. } => Stage::Validation,
            PipelineError::ExtractionFailed {
                source_kind: SourceKind::Video,
                ..
            } => Stage::VideoExtraction,
            PipelineError::ExtractionFailed {
                source_kind: SourceKind::Page,
                ..
            } => Stage::PageExtraction,
            PipelineError::BackendFailed { .. } => Stage::Summarization,
        }
    }

    /// Stable label used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput { .. } => "invalid_input",
            PipelineError::ExtractionFailed { .. } => "extraction_failed",
            PipelineError::BackendFailed { .. } => "backend_failed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            PipelineError::ExtractionFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::BackendFailed { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Failures at the extractor boundary, for both video metadata and page fetches.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("no textual content could be extracted")]
    EmptyContent,

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("metadata lookup failed: {0}")]
    Metadata(String),
}

/// Failures at the summarization backend boundary.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Process-level failures: configuration, client construction, logging setup.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tracing setup error: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
}

pub type Result<T> = std::result::Result<T, AppError>;
