pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod source;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

pub use error::PipelineError;
pub use pipeline::{DefaultPipeline, Pipeline, Summary, SummaryReport, SummaryService};

/// Application state that will be shared across handlers
pub struct AppState<S> {
    pub service: Arc<S>,
    pub request_timeout: Duration,
}

impl<S> AppState<S> {
    pub fn new(service: S, request_timeout: Duration) -> Self {
        Self {
            service: Arc::new(service),
            request_timeout,
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            request_timeout: self.request_timeout,
        }
    }
}
