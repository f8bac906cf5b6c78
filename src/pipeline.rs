//! # Pipeline
//!
//! Sequences one summarization: validate the locator, pick an extractor,
//! normalize the extracted document, assemble the prompt and call the backend.
//! Each step either hands its value to the next or ends the run with a
//! [`PipelineError`] tagged with the step that failed.

use std::future::Future;

use crate::{
    config::Config,
    document::normalize,
    error::{AppError, PipelineError},
    extract::{Extractor, HttpFetcher, PageExtractor, VideoExtractor, YtDlp},
    llm::{ChatCompletionsClient, Summarizer},
    prompt::{assemble, PromptOptions},
    source::{classify, Locator, SourceKind},
};

pub type Summary = String;

/// A summary together with what the pipeline learned on the way there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    pub url: String,
    pub source: SourceKind,
    pub title: Option<String>,
    pub word_count: usize,
    pub summary: Summary,
}

pub struct Pipeline<V, P, B> {
    video: V,
    page: P,
    backend: B,
    prompt_options: PromptOptions,
}

/// The production wiring: `yt-dlp` for videos, HTTP for pages, chat completions for summaries.
pub type DefaultPipeline =
    Pipeline<VideoExtractor<YtDlp>, PageExtractor<HttpFetcher>, ChatCompletionsClient>;

impl<V, P, B> Pipeline<V, P, B>
where
    V: Extractor + Send + Sync,
    P: Extractor + Send + Sync,
    B: Summarizer + Send + Sync,
{
    pub fn new(video: V, page: P, backend: B) -> Self {
        Self {
            video,
            page,
            backend,
            prompt_options: PromptOptions::default(),
        }
    }

    pub fn with_prompt_options(mut self, prompt_options: PromptOptions) -> Self {
        self.prompt_options = prompt_options;
        self
    }

    /// Summarizes the content behind `input`. All or nothing: no partial results.
    pub async fn run(&self, input: &str) -> Result<Summary, PipelineError> {
        self.run_detailed(input).await.map(|report| report.summary)
    }

    #[tracing::instrument(skip(self))]
    pub async fn run_detailed(&self, input: &str) -> Result<SummaryReport, PipelineError> {
        let locator = Locator::parse(input)?;

        let source = classify(&locator);
        tracing::debug!(%source, url = %locator, "Classified locator");

        let document = match source {
            SourceKind::Video => self.video.extract(&locator).await,
            SourceKind::Page => self.page.extract(&locator).await,
        }
        .map_err(|e| PipelineError::extraction(source, e))?;

        let title = document.title().map(str::to_owned);
        let word_count = document.word_count();
        tracing::debug!(word_count, ?title, "Extracted document");

        let docs = normalize(document);
        let prompt = assemble(&docs, &self.prompt_options);

        let summary = self
            .backend
            .summarize(&prompt)
            .await
            .map_err(PipelineError::backend)?;
        tracing::info!(%source, summary_chars = summary.len(), "Summarized content");

        Ok(SummaryReport {
            url: locator.to_string(),
            source,
            title,
            word_count,
            summary,
        })
    }
}

impl DefaultPipeline {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let video = VideoExtractor::from_config(&config.fetch);
        let page = PageExtractor::from_config(&config.fetch)?;
        let backend = ChatCompletionsClient::new(config.llm.clone())?;
        tracing::info!(model = backend.model(), "Summarization backend configured");

        Ok(Pipeline::new(video, page, backend).with_prompt_options(PromptOptions {
            max_content_chars: config.max_content_chars,
        }))
    }
}

/// What the HTTP layer needs from a pipeline.
pub trait SummaryService: Send + Sync + 'static {
    fn summarize_url(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<SummaryReport, PipelineError>> + Send;
}

impl<V, P, B> SummaryService for Pipeline<V, P, B>
where
    V: Extractor + Send + Sync + 'static,
    P: Extractor + Send + Sync + 'static,
    B: Summarizer + Send + Sync + 'static,
{
    fn summarize_url(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<SummaryReport, PipelineError>> + Send {
        self.run_detailed(input)
    }
}
