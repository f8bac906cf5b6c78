mod mocks;

use std::{sync::Arc, time::Duration};

use mocks::{
    extractor::MockExtractor,
    metadata::MockMetadataSource,
    summarizer::MockSummarizer,
};
use url_summarizer::{
    document::Document,
    error::{BackendError, ExtractError, Stage},
    extract::{Extractor, VideoExtractor},
    prompt::{assemble, PromptOptions},
    source::{Locator, SourceKind},
    Pipeline, PipelineError,
};

const INSTRUCTION: &str = "Provide a detailed summary of the following content in 300 words:";

// ─── Happy path ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_page_summary_is_deterministic() {
    let page = MockExtractor::returning("Hello world.");
    let backend = MockSummarizer::echo_length();
    let page_calls = page.calls.clone();
    let prompts = backend.calls.clone();

    let pipeline = Pipeline::new(MockExtractor::returning("unused"), page, backend);

    let first = pipeline.run("https://example.com/article").await.unwrap();
    let second = pipeline.run("https://example.com/article").await.unwrap();

    let expected_prompt = assemble(&[Document::new("Hello world.")], &PromptOptions::default());
    assert_eq!(
        first,
        format!("Summary of {} characters", expected_prompt.as_str().len())
    );
    assert_eq!(first, second, "Same input should give the same summary");

    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains(INSTRUCTION));
    assert!(prompts[0].contains("Hello world."));
    assert_eq!(prompts[0], prompts[1]);

    assert_eq!(
        *page_calls.lock().unwrap(),
        vec!["https://example.com/article", "https://example.com/article"]
    );
}

#[tokio::test]
async fn test_summary_is_returned_unchanged() {
    let summary = "  ## Summary\nKey points, with trailing whitespace.  \n";
    let pipeline = Pipeline::new(
        MockExtractor::returning("unused"),
        MockExtractor::returning("Some article text."),
        MockSummarizer::new(summary),
    );

    let result = pipeline.run("https://example.com/article").await.unwrap();
    assert_eq!(result, summary);
}

#[tokio::test]
async fn test_report_describes_the_source() {
    let document = Document::new("Three little words").with_metadata("title", "An Article");
    let pipeline = Pipeline::new(
        MockExtractor::returning("unused"),
        MockExtractor::returning_document(document),
        MockSummarizer::new("summary"),
    );

    let report = pipeline
        .run_detailed("  https://example.com/article  ")
        .await
        .unwrap();

    assert_eq!(report.url, "https://example.com/article");
    assert_eq!(report.source, SourceKind::Page);
    assert_eq!(report.title.as_deref(), Some("An Article"));
    assert_eq!(report.word_count, 3);
    assert_eq!(report.summary, "summary");
}

// ─── Video locators ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_video_without_metadata_uses_placeholders() {
    let locator = Locator::parse("https://youtube.com/watch?v=abc").unwrap();
    let extractor = VideoExtractor::new(MockMetadataSource::new(None, None));

    let document = extractor.extract(&locator).await.unwrap();
    assert_eq!(document.text(), "Video\n\nNo description available.");
}

#[tokio::test]
async fn test_video_locator_goes_through_video_extractor() {
    let metadata = MockMetadataSource::new(Some("Rust in 100 Seconds"), Some("A quick tour."));
    let metadata_calls = metadata.calls.clone();
    let page = MockExtractor::returning("should not be used");
    let page_calls = page.calls.clone();
    let backend = MockSummarizer::new("summary");
    let prompts = backend.calls.clone();

    let pipeline = Pipeline::new(VideoExtractor::new(metadata), page, backend);
    let report = pipeline
        .run_detailed("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap();

    assert_eq!(report.source, SourceKind::Video);
    assert_eq!(report.title.as_deref(), Some("Rust in 100 Seconds"));
    assert_eq!(metadata_calls.lock().unwrap().len(), 1);
    assert!(page_calls.lock().unwrap().is_empty());

    let prompts = prompts.lock().unwrap();
    assert!(prompts[0].contains("Rust in 100 Seconds\n\nA quick tour."));
}

#[tokio::test]
async fn test_null_video_metadata_reaches_the_prompt_as_placeholders() {
    let backend = MockSummarizer::new("summary");
    let prompts = backend.calls.clone();

    let pipeline = Pipeline::new(
        VideoExtractor::new(MockMetadataSource::new(None, None)),
        MockExtractor::returning("unused"),
        backend,
    );
    pipeline.run("https://youtube.com/watch?v=abc").await.unwrap();

    let prompts = prompts.lock().unwrap();
    assert!(prompts[0].contains("Content: Video\n\nNo description available.\n"));
}

// ─── Invalid input ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_input_never_reaches_the_network() {
    for input in ["", "   ", "not a url", "example.com", "ftp://example.com/file"] {
        let video = MockExtractor::returning("unused");
        let page = MockExtractor::returning("unused");
        let backend = MockSummarizer::new("summary");
        let video_calls = video.calls.clone();
        let page_calls = page.calls.clone();
        let backend_calls = backend.calls.clone();

        let pipeline = Pipeline::new(video, page, backend);
        let err = pipeline.run(input).await.unwrap_err();

        assert!(
            matches!(err, PipelineError::InvalidInput { .. }),
            "{input:?} should be invalid, got {err:?}"
        );
        assert_eq!(err.stage(), Stage::Validation);
        assert!(video_calls.lock().unwrap().is_empty());
        assert!(page_calls.lock().unwrap().is_empty());
        assert!(backend_calls.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_empty_input_is_rejected_immediately() {
    let pipeline = Pipeline::new(
        MockExtractor::returning("unused"),
        MockExtractor::returning("unused"),
        MockSummarizer::new("summary"),
    );

    let err = pipeline.run("").await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput { .. }));
}

// ─── Error propagation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_extraction_failure_skips_the_backend() {
    let page = MockExtractor::failing(|| ExtractError::Timeout(Duration::from_secs(10)));
    let backend = MockSummarizer::new("summary");
    let backend_calls = backend.calls.clone();

    let pipeline = Pipeline::new(MockExtractor::returning("unused"), page, backend);
    let err = pipeline.run("https://example.com/article").await.unwrap_err();

    assert!(
        matches!(
            err,
            PipelineError::ExtractionFailed {
                source_kind: SourceKind::Page,
                ..
            }
        ),
        "got {err:?}"
    );
    assert_eq!(err.stage(), Stage::PageExtraction);
    assert!(err.to_string().contains("timed out"));
    assert!(backend_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_page_content_is_an_extraction_failure() {
    let page = MockExtractor::failing(|| ExtractError::EmptyContent);
    let pipeline = Pipeline::new(
        MockExtractor::returning("unused"),
        page,
        MockSummarizer::new("summary"),
    );

    let err = pipeline.run("https://example.com/empty").await.unwrap_err();
    assert_eq!(err.kind(), "extraction_failed");
}

#[tokio::test]
async fn test_video_failure_does_not_fall_back_to_page_extractor() {
    let page = MockExtractor::returning("page text");
    let page_calls = page.calls.clone();
    let backend = MockSummarizer::new("summary");
    let backend_calls = backend.calls.clone();

    let pipeline = Pipeline::new(
        VideoExtractor::new(MockMetadataSource::failing("Video unavailable")),
        page,
        backend,
    );
    let err = pipeline
        .run("https://youtube.com/watch?v=removed")
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::VideoExtraction);
    assert!(err.to_string().contains("Video unavailable"));
    assert!(page_calls.lock().unwrap().is_empty());
    assert!(backend_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_distinct_from_extraction_failure() {
    let backend = MockSummarizer::failing(|| BackendError::Api {
        status: 401,
        message: "Invalid API Key".to_string(),
    });
    let backend_calls = backend.calls.clone();

    let pipeline = Pipeline::new(
        MockExtractor::returning("unused"),
        MockExtractor::returning("Hello world."),
        backend,
    );
    let err = pipeline.run("https://example.com/article").await.unwrap_err();

    assert!(matches!(err, PipelineError::BackendFailed { .. }), "got {err:?}");
    assert_eq!(err.stage(), Stage::Summarization);
    assert!(err.to_string().contains("401"));
    assert_eq!(backend_calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_credential_surfaces_as_backend_failure() {
    let pipeline = Pipeline::new(
        MockExtractor::returning("unused"),
        MockExtractor::returning("Hello world."),
        MockSummarizer::failing(|| BackendError::MissingCredential),
    );

    let err = pipeline.run("https://example.com/article").await.unwrap_err();
    assert_eq!(err.kind(), "backend_failed");
}

// ─── Prompt budget & concurrency ─────────────────────────────────────────────

#[tokio::test]
async fn test_oversized_content_is_truncated_before_the_backend() {
    let long_text = "word ".repeat(1_000);
    let backend = MockSummarizer::new("summary");
    let prompts = backend.calls.clone();

    let pipeline = Pipeline::new(
        MockExtractor::returning("unused"),
        MockExtractor::returning(&long_text),
        backend,
    )
    .with_prompt_options(PromptOptions {
        max_content_chars: 100,
    });
    pipeline.run("https://example.com/long").await.unwrap();

    let prompts = prompts.lock().unwrap();
    let content = prompts[0].split("Content: ").nth(1).unwrap();
    assert!(content.trim_end().len() <= 100);
    assert!(content.trim_end().ends_with("word"));
}

#[tokio::test]
async fn test_concurrent_runs_do_not_interfere() {
    let pipeline = Arc::new(Pipeline::new(
        VideoExtractor::new(MockMetadataSource::new(Some("A video"), None)),
        MockExtractor::returning("A page."),
        MockSummarizer::echo_length(),
    ));

    let (video, page) = tokio::join!(
        pipeline.run_detailed("https://youtu.be/abc"),
        pipeline.run_detailed("https://example.com/article"),
    );

    let video = video.unwrap();
    let page = page.unwrap();
    assert_eq!(video.source, SourceKind::Video);
    assert_eq!(page.source, SourceKind::Page);
    assert_ne!(video.summary, page.summary);
}
