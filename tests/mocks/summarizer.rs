use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use url_summarizer::{error::BackendError, llm::Summarizer, prompt::Prompt};

#[derive(Clone, Copy)]
pub enum Reply {
    Fixed(&'static str),
    /// Answers with the length of the prompt it received.
    EchoLength,
}

#[derive(Clone)]
pub struct MockSummarizer {
    pub reply: Reply,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<fn() -> BackendError>,
    pub delay: Option<Duration>,
}

impl MockSummarizer {
    pub fn new(summary: &'static str) -> Self {
        Self::with_reply(Reply::Fixed(summary))
    }

    pub fn echo_length() -> Self {
        Self::with_reply(Reply::EchoLength)
    }

    pub fn failing(fail_with: fn() -> BackendError) -> Self {
        Self {
            fail_with: Some(fail_with),
            ..Self::new("")
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new("too late")
        }
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            delay: None,
        }
    }
}

impl Summarizer for MockSummarizer {
    async fn summarize(&self, prompt: &Prompt) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(prompt.as_str().to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(fail_with) = self.fail_with {
            return Err(fail_with());
        }
        Ok(match self.reply {
            Reply::Fixed(summary) => summary.to_string(),
            Reply::EchoLength => format!("Summary of {} characters", prompt.as_str().len()),
        })
    }
}
