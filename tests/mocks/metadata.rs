use std::sync::{Arc, Mutex};

use url_summarizer::{
    error::ExtractError,
    extract::{VideoMetadata, VideoMetadataSource},
    source::Locator,
};

#[derive(Clone)]
pub struct MockMetadataSource {
    pub metadata: VideoMetadata,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockMetadataSource {
    pub fn new(title: Option<&str>, description: Option<&str>) -> Self {
        Self {
            metadata: VideoMetadata {
                title: title.map(str::to_string),
                description: description.map(str::to_string),
                ..Default::default()
            },
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(None, None)
        }
    }
}

impl VideoMetadataSource for MockMetadataSource {
    async fn fetch_metadata(&self, locator: &Locator) -> Result<VideoMetadata, ExtractError> {
        self.calls.lock().unwrap().push(locator.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(ExtractError::Metadata(msg.clone()));
        }
        Ok(self.metadata.clone())
    }
}
