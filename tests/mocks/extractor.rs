use std::sync::{Arc, Mutex};

use url_summarizer::{
    document::Document, error::ExtractError, extract::Extractor, source::Locator,
};

#[derive(Clone)]
pub struct MockExtractor {
    pub document: Document,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<fn() -> ExtractError>,
}

impl MockExtractor {
    pub fn returning(text: &str) -> Self {
        Self::returning_document(Document::new(text))
    }

    pub fn returning_document(document: Document) -> Self {
        Self {
            document,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(fail_with: fn() -> ExtractError) -> Self {
        Self {
            document: Document::new(""),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(fail_with),
        }
    }
}

impl Extractor for MockExtractor {
    async fn extract(&self, locator: &Locator) -> Result<Document, ExtractError> {
        self.calls.lock().unwrap().push(locator.to_string());
        if let Some(fail_with) = self.fail_with {
            return Err(fail_with());
        }
        Ok(self.document.clone())
    }
}
