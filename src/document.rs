use std::collections::BTreeMap;

/// Extracted plain text plus whatever the extractor learned about its source.
///
/// Built once by an extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").map(String::as_str)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Anything an extractor may hand back: one document or an ordered batch.
pub trait IntoDocuments {
    fn into_documents(self) -> Vec<Document>;
}

impl IntoDocuments for Document {
    fn into_documents(self) -> Vec<Document> {
        vec![self]
    }
}

impl IntoDocuments for Vec<Document> {
    fn into_documents(self) -> Vec<Document> {
        self
    }
}

/// Flattens extractor output into the sequence the prompt assembler consumes,
/// so nothing downstream branches on the source type again.
pub fn normalize(raw: impl IntoDocuments) -> Vec<Document> {
    raw.into_documents()
}
