pub mod page;
pub mod video;

use std::future::Future;

use crate::{document::Document, error::ExtractError, source::Locator};

pub use page::{FetchedPage, HttpFetcher, PageExtractor, PageFetcher};
pub use video::{VideoExtractor, VideoMetadata, VideoMetadataSource, YtDlp};

/// Turns a locator into a document for one kind of source.
pub trait Extractor {
    fn extract(
        &self,
        locator: &Locator,
    ) -> impl Future<Output = Result<Document, ExtractError>> + Send;
}
