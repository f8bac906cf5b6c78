use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::SummaryReport;
use crate::source::SourceKind;

#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub source: SourceKind,
    pub title: Option<String>,
    pub summary: String,
    pub summarized_at: DateTime<Utc>,
    pub word_count: usize,
}

impl From<SummaryReport> for SummarizeResponse {
    fn from(report: SummaryReport) -> Self {
        SummarizeResponse {
            url: report.url,
            source: report.source,
            title: report.title,
            summary: report.summary,
            summarized_at: Utc::now(),
            word_count: report.word_count,
        }
    }
}
