use std::future::Future;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{header::CONTENT_TYPE, Client, ClientBuilder};
use scraper::{ElementRef, Html, Node, Selector};

use crate::{
    config::FetchConfig,
    document::Document,
    error::{AppError, ExtractError},
    extract::Extractor,
    source::Locator,
};

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Failed to parse body selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Failed to parse title selector"));

/// Elements whose text never reaches the document.
const SKIPPED_TAGS: [&str; 6] = ["script", "style", "noscript", "template", "svg", "head"];

/// Elements that start a new line of text.
const BLOCK_TAGS: [&str; 24] = [
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "article",
    "section", "main", "header", "footer", "blockquote", "pre", "figcaption", "dt", "dd", "hr",
];

/// Raw response body of a page fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: String,
    pub content_type: Option<String>,
}

impl FetchedPage {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: Some("text/html; charset=utf-8".to_string()),
        }
    }

    /// How the body should be read, judged from its `Content-Type`.
    /// A missing header is treated as HTML.
    fn format(&self) -> Result<BodyFormat, ExtractError> {
        let Some(content_type) = self.content_type.as_deref() else {
            return Ok(BodyFormat::Html);
        };
        let mime = content_type.to_ascii_lowercase();

        if mime.contains("html") || mime.contains("xml") {
            Ok(BodyFormat::Html)
        } else if mime.starts_with("text/") || mime.contains("json") {
            Ok(BodyFormat::Text)
        } else {
            Err(ExtractError::UnsupportedContentType(content_type.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Html,
    Text,
}

pub trait PageFetcher {
    fn fetch(
        &self,
        locator: &Locator,
    ) -> impl Future<Output = Result<FetchedPage, ExtractError>> + Send;
}

/// Plain HTTP GET with a static identification header and explicit timeouts.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, AppError> {
        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate validation is disabled for page fetches");
        }

        let client = ClientBuilder::new()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(5)))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    fn map_request_error(&self, err: reqwest::Error) -> ExtractError {
        if err.is_timeout() {
            ExtractError::Timeout(self.timeout)
        } else {
            ExtractError::Request(err)
        }
    }
}

impl PageFetcher for HttpFetcher {
    #[tracing::instrument(skip_all, fields(url = %locator))]
    async fn fetch(&self, locator: &Locator) -> Result<FetchedPage, ExtractError> {
        let response = self
            .client
            .get(locator.as_str())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status {
                status: status.as_u16(),
                url: locator.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;
        tracing::debug!(bytes = body.len(), ?content_type, "Fetched page");

        Ok(FetchedPage { body, content_type })
    }
}

/// Text and title pulled out of an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub title: Option<String>,
    pub text: String,
}

/// Best-effort HTML to plain text: body text only, scripts and styles dropped,
/// one line per block element, blank lines and runs of spaces collapsed.
pub fn html_to_text(html: &str) -> PageText {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| format_text(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::with_capacity(html.len() / 2);
    collect_text(root, &mut raw);

    PageText {
        title,
        text: format_text(&raw),
    }
}

enum Step<'a> {
    Enter(ElementRef<'a>),
    Text(&'a str),
    Break,
}

/// Walks the subtree with an explicit stack so nesting depth is bounded by the heap.
fn collect_text(root: ElementRef<'_>, buf: &mut String) {
    let mut stack = vec![Step::Enter(root)];

    while let Some(step) = stack.pop() {
        let element = match step {
            Step::Text(text) => {
                buf.push_str(text);
                continue;
            }
            Step::Break => {
                buf.push('\n');
                continue;
            }
            Step::Enter(element) => element,
        };

        for child in element.children().rev() {
            match child.value() {
                Node::Text(text) => stack.push(Step::Text(text)),
                Node::Element(el) => {
                    let tag = el.name();
                    if SKIPPED_TAGS.contains(&tag) {
                        continue;
                    }
                    let Some(child_ref) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let is_block = BLOCK_TAGS.contains(&tag);
                    if is_block {
                        stack.push(Step::Break);
                    }
                    stack.push(Step::Enter(child_ref));
                    if is_block {
                        stack.push(Step::Break);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Trims every line, squeezes inner whitespace and drops empty lines.
fn format_text(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());

    for line in raw.lines() {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }
        if !result.is_empty() {
            result.push('\n');
        }
        for (i, word) in words.enumerate() {
            if i > 0 {
                result.push(' ');
            }
            result.push_str(word);
        }
    }

    result
}

/// Extractor for anything that is not a video link.
pub struct PageExtractor<F> {
    fetcher: F,
}

impl<F: PageFetcher> PageExtractor<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

impl PageExtractor<HttpFetcher> {
    pub fn from_config(config: &FetchConfig) -> Result<Self, AppError> {
        Ok(Self::new(HttpFetcher::new(config)?))
    }
}

impl<F: PageFetcher + Send + Sync> Extractor for PageExtractor<F> {
    async fn extract(&self, locator: &Locator) -> Result<Document, ExtractError> {
        let page = self.fetcher.fetch(locator).await?;

        let PageText { title, text } = match page.format()? {
            BodyFormat::Html => html_to_text(&page.body),
            BodyFormat::Text => PageText {
                title: None,
                text: format_text(&page.body),
            },
        };

        if text.is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        let mut document = Document::new(text).with_metadata("source", locator.as_str());
        if let Some(title) = title {
            document = document.with_metadata("title", title);
        }
        Ok(document)
    }
}
