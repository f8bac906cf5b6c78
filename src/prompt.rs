use std::fmt;

use crate::document::Document;

/// Instruction wrapped around the extracted content.
pub const PROMPT_TEMPLATE: &str = "
Provide a detailed summary of the following content in 300 words:
Content: {text}
";

/// Separator between documents when more than one is stuffed into the prompt.
const DOCUMENT_SEPARATOR: &str = "\n\n";

pub const DEFAULT_MAX_CONTENT_CHARS: usize = 24_000;

#[derive(Debug, Clone)]
pub struct PromptOptions {
    /// Upper bound on the content substituted into the template, in characters.
    pub max_content_chars: usize,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

/// The fully rendered text sent to the summarization backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stuffs every document into a single prompt. No chunking, no map-reduce.
pub fn assemble(docs: &[Document], options: &PromptOptions) -> Prompt {
    let content = docs
        .iter()
        .map(Document::text)
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR);

    let full_len = content.len();
    let content = truncate_content(&content, options.max_content_chars);
    if content.len() < full_len {
        tracing::warn!(
            max_content_chars = options.max_content_chars,
            full_bytes = full_len,
            kept_bytes = content.len(),
            "Content exceeds prompt budget, truncating"
        );
    }

    let (head, tail) = PROMPT_TEMPLATE
        .split_once("{text}")
        .unwrap_or((PROMPT_TEMPLATE, ""));

    let mut result = String::with_capacity(head.len() + content.len() + tail.len());
    result.push_str(head);
    result.push_str(content);
    result.push_str(tail);
    Prompt(result)
}

/// Cuts `content` to at most `max_chars` characters, backing off to the last
/// whitespace so words stay whole when possible.
fn truncate_content(content: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = content.char_indices().nth(max_chars) else {
        return content;
    };

    let head = &content[..cut];
    match head.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => head[..idx].trim_end(),
        _ => head,
    }
}
