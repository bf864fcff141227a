//! HTTP article fetcher with plain-text extraction.

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;
use crate::traits::{Article, ArticleFetcher};

/// Fetches article pages over HTTP and reduces them to plain text.
///
/// Good enough for cooperative news sites; JavaScript-rendered pages come
/// back empty and are dropped by the retriever like any other fetch
/// failure.
pub struct HttpArticleFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for HttpArticleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpArticleFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(20))
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: "ClaimLensBot/1.0".to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<Article, FetchError> {
        debug!(url = %url, "article fetch starting");
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await.map_err(|e| FetchError::Http(Box::new(e)))?;
        let title = extract_title(&html).unwrap_or_default();
        let text = html_to_text(&html);

        if text.trim().is_empty() {
            return Err(FetchError::EmptyBody { url: url.to_string() });
        }

        Ok(Article::new(title, text))
    }
}

/// Strip an HTML page down to readable text.
fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();

    // Remove non-content blocks first
    let script_pattern = regex::Regex::new(r"(?s)<script[^>]*>.*?</script>").unwrap();
    let style_pattern = regex::Regex::new(r"(?s)<style[^>]*>.*?</style>").unwrap();
    let noscript_pattern = regex::Regex::new(r"(?s)<noscript[^>]*>.*?</noscript>").unwrap();
    text = script_pattern.replace_all(&text, "").to_string();
    text = style_pattern.replace_all(&text, "").to_string();
    text = noscript_pattern.replace_all(&text, "").to_string();

    // Block elements end sentences; keep a newline where they were
    let block_pattern = regex::Regex::new(r"</(p|div|h1|h2|h3|h4|li|tr|section|article)>").unwrap();
    text = block_pattern.replace_all(&text, "\n").to_string();
    let br_pattern = regex::Regex::new(r"<br\s*/?>").unwrap();
    text = br_pattern.replace_all(&text, "\n").to_string();

    // Remove remaining tags
    let tag_pattern = regex::Regex::new(r"<[^>]+>").unwrap();
    text = tag_pattern.replace_all(&text, " ").to_string();

    // Decode the common entities
    text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    // Collapse whitespace per line, drop empty lines
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_title(html: &str) -> Option<String> {
    let title_pattern = regex::Regex::new(r"(?s)<title[^>]*>(.*?)</title>").ok()?;
    title_pattern
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}
