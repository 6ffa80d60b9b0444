use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::{error, info};

use crate::{
    block::BlockChildren, response::IntoResponse, Envelope, NotionRequest,
    NotionTextError,
};

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

const TIMEOUT: Duration = Duration::from_secs(30);

/// Issues one block-children request per call.
#[derive(Clone, Debug)]
pub struct Fetcher {
    base_url: String,
    timeout: Duration,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_base_url(NOTION_API_BASE_URL)
    }

    /// Points the fetcher at another host serving the Notion API,
    /// e.g. a proxy.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn children_url(&self, request: &NotionRequest) -> String {
        format!(
            "{}/blocks/{}/children?page_size={}",
            self.base_url, request.block_id, request.page_size
        )
    }

    #[tracing::instrument(
        skip(self, request),
        fields(block_id = %request.block_id, page_size = request.page_size)
    )]
    pub async fn fetch_text(&self, request: &NotionRequest) -> Envelope {
        let result = self.try_fetch_text(request).await;

        match &result {
            Ok(texts) => info!(task = "fetch text", count = texts.len()),
            Err(e) => error!(task = "fetch text", err = e.to_string()),
        }

        Envelope::from(result)
    }

    pub async fn try_fetch_text(
        &self,
        request: &NotionRequest,
    ) -> Result<Vec<String>, NotionTextError> {
        request.validate()?;

        let text = self.get(request).await?;

        let children = serde_json::from_str::<BlockChildren>(&text)
            .into_response("failed to parse block children")?;

        Ok(children.into_plain_texts())
    }

    async fn get(
        &self,
        request: &NotionRequest,
    ) -> Result<String, NotionTextError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(self.timeout)
            .build()
            .into_response("failed to build client")?;

        let response = client
            .get(self.children_url(request))
            .headers(headers(request)?)
            .send()
            .await
            .into_response("failed to send")?;

        let status = response.status();

        let text = response.text().await.into_response("failed to get text")?;

        if !status.is_success() {
            return Err(NotionTextError::FailedStatusCode {
                status_code: status,
                message: text,
            });
        }

        Ok(text)
    }
}

fn headers(request: &NotionRequest) -> Result<HeaderMap, NotionTextError> {
    let mut authorization =
        HeaderValue::from_str(format!("Bearer {}", request.api_key).as_str())
            .into_response("failed to build Authorization header")?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(
        "Notion-Version",
        HeaderValue::from_str(&request.notion_version)
            .into_response("failed to build Notion-Version header")?,
    );

    Ok(headers)
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::Fetcher;
    use crate::{Envelope, NotionRequest, NotionTextError};

    const HELLO_WORLD: &str = r#"{"results":[{"type":"paragraph","paragraph":{"rich_text":[{"plain_text":"Hello"},{"plain_text":"World"}]}}]}"#;

    async fn respond_with(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/blocks/abc123/children"))
            .respond_with(template)
            .mount(&server)
            .await;

        server
    }

    #[test]
    fn test_children_url() {
        let fetcher = Fetcher::new();
        let request = NotionRequest::new("secret", "abc123").with_page_size(10);

        assert_eq!(
            fetcher.children_url(&request),
            "https://api.notion.com/v1/blocks/abc123/children?page_size=10"
        );
    }

    #[tokio::test]
    async fn test_fetch_text() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocks/abc123/children"))
            .and(query_param("page_size", "100"))
            .and(header("Authorization", "Bearer ntn_secret"))
            .and(header("Notion-Version", "2022-06-28"))
            .respond_with(ResponseTemplate::new(200).set_body_string(HELLO_WORLD))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::with_base_url(server.uri());
        let request = NotionRequest::new("ntn_secret", "abc123");

        // Act
        let envelope = fetcher.fetch_text(&request).await;

        // Assert
        assert_eq!(
            envelope,
            Envelope::Text(vec!["Hello".to_string(), "World".to_string()])
        );
    }

    #[tokio::test]
    async fn test_fetch_text_sends_custom_version_and_page_size() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocks/abc123/children"))
            .and(query_param("page_size", "7"))
            .and(header("Notion-Version", "2025-09-03"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"results":[]}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::with_base_url(format!("{}/", server.uri()));
        let request = NotionRequest::new("ntn_secret", "abc123")
            .with_notion_version("2025-09-03")
            .with_page_size(7);

        // Act
        let envelope = fetcher.fetch_text(&request).await;

        // Assert
        assert_eq!(envelope, Envelope::Text(vec![]));
    }

    #[tokio::test]
    async fn test_fetch_text_with_failed_status() {
        // Arrange
        let server = respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"{"object":"error","code":"object_not_found"}"#),
        )
        .await;
        let fetcher = Fetcher::with_base_url(server.uri());

        // Act
        let result = fetcher
            .try_fetch_text(&NotionRequest::new("ntn_secret", "abc123"))
            .await;

        // Assert
        let Err(NotionTextError::FailedStatusCode {
            status_code,
            message,
        }) = result
        else {
            panic!("unexpected result: {:?}", result);
        };
        assert_eq!(status_code.as_u16(), 404);
        assert!(message.contains("object_not_found"));
    }

    #[tokio::test]
    async fn test_fetch_text_reports_failed_status_as_error() {
        // Arrange
        let server = respond_with(ResponseTemplate::new(500)).await;
        let fetcher = Fetcher::with_base_url(server.uri());

        // Act
        let envelope = fetcher
            .fetch_text(&NotionRequest::new("ntn_secret", "abc123"))
            .await;

        // Assert
        assert!(envelope.error().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_text_with_malformed_body() {
        // Arrange
        let server =
            respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
                .await;
        let fetcher = Fetcher::with_base_url(server.uri());

        // Act
        let result = fetcher
            .try_fetch_text(&NotionRequest::new("ntn_secret", "abc123"))
            .await;

        // Assert
        assert!(matches!(
            result,
            Err(NotionTextError::SerdeJsonError { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_text_with_timeout() {
        // Arrange
        let server = respond_with(
            ResponseTemplate::new(200)
                .set_body_string(HELLO_WORLD)
                .set_delay(Duration::from_secs(2)),
        )
        .await;
        let fetcher = Fetcher::with_base_url(server.uri())
            .with_timeout(Duration::from_millis(100));

        // Act
        let result = fetcher
            .try_fetch_text(&NotionRequest::new("ntn_secret", "abc123"))
            .await;

        // Assert
        let Err(NotionTextError::ReqwestError { source, .. }) = result else {
            panic!("unexpected result: {:?}", result);
        };
        assert!(source.is_timeout());
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_sent() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(HELLO_WORLD))
            .expect(0)
            .mount(&server)
            .await;
        let fetcher = Fetcher::with_base_url(server.uri());

        // Act
        let envelope = fetcher.fetch_text(&NotionRequest::new("", "abc123")).await;

        // Assert
        assert_eq!(
            envelope,
            Envelope::Error("invalid request: api_key is required".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        // Arrange
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let fetcher = Fetcher::with_base_url(format!("http://127.0.0.1:{}", port));

        // Act
        let envelope = fetcher
            .fetch_text(&NotionRequest::new("ntn_secret", "abc123"))
            .await;

        // Assert
        assert!(envelope.is_error());
    }
}
