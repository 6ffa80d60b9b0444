pub mod block;
mod client;
pub mod component;
pub mod envelope;
pub mod request;
mod response;

pub use client::{Fetcher, NOTION_API_BASE_URL};
pub use component::{ComponentDescriptor, NotionApiComponent};
pub use envelope::Envelope;
pub use request::NotionRequest;

#[derive(Debug, thiserror::Error)]
pub enum NotionTextError {
    #[error("in reqwest crate: {}: {}", message, source)]
    ReqwestError {
        message: String,
        source: reqwest::Error,
    },

    #[error("status code: {}, response: {}", status_code, message)]
    FailedStatusCode {
        status_code: reqwest::StatusCode,
        message: String,
    },

    #[error("in serde_json crate: {}: {}", message, source)]
    SerdeJsonError {
        message: String,
        source: serde_json::Error,
    },

    #[error("invalid header value: {}: {}", message, source)]
    InvalidHeader {
        message: String,
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("invalid request: {}", message)]
    InvalidRequest { message: String },

    #[error("{}", message)]
    Option { message: String },
}

/// Fetches the children of `request.block_id` and returns their plain text.
///
/// Never fails: every error is reported as [`Envelope::Error`].
pub async fn fetch_text(request: &NotionRequest) -> Envelope {
    Fetcher::new().fetch_text(request).await
}
