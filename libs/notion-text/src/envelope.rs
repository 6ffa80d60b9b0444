use serde::{Deserialize, Serialize};

use crate::NotionTextError;

/// Result of a fetch: `{"text": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Envelope {
    Text(Vec<String>),
    Error(String),
}

impl Envelope {
    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Error(_))
    }

    pub fn texts(&self) -> Option<&[String]> {
        match self {
            Envelope::Text(texts) => Some(texts),
            Envelope::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Envelope::Text(_) => None,
            Envelope::Error(message) => Some(message),
        }
    }
}

impl From<Result<Vec<String>, NotionTextError>> for Envelope {
    fn from(result: Result<Vec<String>, NotionTextError>) -> Self {
        match result {
            Ok(texts) => Envelope::Text(texts),
            Err(e) => Envelope::Error(e.to_string()),
        }
    }
}
