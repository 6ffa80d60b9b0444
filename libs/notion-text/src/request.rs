use std::fmt;

use anyhow::Context as _;
use toml::{map::Map, Value};

use crate::NotionTextError;

pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Parameters of a single block-children fetch.
#[derive(Clone, PartialEq, Eq)]
pub struct NotionRequest {
    /// Integration secret, sent as a bearer token. Never logged.
    pub api_key: String,
    pub block_id: String,
    pub notion_version: String,
    pub page_size: u32,
}

impl NotionRequest {
    pub fn new(api_key: impl Into<String>, block_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            block_id: block_id.into(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_notion_version(mut self, notion_version: impl Into<String>) -> Self {
        self.notion_version = notion_version.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<(), NotionTextError> {
        let message = if self.api_key.trim().is_empty() {
            "api_key is required"
        } else if self.block_id.trim().is_empty() {
            "block_id is required"
        } else if self.notion_version.trim().is_empty() {
            "notion_version is required"
        } else if self.page_size == 0 {
            "page_size must be positive"
        } else {
            return Ok(());
        };

        Err(NotionTextError::InvalidRequest {
            message: message.to_string(),
        })
    }

    /// Builds a request from the `[notion]` table of a config file and the
    /// `NOTION_TOKEN` secret.
    pub fn from_config(
        config: &Map<String, Value>,
        secrets: &Map<String, Value>,
    ) -> anyhow::Result<Self> {
        let notion = config
            .get("notion")
            .context("failed to load notion config")?;

        let block_id = notion
            .get("block_id")
            .context("failed to load block_id config")?
            .as_str()
            .context("failed to parse block_id config")?;

        let notion_version = match notion.get("notion_version") {
            Some(value) => value
                .as_str()
                .context("failed to parse notion_version config")?,
            None => DEFAULT_NOTION_VERSION,
        };

        let page_size = match notion.get("page_size") {
            Some(value) => {
                let page_size = value
                    .as_integer()
                    .context("failed to parse page_size config")?;
                u32::try_from(page_size)
                    .context("page_size config is out of range")?
            }
            None => DEFAULT_PAGE_SIZE,
        };

        let api_key = secrets
            .get("NOTION_TOKEN")
            .context("NOTION_TOKEN was not found")?
            .as_str()
            .context("failed to parse NOTION_TOKEN")?;

        let request = Self::new(api_key, block_id)
            .with_notion_version(notion_version)
            .with_page_size(page_size);

        request.validate()?;

        Ok(request)
    }
}

impl fmt::Debug for NotionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionRequest")
            .field("api_key", &"<redacted>")
            .field("block_id", &self.block_id)
            .field("notion_version", &self.notion_version)
            .field("page_size", &self.page_size)
            .finish()
    }
}
