//! Host-facing description of the Notion block-children component and a
//! runner that resolves named input values into a [`NotionRequest`].

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use tracing::error;

use crate::{
    request::{DEFAULT_NOTION_VERSION, DEFAULT_PAGE_SIZE},
    response::IntoResponse,
    Envelope, Fetcher, NotionRequest, NotionTextError,
};

pub const API_KEY: &str = "api_key";
pub const BLOCK_ID: &str = "block_id";
pub const NOTION_VERSION: &str = "notion_version";
pub const PAGE_SIZE: &str = "page_size";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    SecretStr,
    Str,
    Int,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: InputKind,
    pub info: Option<&'static str>,
    pub value: Option<Value>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub method: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub documentation: &'static str,
    pub icon: &'static str,
    pub inputs: Vec<InputDescriptor>,
    pub outputs: Vec<OutputDescriptor>,
}

impl ComponentDescriptor {
    pub fn notion_api() -> Self {
        Self {
            name: "NotionAPI",
            display_name: "Notion API",
            description: "Fetch text content from a Notion page or block.",
            documentation:
                "https://developers.notion.com/reference/get-block-children",
            icon: "Notion",
            inputs: vec![
                InputDescriptor {
                    name: API_KEY,
                    display_name: "Notion API Key",
                    kind: InputKind::SecretStr,
                    info: Some(
                        "Your Notion integration secret (starts with `ntn_...`).",
                    ),
                    value: None,
                    required: true,
                },
                InputDescriptor {
                    name: BLOCK_ID,
                    display_name: "Block/Page ID",
                    kind: InputKind::Str,
                    info: Some(
                        "The ID of the page or block to fetch children for.",
                    ),
                    value: None,
                    required: true,
                },
                InputDescriptor {
                    name: NOTION_VERSION,
                    display_name: "Notion API Version",
                    kind: InputKind::Str,
                    info: None,
                    value: Some(Value::from(DEFAULT_NOTION_VERSION)),
                    required: true,
                },
                InputDescriptor {
                    name: PAGE_SIZE,
                    display_name: "Page Size",
                    kind: InputKind::Int,
                    info: Some(
                        "Maximum number of child blocks to fetch per request.",
                    ),
                    value: Some(Value::from(DEFAULT_PAGE_SIZE)),
                    required: false,
                },
            ],
            outputs: vec![OutputDescriptor {
                name: "data",
                display_name: "Text Content",
                method: "fetch_text",
            }],
        }
    }

    pub fn input(&self, name: &str) -> Option<&InputDescriptor> {
        self.inputs.iter().find(|input| input.name == name)
    }
}

/// The component as a host drives it: input values set by name, then one
/// `fetch_text` call per run.
#[derive(Clone)]
pub struct NotionApiComponent {
    descriptor: ComponentDescriptor,
    fetcher: Fetcher,
    values: Map<String, Value>,
}

impl fmt::Debug for NotionApiComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // input values may hold the api key
        f.debug_struct("NotionApiComponent")
            .field("name", &self.descriptor.name)
            .field("fetcher", &self.fetcher)
            .field("inputs", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for NotionApiComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl NotionApiComponent {
    pub fn new() -> Self {
        Self::with_fetcher(Fetcher::new())
    }

    pub fn with_fetcher(fetcher: Fetcher) -> Self {
        Self {
            descriptor: ComponentDescriptor::notion_api(),
            fetcher,
            values: Map::new(),
        }
    }

    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Resolves the current input values, falling back to the descriptor's
    /// defaults.
    pub fn request(&self) -> Result<NotionRequest, NotionTextError> {
        let page_size = self.value(PAGE_SIZE)?;
        let page_size = match page_size {
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .into_response("page_size must be a positive integer")?,
            None => DEFAULT_PAGE_SIZE,
        };

        let request = NotionRequest::new(
            self.string(API_KEY)?,
            self.string(BLOCK_ID)?,
        )
        .with_notion_version(self.string(NOTION_VERSION)?)
        .with_page_size(page_size);

        request.validate()?;

        Ok(request)
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_text(&self) -> Envelope {
        match self.request() {
            Ok(request) => self.fetcher.fetch_text(&request).await,
            Err(e) => {
                error!(task = "resolve inputs", err = e.to_string());
                Envelope::Error(e.to_string())
            }
        }
    }

    fn value(&self, name: &str) -> Result<Option<&Value>, NotionTextError> {
        let input = self
            .descriptor
            .input(name)
            .into_response(&format!("unknown input: {}", name))?;

        let value = self
            .values
            .get(name)
            .filter(|value| !value.is_null())
            .or(input.value.as_ref());

        if value.is_none() && input.required {
            return Err(NotionTextError::InvalidRequest {
                message: format!("{} is required", name),
            });
        }

        Ok(value)
    }

    fn string(&self, name: &str) -> Result<String, NotionTextError> {
        let value = self.value(name)?.into_response(&format!(
            "{} is required",
            name
        ))?;

        value
            .as_str()
            .map(str::to_string)
            .into_response(&format!("{} must be a string", name))
    }
}
