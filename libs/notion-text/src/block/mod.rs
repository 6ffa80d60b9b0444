use serde::Deserialize;

/// Body of `GET /v1/blocks/{block_id}/children`.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct BlockChildren {
    #[serde(default)]
    pub results: Vec<Block>,
}

impl BlockChildren {
    /// Every `plain_text` of every block, in source order.
    pub fn into_plain_texts(self) -> Vec<String> {
        self.results
            .into_iter()
            .flat_map(Block::into_plain_texts)
            .collect()
    }
}

/// A child block, keyed by its `type`.
///
/// Kinds without a `rich_text` payload decode as [`Block::Unsupported`].
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        paragraph: TextValue,
    },
    #[serde(rename = "heading_1")]
    Heading1 {
        #[serde(default)]
        heading_1: TextValue,
    },
    #[serde(rename = "heading_2")]
    Heading2 {
        #[serde(default)]
        heading_2: TextValue,
    },
    #[serde(rename = "heading_3")]
    Heading3 {
        #[serde(default)]
        heading_3: TextValue,
    },
    BulletedListItem {
        #[serde(default)]
        bulleted_list_item: TextValue,
    },
    NumberedListItem {
        #[serde(default)]
        numbered_list_item: TextValue,
    },
    ToDo {
        #[serde(default)]
        to_do: TextValue,
    },
    Toggle {
        #[serde(default)]
        toggle: TextValue,
    },
    Quote {
        #[serde(default)]
        quote: TextValue,
    },
    Callout {
        #[serde(default)]
        callout: TextValue,
    },
    Code {
        #[serde(default)]
        code: TextValue,
    },
    Template {
        #[serde(default)]
        template: TextValue,
    },
    #[serde(other)]
    Unsupported,
}

impl Block {
    pub fn rich_text(&self) -> &[RichText] {
        let value = match self {
            Block::Paragraph { paragraph } => paragraph,
            Block::Heading1 { heading_1 } => heading_1,
            Block::Heading2 { heading_2 } => heading_2,
            Block::Heading3 { heading_3 } => heading_3,
            Block::BulletedListItem { bulleted_list_item } => {
                bulleted_list_item
            }
            Block::NumberedListItem { numbered_list_item } => {
                numbered_list_item
            }
            Block::ToDo { to_do } => to_do,
            Block::Toggle { toggle } => toggle,
            Block::Quote { quote } => quote,
            Block::Callout { callout } => callout,
            Block::Code { code } => code,
            Block::Template { template } => template,
            Block::Unsupported => return &[],
        };

        &value.rich_text
    }

    pub fn plain_texts(&self) -> impl Iterator<Item = &str> {
        self.rich_text()
            .iter()
            .filter_map(|span| span.plain_text.as_deref())
    }

    fn into_plain_texts(self) -> Vec<String> {
        self.plain_texts().map(str::to_string).collect()
    }
}

/// The per-kind payload; only `rich_text` is read.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct TextValue {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RichText {
    pub plain_text: Option<String>,
}
