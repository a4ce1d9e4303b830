//! OpenAI Responses API data models

use serde::{Deserialize, Serialize};

/// Request body for `POST /responses`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResponseRequest {
    /// ID of the model to use
    pub model: String,

    /// Prompt text
    pub input: String,

    /// Upper bound on generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Response object returned by `POST /responses`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseObject {
    pub id: String,

    #[serde(default)]
    pub model: Option<String>,

    /// `completed`, `incomplete`, ...
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub output: Vec<OutputItem>,

    #[serde(default)]
    pub usage: Option<ResponseUsage>,
}

impl ResponseObject {
    /// Concatenated text of every `output_text` part in message items
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.part_type == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// One entry of `output`; reasoning and tool items carry no content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub item_type: String,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type")]
    pub part_type: String,

    #[serde(default)]
    pub text: Option<String>,
}

/// Token accounting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResponseUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
