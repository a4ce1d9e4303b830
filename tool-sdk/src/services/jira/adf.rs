//! Atlassian Document Format flattening
//!
//! Jira Cloud returns descriptions and comment bodies as ADF trees. The
//! tree is read into a closed [`AdfNode`] shape and flattened to plain text.
//! Only the distinctions that affect the text are kept: text leaves, hard
//! breaks, and containers (where `paragraph` ends with a newline).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// One node of an ADF document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdfNode {
    /// Text leaf, also used for bare JSON strings
    Text(String),
    /// `hardBreak`
    HardBreak,
    /// Any other node; an empty `node_type` marks a bare JSON array
    Container {
        node_type: String,
        content: Vec<AdfNode>,
    },
}

impl AdfNode {
    pub const PARAGRAPH: &'static str = "paragraph";

    pub fn text(value: impl Into<String>) -> Self {
        AdfNode::Text(value.into())
    }

    pub fn container(node_type: impl Into<String>, content: Vec<AdfNode>) -> Self {
        AdfNode::Container {
            node_type: node_type.into(),
            content,
        }
    }

    pub fn paragraph(content: Vec<AdfNode>) -> Self {
        Self::container(Self::PARAGRAPH, content)
    }

    /// Build a node from arbitrary JSON.
    ///
    /// Null, booleans and numbers carry no text and become an empty leaf.
    /// Nesting depth is unbounded; the stack grows as needed.
    pub fn from_value(value: &Value) -> Self {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || Self::convert(value))
    }

    fn convert(value: &Value) -> Self {
        match value {
            Value::String(text) => AdfNode::Text(text.clone()),
            Value::Array(items) => Self::container("", items.iter().map(Self::from_value).collect()),
            Value::Object(map) => {
                let node_type = map.get("type").and_then(Value::as_str).unwrap_or_default();
                match node_type {
                    "text" => AdfNode::Text(
                        map.get("text")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    ),
                    "hardBreak" => AdfNode::HardBreak,
                    _ => {
                        let content = match map.get("content") {
                            None | Some(Value::Null) => Vec::new(),
                            Some(Value::Array(items)) => items.iter().map(Self::from_value).collect(),
                            Some(other) => vec![Self::from_value(other)],
                        };
                        Self::container(node_type, content)
                    }
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => AdfNode::Text(String::new()),
        }
    }
}

impl<'de> Deserialize<'de> for AdfNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(AdfNode::from_value(&value))
    }
}

/// Flatten a node to plain text
pub fn flatten(node: &AdfNode) -> String {
    let mut out = String::new();
    write_text(node, &mut out);
    out
}

/// Flatten an optional node; absence yields an empty string
pub fn flatten_opt(node: Option<&AdfNode>) -> String {
    node.map(flatten).unwrap_or_default()
}

enum Step<'a> {
    Visit(&'a AdfNode),
    EndParagraph,
}

// Depth-first with an explicit stack, so deep documents cannot overflow
fn write_text(root: &AdfNode, out: &mut String) {
    let mut stack = vec![Step::Visit(root)];

    while let Some(step) = stack.pop() {
        match step {
            Step::EndParagraph => out.push('\n'),
            Step::Visit(AdfNode::Text(text)) => out.push_str(text),
            Step::Visit(AdfNode::HardBreak) => out.push('\n'),
            Step::Visit(AdfNode::Container { node_type, content }) => {
                if node_type == AdfNode::PARAGRAPH {
                    stack.push(Step::EndParagraph);
                }
                stack.extend(content.iter().rev().map(Step::Visit));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten_json(value: Value) -> String {
        let node: AdfNode = serde_json::from_value(value).unwrap();
        flatten(&node)
    }

    #[test]
    fn absent_and_empty_inputs_flatten_to_nothing() {
        assert_eq!(flatten_opt(None), "");
        assert_eq!(flatten_json(json!(null)), "");
        assert_eq!(flatten_json(json!("")), "");
        assert_eq!(flatten_json(json!({})), "");
        assert_eq!(flatten_json(json!([])), "");
    }

    #[test]
    fn plain_string_is_returned_unchanged() {
        assert_eq!(flatten_json(json!("already plain")), "already plain");
    }

    #[test]
    fn paragraph_with_hard_break() {
        let doc = json!({
            "type": "paragraph",
            "content": [
                {"type": "text", "text": "a"},
                {"type": "hardBreak"},
                {"type": "text", "text": "b"}
            ]
        });
        assert_eq!(flatten_json(doc), "a\nb\n");
    }

    #[test]
    fn sequence_concatenates_without_separator() {
        let doc = json!([
            {"type": "text", "text": "x"},
            {"type": "text", "text": "y"}
        ]);
        assert_eq!(flatten_json(doc), "xy");
    }

    #[test]
    fn nested_paragraphs_each_add_a_newline() {
        let doc = json!({
            "type": "paragraph",
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "a"},
                    {"type": "text", "text": "b"},
                    {"type": "text", "text": "c"}
                ]}
            ]
        });
        assert_eq!(flatten_json(doc), "abc\n\n");
    }

    #[test]
    fn full_document_with_unknown_nodes() {
        let doc = json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "Login fails", "marks": [{"type": "strong"}]}]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "after deploy"}]}
                    ]}
                ]},
                {"type": "codeBlock", "content": [{"type": "text", "text": "NPE at Auth.java:42"}]},
                {"type": "rule"}
            ]
        });
        assert_eq!(flatten_json(doc), "Login fails\nafter deploy\nNPE at Auth.java:42");
    }

    #[test]
    fn text_node_without_text_is_empty() {
        assert_eq!(flatten_json(json!({"type": "paragraph", "content": [{"type": "text"}]})), "\n");
    }

    #[test]
    fn deeply_nested_paragraphs_flatten() {
        let depth = 1_000;
        let mut node = AdfNode::text("deep");
        for _ in 0..depth {
            node = AdfNode::paragraph(vec![node]);
        }

        let text = flatten(&node);
        assert!(text.starts_with("deep\n"));
        assert_eq!(text.len(), "deep".len() + depth);
    }

    #[test]
    fn non_textual_scalars_are_ignored() {
        assert_eq!(flatten_json(json!([1, true, "ok"])), "ok");
    }
}
