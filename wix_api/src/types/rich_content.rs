//! Ricos rich-content documents: a tree of typed nodes.

use serde::{Deserialize, Serialize};

/// A rich-content document.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RichContent {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_style: Option<serde_json::Value>,
}

/// One node of a rich-content tree.
///
/// Only the text payload is typed; other node data is carried through untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_data: Option<TextData>,
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TextData {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorations: Vec<serde_json::Value>,
}

impl RichContent {
    /// A document with one paragraph per entry of `paragraphs`.
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nodes = paragraphs
            .into_iter()
            .map(|text| Node {
                node_type: "PARAGRAPH".to_string(),
                nodes: vec![Node::text(text)],
                ..Default::default()
            })
            .collect();
        Self {
            nodes,
            ..Default::default()
        }
    }

    /// Text of every text node, depth first.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for node in &self.nodes {
            node.collect_texts(&mut out);
        }
        out
    }

    /// Character length of the longest single text node.
    pub fn longest_text_len(&self) -> usize {
        self.texts()
            .iter()
            .map(|t| t.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Concatenated plain text, one line per text node.
    pub fn plain_text(&self) -> String {
        self.texts().join("\n")
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node {
            node_type: "TEXT".to_string(),
            text_data: Some(TextData {
                text: text.into(),
                decorations: Vec::new(),
            }),
            ..Default::default()
        }
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(text) = &self.text_data {
            out.push(text.text.as_str());
        }
        for child in &self.nodes {
            child.collect_texts(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_text_is_per_node() {
        let doc = RichContent::from_paragraphs(["abc", "abcdef", "ab"]);
        assert_eq!(doc.longest_text_len(), 6);
        assert_eq!(doc.plain_text(), "abc\nabcdef\nab");
    }

    #[test]
    fn unknown_node_data_survives_round_trip() {
        let json = r#"{"nodes":[{"type":"IMAGE","id":"n1","imageData":{"src":"x"}}]}"#;
        let doc: RichContent = serde_json::from_str(json).unwrap();
        assert!(doc.nodes[0].data.contains_key("imageData"));
        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["nodes"][0]["imageData"]["src"], "x");
        assert_eq!(doc.longest_text_len(), 0);
    }
}
