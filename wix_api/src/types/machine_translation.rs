//! Machine translation of plain text, HTML and rich content.

use serde::{Deserialize, Serialize};

use super::bulk::BulkResponse;
use super::locale::Locale;
use super::oneof::{exclusive, OneofConflict};
use super::rich_content::RichContent;

/// Per-node character limit enforced by the translation service.
pub const MAX_TRANSLATABLE_LENGTH: usize = 5000;

/// One node of content submitted for translation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(try_from = "TranslatableContentWire", into = "TranslatableContentWire")]
pub struct TranslatableContent {
    /// Caller-chosen identifier echoed back in the result.
    pub id: Option<String>,
    pub format: Option<ContentFormat>,
    pub value: Option<TranslatableValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranslatableValue {
    PlainText(String),
    Html(String),
    RichContent(RichContent),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentFormat {
    PlainText,
    Html,
    Rich,
    #[serde(other)]
    Unknown,
}

impl TranslatableContent {
    pub fn plain_text(id: &str, text: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            format: Some(ContentFormat::PlainText),
            value: Some(TranslatableValue::PlainText(text.to_string())),
        }
    }

    pub fn html(id: &str, html: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            format: Some(ContentFormat::Html),
            value: Some(TranslatableValue::Html(html.to_string())),
        }
    }

    pub fn rich(id: &str, content: RichContent) -> Self {
        Self {
            id: Some(id.to_string()),
            format: Some(ContentFormat::Rich),
            value: Some(TranslatableValue::RichContent(content)),
        }
    }

    /// Length checked against [`MAX_TRANSLATABLE_LENGTH`], in characters.
    ///
    /// For rich content the limit applies to each text node separately, so
    /// this is the length of the longest one.
    pub fn measured_length(&self) -> usize {
        match &self.value {
            Some(TranslatableValue::PlainText(t)) | Some(TranslatableValue::Html(t)) => {
                t.chars().count()
            }
            Some(TranslatableValue::RichContent(r)) => r.longest_text_len(),
            None => 0,
        }
    }

    /// Whether the declared format agrees with the populated value.
    pub fn format_matches(&self) -> bool {
        match (&self.format, &self.value) {
            (None, _) => true,
            (Some(ContentFormat::PlainText), Some(TranslatableValue::PlainText(_))) => true,
            (Some(ContentFormat::Html), Some(TranslatableValue::Html(_))) => true,
            (Some(ContentFormat::Rich), Some(TranslatableValue::RichContent(_))) => true,
            _ => false,
        }
    }

    /// Plain-text rendering of the value, for display.
    pub fn text(&self) -> String {
        match &self.value {
            Some(TranslatableValue::PlainText(t)) | Some(TranslatableValue::Html(t)) => t.clone(),
            Some(TranslatableValue::RichContent(r)) => r.plain_text(),
            None => String::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatableContentWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<ContentFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    plain_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rich_content: Option<RichContent>,
}

impl TryFrom<TranslatableContentWire> for TranslatableContent {
    type Error = OneofConflict;

    fn try_from(w: TranslatableContentWire) -> Result<Self, Self::Error> {
        let value = exclusive(
            "content",
            vec![
                ("plainText", w.plain_text.map(TranslatableValue::PlainText)),
                ("html", w.html.map(TranslatableValue::Html)),
                (
                    "richContent",
                    w.rich_content.map(TranslatableValue::RichContent),
                ),
            ],
        )?;
        Ok(TranslatableContent {
            id: w.id,
            format: w.format,
            value,
        })
    }
}

impl From<TranslatableContent> for TranslatableContentWire {
    fn from(c: TranslatableContent) -> Self {
        let mut wire = TranslatableContentWire {
            id: c.id,
            format: c.format,
            plain_text: None,
            html: None,
            rich_content: None,
        };
        match c.value {
            Some(TranslatableValue::PlainText(v)) => wire.plain_text = Some(v),
            Some(TranslatableValue::Html(v)) => wire.html = Some(v),
            Some(TranslatableValue::RichContent(v)) => wire.rich_content = Some(v),
            None => {}
        }
        wire
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MachineTranslateRequest {
    pub source_language: Locale,
    pub target_language: Locale,
    pub content_to_translate: TranslatableContent,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MachineTranslateResponse {
    pub translated_content: TranslatableContent,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BulkMachineTranslateRequest {
    pub source_language: Locale,
    pub target_language: Locale,
    pub content_to_translate: Vec<TranslatableContent>,
}

pub type BulkMachineTranslateResponse = BulkResponse<TranslatableContent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rich_length_is_longest_node() {
        let doc = RichContent::from_paragraphs(["a".repeat(10), "b".repeat(4000)]);
        let item = TranslatableContent::rich("n1", doc);
        assert_eq!(item.measured_length(), 4000);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let item = TranslatableContent::plain_text("n1", "héllo");
        assert_eq!(item.measured_length(), 5);
    }

    #[test]
    fn format_mismatch_is_detected() {
        let mut item = TranslatableContent::plain_text("n1", "x");
        assert!(item.format_matches());
        item.format = Some(ContentFormat::Html);
        assert!(!item.format_matches());
    }

    #[test]
    fn wire_shape() {
        let json = serde_json::to_value(TranslatableContent::html("n1", "<p>Hi</p>")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "n1", "format": "HTML", "html": "<p>Hi</p>"})
        );
    }
}
