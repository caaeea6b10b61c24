//! Translated content of an entity, and its published counterpart.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregation::AggregationData;
use super::locale::Locale;
use super::meta::{CursorPage, FieldMask, PagingMetadata, Revision};
use super::oneof::{exclusive, OneofConflict};
use super::rich_content::RichContent;

pub type ContentID = String;

/// Translations of one entity into one locale.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ContentID>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    /// Identifier of the translated entity in the owning app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    /// Whether every field of this content is published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_content: Option<bool>,
    /// Translated values keyed by schema field id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, ContentField>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub preview_fields: BTreeMap<String, ContentField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
}

impl Content {
    pub fn new(schema_id: &str, entity_id: &str, locale: Locale) -> Self {
        Self {
            schema_id: Some(schema_id.to_string()),
            entity_id: Some(entity_id.to_string()),
            locale: Some(locale),
            ..Default::default()
        }
    }

    /// Adds or replaces a field value.
    pub fn with_field(mut self, field_id: &str, value: FieldValue) -> Self {
        self.fields.insert(
            field_id.to_string(),
            ContentField {
                id: Some(field_id.to_string()),
                value: Some(value),
                ..Default::default()
            },
        );
        self
    }

    /// Text of a text-valued field.
    pub fn text(&self, field_id: &str) -> Option<&str> {
        match self.fields.get(field_id)?.value.as_ref()? {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A single translated field.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(try_from = "ContentFieldWire", into = "ContentFieldWire")]
pub struct ContentField {
    pub id: Option<String>,
    pub published: Option<bool>,
    pub updated_by: Option<UpdatedBy>,
    pub value: Option<FieldValue>,
}

/// The value of a translated field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    RichContent(RichContent),
    Image(Image),
    Video(Video),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Image>,
}

/// Who last wrote a field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdatedBy {
    User,
    Machine,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentFieldWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_by: Option<UpdatedBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rich_content: Option<RichContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video: Option<Video>,
}

impl TryFrom<ContentFieldWire> for ContentField {
    type Error = OneofConflict;

    fn try_from(w: ContentFieldWire) -> Result<Self, Self::Error> {
        let value = exclusive(
            "value",
            vec![
                ("textValue", w.text_value.map(FieldValue::Text)),
                ("richContent", w.rich_content.map(FieldValue::RichContent)),
                ("image", w.image.map(FieldValue::Image)),
                ("video", w.video.map(FieldValue::Video)),
            ],
        )?;
        Ok(ContentField {
            id: w.id,
            published: w.published,
            updated_by: w.updated_by,
            value,
        })
    }
}

impl From<ContentField> for ContentFieldWire {
    fn from(f: ContentField) -> Self {
        let mut wire = ContentFieldWire {
            id: f.id,
            published: f.published,
            updated_by: f.updated_by,
            text_value: None,
            rich_content: None,
            image: None,
            video: None,
        };
        match f.value {
            Some(FieldValue::Text(v)) => wire.text_value = Some(v),
            Some(FieldValue::RichContent(v)) => wire.rich_content = Some(v),
            Some(FieldValue::Image(v)) => wire.image = Some(v),
            Some(FieldValue::Video(v)) => wire.video = Some(v),
            None => {}
        }
        wire
    }
}

/// A page of translation content.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QueryContentsResponse {
    #[serde(default)]
    pub contents: Vec<Content>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
}

impl CursorPage for QueryContentsResponse {
    type Item = Content;

    fn paging_metadata(&self) -> &PagingMetadata {
        &self.paging_metadata
    }

    fn into_items(self) -> Vec<Content> {
        self.contents
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ContentResponse {
    pub content: Content,
}

/// One item of a bulk content update.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MaskedContent {
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_mask: Option<FieldMask>,
}

/// Content as visible on the live site: only published fields.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublishedContent {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, ContentField>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QueryPublishedContentResponse {
    #[serde(default)]
    pub published_contents: Vec<PublishedContent>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
}

impl CursorPage for QueryPublishedContentResponse {
    type Item = PublishedContent;

    fn paging_metadata(&self) -> &PagingMetadata {
        &self.paging_metadata
    }

    fn into_items(self) -> Vec<PublishedContent> {
        self.published_contents
    }
}

/// A page of published content plus the aggregations requested by the search.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchPublishedContentResponse {
    #[serde(default)]
    pub published_contents: Vec<PublishedContent>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_data: Option<AggregationData>,
}

impl CursorPage for SearchPublishedContentResponse {
    type Item = PublishedContent;

    fn paging_metadata(&self) -> &PagingMetadata {
        &self.paging_metadata
    }

    fn into_items(self) -> Vec<PublishedContent> {
        self.published_contents
    }
}
