//! Translation schemas: which fields of an entity type are translatable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::meta::{CursorPage, PagingMetadata, Revision};

pub type SchemaID = String;

/// Describes the translatable fields of one entity type.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SchemaID>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<SchemaKey>,
    /// Translatable fields keyed by field id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, SchemaField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Field whose value names a content item in the translation UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<SchemaID>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    /// Copy existing content when the schema is duplicated to another site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_content: Option<bool>,
}

/// Unique key of a schema: the owning app, the entity type and the scope.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaKey {
    pub app_id: String,
    pub entity_type: String,
    pub scope: SchemaScope,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaScope {
    /// Defined once for every site the app is installed on.
    Global,
    /// Defined for a single site.
    Site,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Hidden fields are stored but not shown in the translation UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    ShortText,
    LongText,
    Html,
    RichContent,
    Image,
    ImageLink,
    Video,
    Document,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FieldType::ShortText => "short-text",
                FieldType::LongText => "long-text",
                FieldType::Html => "html",
                FieldType::RichContent => "rich-content",
                FieldType::Image => "image",
                FieldType::ImageLink => "image-link",
                FieldType::Video => "video",
                FieldType::Document => "document",
                FieldType::Unknown => "unknown",
            }
        )
    }
}

impl Schema {
    /// Field ids whose type carries text that machine translation accepts.
    pub fn text_field_ids(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, f)| {
                matches!(
                    f.field_type,
                    Some(FieldType::ShortText)
                        | Some(FieldType::LongText)
                        | Some(FieldType::Html)
                        | Some(FieldType::RichContent)
                )
            })
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// A page of schemas.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuerySchemasResponse {
    #[serde(default)]
    pub schemas: Vec<Schema>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
}

impl CursorPage for QuerySchemasResponse {
    type Item = Schema;

    fn paging_metadata(&self) -> &PagingMetadata {
        &self.paging_metadata
    }

    fn into_items(self) -> Vec<Schema> {
        self.schemas
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SchemaResponse {
    pub schema: Schema,
}
