//! Site embeds: custom code injected into every page of a site.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::meta::{CursorPage, PagingMetadata, Revision};
use super::oneof::{exclusive, OneofConflict};

/// Identifier of a site embed.
pub type SiteEmbedID = String;

/// A snippet of code injected into the site's pages.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(try_from = "SiteEmbedWire", into = "SiteEmbedWire")]
pub struct SiteEmbed {
    /// Server-assigned identifier.
    pub id: Option<SiteEmbedID>,
    /// Must match the server's current value on update.
    pub revision: Option<Revision>,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
    /// Load the embed once per visit rather than on every page navigation.
    pub load_once: Option<bool>,
    pub position: Option<EmbedPosition>,
    /// Ordering among embeds sharing a position. Lower loads first.
    pub order: Option<i32>,
    pub content: Option<SiteEmbedContent>,
}

/// The code an embed injects.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteEmbedContent {
    CustomHtml(CustomHtmlOptions),
    Script(ScriptOptions),
    TrackingPixel(TrackingPixelOptions),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CustomHtmlOptions {
    pub html: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ScriptOptions {
    pub src: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TrackingPixelOptions {
    pub url: String,
}

/// Where in the page the embed is injected.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmbedPosition {
    Head,
    BodyStart,
    BodyEnd,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for EmbedPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EmbedPosition::Head => "head",
                EmbedPosition::BodyStart => "body-start",
                EmbedPosition::BodyEnd => "body-end",
                EmbedPosition::Unknown => "unknown",
            }
        )
    }
}

impl SiteEmbed {
    pub fn custom_html(name: &str, html: &str, position: EmbedPosition) -> Self {
        Self {
            name: Some(name.to_string()),
            enabled: Some(true),
            position: Some(position),
            content: Some(SiteEmbedContent::CustomHtml(CustomHtmlOptions {
                html: html.to_string(),
            })),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteEmbedWire {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision: Option<Revision>,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    updated_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load_once: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<EmbedPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_html_options: Option<CustomHtmlOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    script_options: Option<ScriptOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tracking_pixel_options: Option<TrackingPixelOptions>,
}

impl TryFrom<SiteEmbedWire> for SiteEmbed {
    type Error = OneofConflict;

    fn try_from(w: SiteEmbedWire) -> Result<Self, Self::Error> {
        let content = exclusive(
            "content",
            vec![
                (
                    "customHtmlOptions",
                    w.custom_html_options.map(SiteEmbedContent::CustomHtml),
                ),
                ("scriptOptions", w.script_options.map(SiteEmbedContent::Script)),
                (
                    "trackingPixelOptions",
                    w.tracking_pixel_options
                        .map(SiteEmbedContent::TrackingPixel),
                ),
            ],
        )?;
        Ok(SiteEmbed {
            id: w.id,
            revision: w.revision,
            created_date: w.created_date,
            updated_date: w.updated_date,
            name: w.name,
            enabled: w.enabled,
            load_once: w.load_once,
            position: w.position,
            order: w.order,
            content,
        })
    }
}

impl From<SiteEmbed> for SiteEmbedWire {
    fn from(e: SiteEmbed) -> Self {
        let mut wire = SiteEmbedWire {
            id: e.id,
            revision: e.revision,
            created_date: e.created_date,
            updated_date: e.updated_date,
            name: e.name,
            enabled: e.enabled,
            load_once: e.load_once,
            position: e.position,
            order: e.order,
            custom_html_options: None,
            script_options: None,
            tracking_pixel_options: None,
        };
        match e.content {
            Some(SiteEmbedContent::CustomHtml(o)) => wire.custom_html_options = Some(o),
            Some(SiteEmbedContent::Script(o)) => wire.script_options = Some(o),
            Some(SiteEmbedContent::TrackingPixel(o)) => wire.tracking_pixel_options = Some(o),
            None => {}
        }
        wire
    }
}

/// A page of site embeds.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuerySiteEmbedsResponse {
    #[serde(default)]
    pub site_embeds: Vec<SiteEmbed>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
}

impl CursorPage for QuerySiteEmbedsResponse {
    type Item = SiteEmbed;

    fn paging_metadata(&self) -> &PagingMetadata {
        &self.paging_metadata
    }

    fn into_items(self) -> Vec<SiteEmbed> {
        self.site_embeds
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SiteEmbedResponse {
    pub site_embed: SiteEmbed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_flattens_to_one_field() {
        let embed = SiteEmbed::custom_html("Chat", "<script></script>", EmbedPosition::BodyEnd);
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json["customHtmlOptions"]["html"], "<script></script>");
        assert_eq!(json["position"], "BODY_END");
        assert!(json.get("scriptOptions").is_none());
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn two_content_variants_are_rejected() {
        let json = r#"{
            "_id": "e1",
            "customHtmlOptions": {"html": "<b>"},
            "trackingPixelOptions": {"url": "https://px"}
        }"#;
        let err = serde_json::from_str::<SiteEmbed>(json).unwrap_err();
        assert!(err.to_string().contains("customHtmlOptions"));
    }

    #[test]
    fn absent_content_is_none() {
        let embed: SiteEmbed = serde_json::from_str(r#"{"_id": "e1", "revision": "3"}"#).unwrap();
        assert_eq!(embed.id.as_deref(), Some("e1"));
        assert_eq!(embed.revision, Some(Revision(3)));
        assert!(embed.content.is_none());
    }
}
