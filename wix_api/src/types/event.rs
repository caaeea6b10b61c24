//! Domain events and webhook message envelopes.
//!
//! Entities inside events are carried as JSON strings rather than nested
//! objects, so the envelope shape is the same for every entity type. They
//! are parsed on demand, keyed by `entityFqdn`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::content::Content;
use super::oneof::{exclusive, OneofConflict};
use super::schema::Schema;
use super::site_embed::SiteEmbed;

pub const CONTENT_FQDN: &str = "wix.multilingual.translation.v1.content";
pub const SCHEMA_FQDN: &str = "wix.multilingual.translation.v1.schema";
pub const SITE_EMBED_FQDN: &str = "wix.embeds.v1.site_embed";

/// Notification emitted when an entity is created, updated, deleted or acted on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "DomainEventWire", into = "DomainEventWire")]
pub struct DomainEvent {
    pub id: String,
    /// Fully qualified entity type, e.g. `wix.multilingual.translation.v1.content`.
    pub entity_fqdn: String,
    /// Event name within the entity type, e.g. `created`.
    pub slug: String,
    pub entity_id: String,
    pub event_time: Option<DateTime<Utc>>,
    pub triggered_by_anonymize_request: Option<bool>,
    pub originated_from: Option<String>,
    /// Per-entity counter; strictly increasing across events of one entity.
    pub entity_event_sequence: Option<EventSequence>,
    pub body: Option<EventBody>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    Created(EntityCreatedEvent),
    Updated(EntityUpdatedEvent),
    Deleted(EntityDeletedEvent),
    Action(ActionEvent),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityCreatedEvent {
    #[serde(default)]
    pub entity_as_json: String,
    /// Set when the entity was restored from the trash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_info: Option<RestoreInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestoreInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_date: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityUpdatedEvent {
    #[serde(default)]
    pub current_entity_as_json: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_fields: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityDeletedEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_to_trash: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_entity_as_json: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    #[serde(default)]
    pub body_as_json: String,
}

/// An entity decoded from an event, by entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedEntity {
    Content(Box<Content>),
    Schema(Box<Schema>),
    SiteEmbed(Box<SiteEmbed>),
    /// An entity type this crate does not model, or an action payload.
    Unknown(serde_json::Value),
}

impl DomainEvent {
    /// The entity JSON string carried by this event, if any.
    ///
    /// Action events carry an action payload rather than an entity and
    /// return `None`.
    pub fn entity_json(&self) -> Option<&str> {
        match self.body.as_ref()? {
            EventBody::Created(e) => Some(e.entity_as_json.as_str()),
            EventBody::Updated(e) => Some(e.current_entity_as_json.as_str()),
            EventBody::Deleted(e) => e.deleted_entity_as_json.as_deref(),
            EventBody::Action(_) => None,
        }
        .filter(|s| !s.is_empty())
    }

    /// Parses the carried entity as `T`.
    pub fn entity<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.entity_json().map(serde_json::from_str).transpose()
    }

    /// Parses the action payload of an action event as `T`.
    pub fn action_body<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.body {
            Some(EventBody::Action(a)) if !a.body_as_json.is_empty() => {
                serde_json::from_str(&a.body_as_json).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Parses the carried entity according to `entity_fqdn`.
    pub fn decode(&self) -> Result<Option<DecodedEntity>, serde_json::Error> {
        let json = match self.entity_json() {
            Some(json) => json,
            None => {
                return self
                    .action_body::<serde_json::Value>()
                    .map(|v| v.map(DecodedEntity::Unknown))
            }
        };
        let decoded = match self.entity_fqdn.as_str() {
            CONTENT_FQDN => DecodedEntity::Content(Box::new(serde_json::from_str(json)?)),
            SCHEMA_FQDN => DecodedEntity::Schema(Box::new(serde_json::from_str(json)?)),
            SITE_EMBED_FQDN => DecodedEntity::SiteEmbed(Box::new(serde_json::from_str(json)?)),
            _ => DecodedEntity::Unknown(serde_json::from_str(json)?),
        };
        Ok(Some(decoded))
    }
}

/// The `entityEventSequence` counter.
///
/// Transmitted as a decimal string that may exceed 64 bits; compared
/// numerically.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(transparent)]
pub struct EventSequence(String);

impl EventSequence {
    pub fn new(value: impl Into<String>) -> Self {
        EventSequence(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn digits(&self) -> &str {
        self.0.trim().trim_start_matches('0')
    }

    fn is_numeric(&self) -> bool {
        let s = self.0.trim();
        !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
    }
}

impl Ord for EventSequence {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, true) => {
                let (a, b) = (self.digits(), other.digits());
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            // Non-numeric values sort before numeric ones and among
            // themselves lexicographically.
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialEq for EventSequence {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventSequence {}

impl std::hash::Hash for EventSequence {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.is_numeric() {
            self.digits().hash(state)
        } else {
            self.0.hash(state)
        }
    }
}

impl PartialOrd for EventSequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for EventSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainEventWire {
    #[serde(rename = "_id", alias = "id", default)]
    id: String,
    #[serde(default)]
    entity_fqdn: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    triggered_by_anonymize_request: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    originated_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_event_sequence: Option<EventSequence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_event: Option<EntityCreatedEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_event: Option<EntityUpdatedEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted_event: Option<EntityDeletedEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action_event: Option<ActionEvent>,
}

impl TryFrom<DomainEventWire> for DomainEvent {
    type Error = OneofConflict;

    fn try_from(w: DomainEventWire) -> Result<Self, Self::Error> {
        let body = exclusive(
            "body",
            vec![
                ("createdEvent", w.created_event.map(EventBody::Created)),
                ("updatedEvent", w.updated_event.map(EventBody::Updated)),
                ("deletedEvent", w.deleted_event.map(EventBody::Deleted)),
                ("actionEvent", w.action_event.map(EventBody::Action)),
            ],
        )?;
        Ok(DomainEvent {
            id: w.id,
            entity_fqdn: w.entity_fqdn,
            slug: w.slug,
            entity_id: w.entity_id,
            event_time: w.event_time,
            triggered_by_anonymize_request: w.triggered_by_anonymize_request,
            originated_from: w.originated_from,
            entity_event_sequence: w.entity_event_sequence,
            body,
        })
    }
}

impl From<DomainEvent> for DomainEventWire {
    fn from(e: DomainEvent) -> Self {
        let mut wire = DomainEventWire {
            id: e.id,
            entity_fqdn: e.entity_fqdn,
            slug: e.slug,
            entity_id: e.entity_id,
            event_time: e.event_time,
            triggered_by_anonymize_request: e.triggered_by_anonymize_request,
            originated_from: e.originated_from,
            entity_event_sequence: e.entity_event_sequence,
            created_event: None,
            updated_event: None,
            deleted_event: None,
            action_event: None,
        };
        match e.body {
            Some(EventBody::Created(b)) => wire.created_event = Some(b),
            Some(EventBody::Updated(b)) => wire.updated_event = Some(b),
            Some(EventBody::Deleted(b)) => wire.deleted_event = Some(b),
            Some(EventBody::Action(b)) => wire.action_event = Some(b),
            None => {}
        }
        wire
    }
}

/// A webhook delivery.
///
/// `data` is a JSON string whose shape depends on `event_type`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope {
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentificationData>,
    #[serde(default)]
    pub data: String,
}

impl MessageEnvelope {
    /// Parses `data` as `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.data)
    }

    /// Parses `data` as a domain event.
    pub fn domain_event(&self) -> Result<DomainEvent, serde_json::Error> {
        self.data_as()
    }
}

/// Who triggered a webhook.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "IdentificationDataWire", into = "IdentificationDataWire")]
pub struct IdentificationData {
    pub identity: Option<Identity>,
    pub identity_type: Option<IdentityType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    AnonymousVisitor(String),
    Member(String),
    WixUser(String),
    App(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityType {
    AnonymousVisitor,
    Member,
    WixUser,
    App,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentificationDataWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anonymous_visitor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    member_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wix_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identity_type: Option<IdentityType>,
}

impl TryFrom<IdentificationDataWire> for IdentificationData {
    type Error = OneofConflict;

    fn try_from(w: IdentificationDataWire) -> Result<Self, Self::Error> {
        let identity = exclusive(
            "identity",
            vec![
                (
                    "anonymousVisitorId",
                    w.anonymous_visitor_id.map(Identity::AnonymousVisitor),
                ),
                ("memberId", w.member_id.map(Identity::Member)),
                ("wixUserId", w.wix_user_id.map(Identity::WixUser)),
                ("appId", w.app_id.map(Identity::App)),
            ],
        )?;
        Ok(IdentificationData {
            identity,
            identity_type: w.identity_type,
        })
    }
}

impl From<IdentificationData> for IdentificationDataWire {
    fn from(d: IdentificationData) -> Self {
        let mut wire = IdentificationDataWire {
            anonymous_visitor_id: None,
            member_id: None,
            wix_user_id: None,
            app_id: None,
            identity_type: d.identity_type,
        };
        match d.identity {
            Some(Identity::AnonymousVisitor(id)) => wire.anonymous_visitor_id = Some(id),
            Some(Identity::Member(id)) => wire.member_id = Some(id),
            Some(Identity::WixUser(id)) => wire.wix_user_id = Some(id),
            Some(Identity::App(id)) => wire.app_id = Some(id),
            None => {}
        }
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_compares_numerically() {
        let a = EventSequence::new("9");
        let b = EventSequence::new("10");
        assert!(a < b);
        let big = EventSequence::new("184467440737095516160");
        assert!(big > EventSequence::new("18446744073709551615"));
        assert_eq!(
            EventSequence::new("007").cmp(&EventSequence::new("7")),
            Ordering::Equal
        );
    }

    #[test]
    fn action_events_have_no_entity() {
        let json = r#"{"id": "ev1", "entityFqdn": "wix.embeds.v1.site_embed", "slug": "placed",
            "entityId": "e1", "actionEvent": {"bodyAsJson": "{\"position\":\"HEAD\"}"}}"#;
        let event: DomainEvent = serde_json::from_str(json).unwrap();
        assert!(event.entity_json().is_none());
        let body: serde_json::Value = event.action_body().unwrap().unwrap();
        assert_eq!(body["position"], "HEAD");
        match event.decode().unwrap() {
            Some(DecodedEntity::Unknown(v)) => assert_eq!(v["position"], "HEAD"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn identity_oneof() {
        let json = r#"{"memberId": "m1", "identityType": "MEMBER"}"#;
        let id: IdentificationData = serde_json::from_str(json).unwrap();
        assert_eq!(id.identity, Some(Identity::Member("m1".to_string())));
        let both = r#"{"memberId": "m1", "appId": "a1"}"#;
        assert!(serde_json::from_str::<IdentificationData>(both).is_err());
    }
}
