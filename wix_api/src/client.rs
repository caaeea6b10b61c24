//! HTTP client for the Wix REST APIs.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::{
    errors::ErrorBody,
    query::{CursorPaging, CursorQuery, CursorSearch, Query},
    types::{
        BulkMachineTranslateRequest, BulkMachineTranslateResponse, BulkResponse, Content,
        ContentResponse, EmbedPosition, FieldMask, Locale, MachineTranslateRequest,
        MachineTranslateResponse, MaskedContent, QueryContentsResponse,
        QueryPublishedContentResponse, QuerySchemasResponse, QuerySiteEmbedsResponse, Schema,
        SchemaResponse, SearchPublishedContentResponse, SiteEmbed, SiteEmbedResponse,
        TranslatableContent,
    },
    Error,
};

/// Request timeout for every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SITE_EMBEDS: &str = "/embeds/v1/site-embeds";
const SCHEMAS: &str = "/translation-schema/v1/schemas";
const SITE_SCHEMAS: &str = "/translation-schema/v1/site-schemas";
const CONTENTS: &str = "/translation-content/v1/contents";
const BULK_CONTENTS: &str = "/translation-content/v1/bulk/contents";
const PUBLISHED_CONTENTS: &str = "/translation-published-content/v1/published-contents";
const MACHINE_TRANSLATION: &str = "/machine-translation/v1";

/// Authorization for Wix API calls.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    /// API key or OAuth access token, sent as the `Authorization` header.
    pub authorization: String,
    /// Site the call acts on, sent as `wix-site-id`.
    pub site_id: Option<String>,
    /// Account the call acts on, sent as `wix-account-id`.
    pub account_id: Option<String>,
}

impl Credentials {
    /// Credentials for an API key scoped to one site.
    pub fn api_key(key: &str, site_id: &str) -> Self {
        Self {
            authorization: key.to_string(),
            site_id: Some(site_id.to_string()),
            account_id: None,
        }
    }
}

/// HTTP client for the Wix REST APIs.
///
/// Every operation maps to exactly one HTTP request. Retrying is left to the
/// caller, since only the read operations are safe to repeat.
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API. Defaults to `https://www.wixapis.com`.
    base_api_url: String,
    credentials: Credentials,
}

#[derive(Deserialize)]
struct Empty {}

impl Client {
    /// Creates a new client pointing at the production Wix API.
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        Self::with_base_url("https://www.wixapis.com", credentials)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, credentials: Credentials) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            http,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn get_url(&self, path: &str, segments: &[&str]) -> Result<Url, Error> {
        let mut url =
            Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::RequestFailed
            })?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| {
                    tracing::error!("Base URL cannot have path segments: {}", self.base_api_url);
                    Error::RequestFailed
                })?
                .extend(segments);
        }
        Ok(url)
    }

    async fn send<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!("{} {}", method, url);
        let mut request = self
            .http
            .request(method, url)
            .header("authorization", self.credentials.authorization.as_str())
            .header("accept", "application/json");
        if let Some(site_id) = &self.credentials.site_id {
            request = request.header("wix-site-id", site_id.as_str());
        }
        if let Some(account_id) = &self.credentials.account_id {
            request = request.header("wix-account-id", account_id.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to send request: {}", e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            let application_error = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_application_error);
            return Err(match application_error {
                Some(error) => Error::Api {
                    status: status.as_u16(),
                    error,
                },
                None => Error::HttpStatus {
                    status: status.as_u16(),
                    body: snippet,
                },
            });
        }

        let text = if body.trim().is_empty() { "{}" } else { &body };
        let parsed = serde_json::from_str::<T>(text).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        Ok(parsed)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        self.send::<T, ()>(Method::GET, url, None).await
    }

    async fn post<T, B>(&self, url: Url, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, url, Some(body)).await
    }

    async fn query<T: DeserializeOwned, Q: Query>(&self, path: &str, query: &Q) -> Result<T, Error> {
        let body = query.to_body()?;
        let url = self.get_url(path, &["query"])?;
        self.post(url, &body).await
    }

    // ---------------------------------------------------------------------
    // Site embeds
    // ---------------------------------------------------------------------

    /// Creates a site embed.
    pub async fn create_site_embed(&self, site_embed: &SiteEmbed) -> Result<SiteEmbed, Error> {
        let url = self.get_url(SITE_EMBEDS, &[])?;
        self.post::<SiteEmbedResponse, _>(url, &json!({ "siteEmbed": site_embed }))
            .await
            .map(|r| r.site_embed)
    }

    /// Fetches a site embed by ID.
    pub async fn get_site_embed(&self, site_embed_id: &str) -> Result<SiteEmbed, Error> {
        let url = self.get_url(SITE_EMBEDS, &[site_embed_id])?;
        self.get::<SiteEmbedResponse>(url)
            .await
            .map(|r| r.site_embed)
    }

    /// Updates a site embed. The embed's `revision` must match the server's.
    pub async fn update_site_embed(
        &self,
        site_embed: &SiteEmbed,
        field_mask: Option<&FieldMask>,
    ) -> Result<SiteEmbed, Error> {
        let id = required_id(site_embed.id.as_deref(), "siteEmbed.id")?;
        if site_embed.revision.is_none() {
            return Err(Error::invalid_argument("siteEmbed.revision is required"));
        }
        let url = self.get_url(SITE_EMBEDS, &[id])?;
        let body = with_field_mask(json!({ "siteEmbed": site_embed }), field_mask);
        self.send::<SiteEmbedResponse, _>(Method::PATCH, url, Some(&body))
            .await
            .map(|r| r.site_embed)
    }

    /// Deletes a site embed.
    pub async fn delete_site_embed(&self, site_embed_id: &str) -> Result<(), Error> {
        let url = self.get_url(SITE_EMBEDS, &[site_embed_id])?;
        self.send::<Empty, ()>(Method::DELETE, url, None)
            .await
            .map(|_| ())
    }

    /// Fetches a page of site embeds.
    pub async fn query_site_embeds(
        &self,
        query: &CursorQuery,
    ) -> Result<QuerySiteEmbedsResponse, Error> {
        self.query(SITE_EMBEDS, query).await
    }

    /// Places an embed at a position of the page, optionally at a given order.
    pub async fn place_site_embed(
        &self,
        site_embed_id: &str,
        position: EmbedPosition,
        order: Option<i32>,
    ) -> Result<SiteEmbed, Error> {
        let url = self.get_url(SITE_EMBEDS, &[site_embed_id, "place"])?;
        let mut body = json!({ "position": position });
        if let Some(order) = order {
            body["order"] = json!(order);
        }
        self.post::<SiteEmbedResponse, _>(url, &body)
            .await
            .map(|r| r.site_embed)
    }

    /// Removes an embed from the page without deleting it.
    pub async fn remove_site_embed_placement(
        &self,
        site_embed_id: &str,
    ) -> Result<SiteEmbed, Error> {
        let url = self.get_url(SITE_EMBEDS, &[site_embed_id, "remove-placement"])?;
        self.post::<SiteEmbedResponse, _>(url, &json!({}))
            .await
            .map(|r| r.site_embed)
    }

    // ---------------------------------------------------------------------
    // Translation schemas
    // ---------------------------------------------------------------------

    /// Creates a translation schema.
    pub async fn create_schema(&self, schema: &Schema) -> Result<Schema, Error> {
        let url = self.get_url(SCHEMAS, &[])?;
        self.post::<SchemaResponse, _>(url, &json!({ "schema": schema }))
            .await
            .map(|r| r.schema)
    }

    /// Fetches a translation schema by ID.
    pub async fn get_schema(&self, schema_id: &str) -> Result<Schema, Error> {
        let url = self.get_url(SCHEMAS, &[schema_id])?;
        self.get::<SchemaResponse>(url).await.map(|r| r.schema)
    }

    /// Updates a translation schema. The schema's `revision` must match the server's.
    pub async fn update_schema(&self, schema: &Schema) -> Result<Schema, Error> {
        let id = required_id(schema.id.as_deref(), "schema.id")?;
        if schema.revision.is_none() {
            return Err(Error::invalid_argument("schema.revision is required"));
        }
        let url = self.get_url(SCHEMAS, &[id])?;
        self.send::<SchemaResponse, _>(Method::PATCH, url, Some(&json!({ "schema": schema })))
            .await
            .map(|r| r.schema)
    }

    /// Deletes a translation schema.
    pub async fn delete_schema(&self, schema_id: &str) -> Result<(), Error> {
        let url = self.get_url(SCHEMAS, &[schema_id])?;
        self.send::<Empty, ()>(Method::DELETE, url, None)
            .await
            .map(|_| ())
    }

    /// Fetches a page of translation schemas.
    pub async fn query_schemas(&self, query: &CursorQuery) -> Result<QuerySchemasResponse, Error> {
        self.query(SCHEMAS, query).await
    }

    /// Lists the schemas defined for the current site.
    pub async fn list_site_schemas(
        &self,
        paging: &CursorPaging,
    ) -> Result<QuerySchemasResponse, Error> {
        let url = paging.add_to_url(&self.get_url(SITE_SCHEMAS, &[])?);
        self.get(url).await
    }

    // ---------------------------------------------------------------------
    // Translation content
    // ---------------------------------------------------------------------

    /// Creates translation content.
    pub async fn create_content(&self, content: &Content) -> Result<Content, Error> {
        let url = self.get_url(CONTENTS, &[])?;
        self.post::<ContentResponse, _>(url, &json!({ "content": content }))
            .await
            .map(|r| r.content)
    }

    /// Fetches translation content by ID.
    pub async fn get_content(&self, content_id: &str) -> Result<Content, Error> {
        let url = self.get_url(CONTENTS, &[content_id])?;
        self.get::<ContentResponse>(url).await.map(|r| r.content)
    }

    /// Updates translation content. The content's `revision` must match the
    /// server's.
    ///
    /// Without a field mask the service updates the fields present in `content`.
    pub async fn update_content(
        &self,
        content: &Content,
        field_mask: Option<&FieldMask>,
    ) -> Result<Content, Error> {
        let id = required_id(content.id.as_deref(), "content.id")?;
        if content.revision.is_none() {
            return Err(Error::invalid_argument("content.revision is required"));
        }
        let url = self.get_url(CONTENTS, &[id])?;
        let body = with_field_mask(json!({ "content": content }), field_mask);
        self.send::<ContentResponse, _>(Method::PATCH, url, Some(&body))
            .await
            .map(|r| r.content)
    }

    /// Deletes translation content.
    pub async fn delete_content(&self, content_id: &str) -> Result<(), Error> {
        let url = self.get_url(CONTENTS, &[content_id])?;
        self.send::<Empty, ()>(Method::DELETE, url, None)
            .await
            .map(|_| ())
    }

    /// Fetches a page of translation content.
    pub async fn query_contents(&self, query: &CursorQuery) -> Result<QueryContentsResponse, Error> {
        self.query(CONTENTS, query).await
    }

    /// Creates several content items, each succeeding or failing independently.
    pub async fn bulk_create_content(
        &self,
        contents: &[Content],
        return_entity: bool,
    ) -> Result<BulkResponse<Content>, Error> {
        let url = self.get_url(BULK_CONTENTS, &["create"])?;
        let body = json!({ "contents": contents, "returnEntity": return_entity });
        self.post(url, &body).await
    }

    /// Updates several content items, each succeeding or failing independently.
    pub async fn bulk_update_content(
        &self,
        contents: &[MaskedContent],
        return_entity: bool,
    ) -> Result<BulkResponse<Content>, Error> {
        let url = self.get_url(BULK_CONTENTS, &["update"])?;
        let body = json!({ "contents": contents, "returnEntity": return_entity });
        self.post(url, &body).await
    }

    /// Creates or updates several content items, matched on schema, entity
    /// and locale.
    pub async fn bulk_upsert_content(
        &self,
        contents: &[Content],
        return_entity: bool,
    ) -> Result<BulkResponse<Content>, Error> {
        let url = self.get_url(BULK_CONTENTS, &["upsert"])?;
        let body = json!({ "contents": contents, "returnEntity": return_entity });
        self.post(url, &body).await
    }

    /// Deletes several content items, each succeeding or failing independently.
    pub async fn bulk_delete_content(
        &self,
        content_ids: &[String],
    ) -> Result<BulkResponse<Content>, Error> {
        let url = self.get_url(BULK_CONTENTS, &["delete"])?;
        self.post(url, &json!({ "contentIds": content_ids })).await
    }

    // ---------------------------------------------------------------------
    // Published content
    // ---------------------------------------------------------------------

    /// Fetches a page of published content.
    pub async fn query_published_content(
        &self,
        query: &CursorQuery,
    ) -> Result<QueryPublishedContentResponse, Error> {
        self.query(PUBLISHED_CONTENTS, query).await
    }

    /// Searches published content, optionally with aggregations.
    pub async fn search_published_content(
        &self,
        search: &CursorSearch,
    ) -> Result<SearchPublishedContentResponse, Error> {
        let body = search.to_body()?;
        let url = self.get_url(PUBLISHED_CONTENTS, &["search"])?;
        self.post(url, &body).await
    }

    // ---------------------------------------------------------------------
    // Machine translation
    // ---------------------------------------------------------------------

    /// Translates one content node. Fails as a whole if the node is rejected.
    pub async fn machine_translate(
        &self,
        source_language: &Locale,
        target_language: &Locale,
        content: &TranslatableContent,
    ) -> Result<TranslatableContent, Error> {
        let url = self.get_url(MACHINE_TRANSLATION, &["machine-translate"])?;
        let body = MachineTranslateRequest {
            source_language: source_language.clone(),
            target_language: target_language.clone(),
            content_to_translate: content.clone(),
        };
        self.post::<MachineTranslateResponse, _>(url, &body)
            .await
            .map(|r| r.translated_content)
    }

    /// Translates several content nodes, each succeeding or failing independently.
    pub async fn bulk_machine_translate(
        &self,
        source_language: &Locale,
        target_language: &Locale,
        contents: &[TranslatableContent],
    ) -> Result<BulkMachineTranslateResponse, Error> {
        let url = self.get_url(MACHINE_TRANSLATION, &["bulk-machine-translate"])?;
        let body = BulkMachineTranslateRequest {
            source_language: source_language.clone(),
            target_language: target_language.clone(),
            content_to_translate: contents.to_vec(),
        };
        self.post(url, &body).await
    }
}

fn required_id<'a>(id: Option<&'a str>, field: &str) -> Result<&'a str, Error> {
    id.filter(|id| !id.is_empty())
        .ok_or_else(|| Error::invalid_argument(format!("{} is required", field)))
}

fn with_field_mask(mut body: serde_json::Value, field_mask: Option<&FieldMask>) -> serde_json::Value {
    if let Some(mask) = field_mask {
        body["fieldMask"] = json!(mask);
    }
    body
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
