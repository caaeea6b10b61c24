use serde_json::json;
use wix_api::types::{
    Content, EmbedPosition, FieldMask, Locale, Revision, SiteEmbed, TranslatableContent,
};
use wix_api::{
    Client, Credentials, CursorPaging, CursorQuery, CursorSearch, Error, Filter, Query,
    TranslationError,
};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client(mock_server: &MockServer) -> Client {
    Client::with_base_url(&mock_server.uri(), Credentials::api_key("test-key", "site-1")).unwrap()
}

#[tokio::test]
async fn query_site_embeds_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("site_embeds_page.json");

    Mock::given(method("POST"))
        .and(path("/embeds/v1/site-embeds/query"))
        .and(header("authorization", "test-key"))
        .and(header("wix-site-id", "site-1"))
        .and(body_json(json!({ "query": { "cursorPaging": { "limit": 2 } } })))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .query_site_embeds(&CursorQuery::default().with_limit(2))
        .await;
    assert!(result.is_ok());

    let resp = result.unwrap();
    assert_eq!(resp.site_embeds.len(), 2);
    assert_eq!(resp.paging_metadata.next_cursor(), Some("Y3Vyc29yLTI"));
}

#[tokio::test]
async fn invalid_query_is_not_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let query = CursorQuery::from_cursor("abc").with_filter(Filter::eq("name", "x"));
    let result = client(&mock_server).query_site_embeds(&query).await;
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[tokio::test]
async fn get_schema_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("schema.json");

    Mock::given(method("GET"))
        .and(path(
            "/translation-schema/v1/schemas/a8b4c0d2-1f3e-4a5b-9c6d-7e8f90a1b2c3",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let schema = client(&mock_server)
        .get_schema("a8b4c0d2-1f3e-4a5b-9c6d-7e8f90a1b2c3")
        .await
        .unwrap();
    assert_eq!(schema.display_name.as_deref(), Some("Blog posts"));
}

#[tokio::test]
async fn list_site_schemas_sends_paging_in_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translation-schema/v1/site-schemas"))
        .and(query_param("paging.limit", "5"))
        .and(query_param("paging.cursor", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemas": [],
            "pagingMetadata": { "count": 0, "cursors": {}, "hasNext": false }
        })))
        .mount(&mock_server)
        .await;

    let paging = CursorPaging {
        limit: Some(5),
        cursor: Some("abc".to_string()),
    };
    let resp = client(&mock_server).list_site_schemas(&paging).await.unwrap();
    assert!(resp.schemas.is_empty());
    assert!(!resp.paging_metadata.has_next);
}

#[tokio::test]
async fn update_site_embed_sends_revision_and_mask() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/embeds/v1/site-embeds/emb-1"))
        .and(body_partial_json(json!({
            "siteEmbed": { "_id": "emb-1", "revision": "3", "enabled": false },
            "fieldMask": { "paths": ["enabled"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "siteEmbed": { "_id": "emb-1", "revision": "4", "enabled": false }
        })))
        .mount(&mock_server)
        .await;

    let embed = SiteEmbed {
        id: Some("emb-1".to_string()),
        revision: Some(Revision(3)),
        enabled: Some(false),
        ..Default::default()
    };
    let updated = client(&mock_server)
        .update_site_embed(&embed, Some(&FieldMask::new(["enabled"])))
        .await
        .unwrap();
    assert_eq!(updated.revision, Some(Revision(4)));
}

#[tokio::test]
async fn update_without_revision_fails_locally() {
    let mock_server = MockServer::start().await;
    let embed = SiteEmbed {
        id: Some("emb-1".to_string()),
        ..Default::default()
    };
    let result = client(&mock_server).update_site_embed(&embed, None).await;
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[tokio::test]
async fn update_content_without_revision_fails_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let content = Content {
        id: Some("cnt-1".to_string()),
        ..Content::new("schema-1", "entity-1", Locale::parse("de").unwrap())
    };
    let result = client(&mock_server).update_content(&content, None).await;
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[tokio::test]
async fn place_site_embed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeds/v1/site-embeds/emb-1/place"))
        .and(body_json(json!({ "position": "BODY_END", "order": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "siteEmbed": { "_id": "emb-1", "position": "BODY_END", "order": 2 }
        })))
        .mount(&mock_server)
        .await;

    let embed = client(&mock_server)
        .place_site_embed("emb-1", EmbedPosition::BodyEnd, Some(2))
        .await
        .unwrap();
    assert_eq!(embed.position, Some(EmbedPosition::BodyEnd));
}

#[tokio::test]
async fn delete_content_with_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/translation-content/v1/contents/c-001"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).delete_content("c-001").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn search_published_content_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("search_published.json");

    Mock::given(method("POST"))
        .and(path(
            "/translation-published-content/v1/published-contents/search",
        ))
        .and(body_partial_json(json!({ "search": { "search": { "expression": "hallo" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let resp = client(&mock_server)
        .search_published_content(&CursorSearch::default().with_search("hallo"))
        .await
        .unwrap();
    assert_eq!(resp.published_contents.len(), 1);
    assert!(resp.aggregation_data.is_some());
}

#[tokio::test]
async fn bulk_machine_translate_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("bulk_translate.json");

    Mock::given(method("POST"))
        .and(path("/machine-translation/v1/bulk-machine-translate"))
        .and(body_partial_json(json!({
            "sourceLanguage": "en",
            "targetLanguage": "de",
            "contentToTranslate": [
                { "id": "n0", "plainText": "Good evening" },
                { "id": "n1", "plainText": "Good morning" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let contents = vec![
        TranslatableContent::plain_text("n0", "Good evening"),
        TranslatableContent::plain_text("n1", "Good morning"),
    ];
    let resp = client(&mock_server)
        .bulk_machine_translate(
            &Locale::parse("en").unwrap(),
            &Locale::parse("de").unwrap(),
            &contents,
        )
        .await
        .unwrap();
    assert_eq!(resp.results.len(), 2);
    assert_eq!(resp.bulk_action_metadata.total_failures, 1);
}

#[tokio::test]
async fn machine_translate_application_error() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("error_text_too_long.json");

    Mock::given(method("POST"))
        .and(path("/machine-translation/v1/machine-translate"))
        .respond_with(ResponseTemplate::new(400).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .machine_translate(
            &Locale::parse("en").unwrap(),
            &Locale::parse("de").unwrap(),
            &TranslatableContent::plain_text("n0", "hello"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    let app = err.application_error().unwrap();
    assert_eq!(
        TranslationError::from_application_error(app),
        TranslationError::TextTooLong {
            max_length: 5000,
            actual_length: 6123
        }
    );
}

#[tokio::test]
async fn server_error_without_wix_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translation-content/v1/contents/c-001"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).get_content("c-001").await.unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn malformed_json_is_request_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translation-content/v1/contents/c-001"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).get_content("c-001").await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}
