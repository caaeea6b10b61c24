use serde_json::json;
use wix_lib::types::{Content, DomainEvent, Locale, QueryContentsResponse, TranslatableContent};
use wix_lib::{
    collect_all, Client, Credentials, CursorQuery, EventDeduplicator, Filter, MemorySequenceStore,
    Query, RetryConfig, RetryingClient, SqliteSequenceStore, TranslationError, TranslationService,
    WixError,
};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_CONTENTS: &str = "/translation-content/v1/contents/query";
const BULK_TRANSLATE: &str = "/machine-translation/v1/bulk-machine-translate";
const TRANSLATE: &str = "/machine-translation/v1/machine-translate";

fn retrying_client(mock_server: &MockServer, max_retries: usize) -> RetryingClient {
    let inner = Client::with_base_url(
        &mock_server.uri(),
        Credentials::api_key("test-key", "site-1"),
    )
    .unwrap();
    RetryingClient::with_retry_config(
        inner,
        RetryConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
    )
}

// ============================================================================
// Cursor traversal
// ============================================================================

#[tokio::test]
async fn collect_all_visits_every_item_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_CONTENTS))
        .and(body_json(json!({
            "query": {
                "filter": { "locale": { "$eq": "de" } },
                "cursorPaging": { "limit": 2 }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/contents_page1.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // The continuation carries only the cursor and the page size.
    Mock::given(method("POST"))
        .and(path(QUERY_CONTENTS))
        .and(body_json(json!({
            "query": { "cursorPaging": { "limit": 2, "cursor": "cursor-page-2" } }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/contents_page2.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 0);
    let first = CursorQuery::default()
        .with_filter(Filter::eq("locale", "de"))
        .with_limit(2);
    let contents: Vec<Content> = collect_all(first, |q: CursorQuery| {
        let client = &client;
        async move { client.query_contents(&q).await }
    })
    .await
    .unwrap();

    let ids: Vec<_> = contents.iter().filter_map(|c| c.id.as_deref()).collect();
    assert_eq!(ids, vec!["c-1", "c-2", "c-3"]);
}

#[tokio::test]
async fn empty_result_has_no_next_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_CONTENTS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/contents_empty.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 0);
    let page: QueryContentsResponse = client
        .query_contents(&CursorQuery::default())
        .await
        .unwrap();
    assert!(page.contents.is_empty());
    assert!(!page.paging_metadata.has_next);
    assert_eq!(page.paging_metadata.next_cursor(), None);
}

// ============================================================================
// Retry behaviour
// ============================================================================

#[tokio::test]
async fn reads_are_retried_on_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_CONTENTS))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_CONTENTS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/contents_empty.json")),
        )
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 3);
    let result = client.query_contents(&CursorQuery::default()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn reads_give_up_after_max_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translation-content/v1/contents/c-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 2);
    let err = client.get_content("c-1").await.unwrap_err();
    match err {
        WixError::Api(e) => assert_eq!(e.status(), Some(500)),
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translation-content/v1/contents/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "not found",
            "details": { "applicationError": { "code": "CONTENT_NOT_FOUND", "description": "No content" } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 3);
    assert!(client.get_content("missing").await.is_err());
}

#[tokio::test]
async fn writes_are_sent_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translation-content/v1/contents"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 3);
    let content = Content::new("s-1", "post-1", Locale::parse("de").unwrap());
    assert!(client.create_content(&content).await.is_err());
}

// ============================================================================
// Machine translation
// ============================================================================

#[tokio::test]
async fn bulk_translate_fails_only_oversize_node() {
    let mock_server = MockServer::start().await;

    // Only the two valid nodes are forwarded, re-indexed 0 and 1.
    Mock::given(method("POST"))
        .and(path(BULK_TRANSLATE))
        .and(body_partial_json(json!({
            "sourceLanguage": "en",
            "targetLanguage": "de",
            "contentToTranslate": [
                { "id": "n0", "plainText": "Hello" },
                { "id": "n2", "plainText": "Goodbye" }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/bulk_translate_forwarded.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 0);
    let service = TranslationService::new(&client);
    let contents = vec![
        TranslatableContent::plain_text("n0", "Hello"),
        TranslatableContent::plain_text("n1", &"x".repeat(5001)),
        TranslatableContent::plain_text("n2", "Goodbye"),
    ];
    let resp = service.translate_bulk("en", "de", &contents).await.unwrap();

    assert_eq!(resp.results.len(), 3);
    assert_eq!(resp.bulk_action_metadata.total_successes, 2);
    assert_eq!(resp.bulk_action_metadata.total_failures, 1);
    assert!(resp.is_consistent());

    let failed = resp.result_for_index(1).unwrap();
    assert!(!failed.item_metadata.success);
    assert_eq!(failed.item_metadata.id.as_deref(), Some("n1"));
    let error = failed.item_metadata.error.as_ref().unwrap();
    assert_eq!(error.code, "TEXT_TOO_LONG");
    assert_eq!(error.data, Some(json!({ "maxLength": 5000, "actualLength": 5001 })));

    let last = resp.result_for_index(2).unwrap();
    assert_eq!(last.item.as_ref().unwrap().text(), "Auf Wiedersehen");
    assert_eq!(resp.result_for_index(0).unwrap().item.as_ref().unwrap().text(), "Hallo");
}

#[tokio::test]
async fn bulk_translate_drops_repeated_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BULK_TRANSLATE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/bulk_translate_repeated.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 0);
    let service = TranslationService::new(&client);
    let contents = vec![
        TranslatableContent::plain_text("n0", "Hello"),
        TranslatableContent::plain_text("n1", "World"),
    ];
    let resp = service.translate_bulk("en", "de", &contents).await.unwrap();

    assert_eq!(resp.results.len(), 2);
    assert_eq!(resp.bulk_action_metadata.total_successes, 2);
    assert_eq!(resp.bulk_action_metadata.total_failures, 0);
    assert!(resp.is_consistent());
}

#[tokio::test]
async fn single_translate_with_oversize_text_fails_whole_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRANSLATE))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 0);
    let service = TranslationService::new(&client);
    let content = TranslatableContent::plain_text("n0", &"x".repeat(6000));
    let err = service.translate("en", "de", &content).await.unwrap_err();
    assert_eq!(
        err.translation_error(),
        Some(TranslationError::TextTooLong {
            max_length: 5000,
            actual_length: 6000
        })
    );
}

#[tokio::test]
async fn same_language_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 0);
    let service = TranslationService::new(&client);
    let content = TranslatableContent::plain_text("n0", "Hello");
    let err = service.translate("en", "EN", &content).await.unwrap_err();
    assert_eq!(
        err.translation_error(),
        Some(TranslationError::SameLanguageArguments)
    );
    let err = service
        .translate_bulk("de", "de", std::slice::from_ref(&content))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WixError::Translation(TranslationError::SameLanguageArguments)
    ));
}

#[tokio::test]
async fn service_translation_errors_are_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TRANSLATE))
        .respond_with(ResponseTemplate::new(428).set_body_json(json!({
            "message": "credits",
            "details": { "applicationError": {
                "code": "NOT_ENOUGH_CREDITS",
                "description": "Out of words",
                "data": { "creditsRequired": "40" }
            } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = retrying_client(&mock_server, 3);
    let service = TranslationService::new(&client);
    let err = service
        .translate("en", "fr", &TranslatableContent::plain_text("n0", "Hello"))
        .await
        .unwrap_err();
    assert_eq!(
        err.translation_error(),
        Some(TranslationError::NotEnoughCredits {
            credits_required: Some(40)
        })
    );
}

// ============================================================================
// Domain events
// ============================================================================

fn load_events() -> Vec<DomainEvent> {
    include_str!("fixtures/domain_events.jsonl")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn redelivered_events_are_dropped() {
    let dedup = EventDeduplicator::new(MemorySequenceStore::new());
    let accepted: Vec<String> = load_events()
        .into_iter()
        .filter(|e| dedup.accept(e).unwrap())
        .map(|e| e.id)
        .collect();
    assert_eq!(accepted, vec!["evt-1", "evt-2", "evt-3"]);
}

#[test]
fn sqlite_store_remembers_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("events.db");
    let events = load_events();

    {
        let dedup = EventDeduplicator::new(SqliteSequenceStore::open(&db_path).unwrap());
        assert!(dedup.accept(&events[0]).unwrap());
        assert!(dedup.accept(&events[1]).unwrap());
    }

    let dedup = EventDeduplicator::new(SqliteSequenceStore::open(&db_path).unwrap());
    assert!(!dedup.accept(&events[2]).unwrap());
    assert!(dedup.accept(&events[3]).unwrap());
    assert!(!dedup.accept(&events[4]).unwrap());
    assert_eq!(dedup.store().entity_count().unwrap(), 2);
}
