use serde_json::json;
use wix_api::types::{Aggregation, RangeBucket, ScalarType};
use wix_api::{CursorQuery, CursorSearch, Error, Filter, Query, SearchMode, SortOrder, Sorting};

#[test]
fn empty_query_has_empty_body() {
    let body = CursorQuery::default().to_body().unwrap();
    assert_eq!(body, json!({ "query": {} }));
}

#[test]
fn query_with_filter_sort_and_limit() {
    let body = CursorQuery::default()
        .with_filter(Filter::and(vec![
            Filter::eq("schemaId", "s-1"),
            Filter::is_in("locale", ["de", "fr"]),
        ]))
        .with_sort(Sorting::asc("entityId"))
        .with_sort(Sorting::new("_createdDate", SortOrder::Desc))
        .with_limit(20)
        .to_body()
        .unwrap();

    assert_eq!(
        body["query"]["filter"],
        json!({"$and": [{"schemaId": {"$eq": "s-1"}}, {"locale": {"$in": ["de", "fr"]}}]})
    );
    assert_eq!(body["query"]["sort"][0]["fieldName"], "entityId");
    assert_eq!(body["query"]["sort"][0]["order"], "ASC");
    assert_eq!(body["query"]["sort"][1]["order"], "DESC");
    assert_eq!(body["query"]["cursorPaging"], json!({ "limit": 20 }));
}

#[test]
fn continuation_keeps_limit_and_drops_filter() {
    let first = CursorQuery::default()
        .with_filter(Filter::eq("locale", "de"))
        .with_limit(10);
    let body = first.next_page("abc").to_body().unwrap();
    assert_eq!(
        body,
        json!({ "query": { "cursorPaging": { "limit": 10, "cursor": "abc" } } })
    );
}

#[test]
fn cursor_with_sort_fails_fast() {
    let err = CursorQuery::from_cursor("abc")
        .with_sort(Sorting::asc("name"))
        .to_body()
        .unwrap_err();
    match err {
        Error::InvalidArgument { message } => {
            assert!(message.contains("sort"));
            assert!(!message.contains("filter"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn zero_limit_is_left_unset() {
    let query = CursorQuery::default().with_limit(0);
    assert_eq!(query.common.cursor_paging.limit, None);
    assert_eq!(query.common.cursor_paging.effective_limit(), 100);
}

#[test]
fn search_body_with_aggregations() {
    let body = CursorSearch::default()
        .with_search("hallo")
        .with_search_fields(&["fields.title.textValue"])
        .with_search_mode(SearchMode::And)
        .with_fuzzy(true)
        .with_aggregation(Aggregation::value("by-locale", "locale"))
        .with_aggregation(Aggregation::scalar(
            "distinct-entities",
            "entityId",
            ScalarType::CountDistinct,
        ))
        .with_aggregation(Aggregation::range(
            "length",
            "textLength",
            vec![
                RangeBucket {
                    from: None,
                    to: Some(100.0),
                },
                RangeBucket {
                    from: Some(100.0),
                    to: None,
                },
            ],
        ))
        .with_limit(5)
        .to_body()
        .unwrap();

    let search = &body["search"];
    assert_eq!(search["search"]["expression"], "hallo");
    assert_eq!(search["search"]["mode"], "AND");
    assert_eq!(search["search"]["fuzzy"], true);
    assert_eq!(search["aggregations"].as_array().unwrap().len(), 3);
    assert_eq!(search["aggregations"][0]["type"], "VALUE");
    assert_eq!(search["aggregations"][1]["scalar"]["type"], "COUNT_DISTINCT");
    assert_eq!(search["aggregations"][2]["range"]["buckets"][0]["to"], 100.0);
    assert_eq!(search["cursorPaging"]["limit"], 5);
}

#[test]
fn search_continuation_rejects_new_expression() {
    let err = CursorSearch::default()
        .with_search("hallo")
        .with_cursor("next")
        .to_body()
        .unwrap_err();
    assert!(err.to_string().contains("search"));

    let next = CursorSearch::default()
        .with_search("hallo")
        .with_limit(5)
        .next_page("next")
        .to_body()
        .unwrap();
    assert_eq!(
        next,
        json!({ "search": { "cursorPaging": { "limit": 5, "cursor": "next" } } })
    );
}
