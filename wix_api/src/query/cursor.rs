use serde::Serialize;

use crate::Error;

use super::common::{CursorPaging, QueryCommon};
use super::Query;

/// A cursor-paginated collection query: filter, sort and one page.
///
/// The first request states the filter and sort; every following request
/// carries only the cursor of the previous page.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct CursorQuery {
    #[serde(flatten)]
    pub common: QueryCommon,
}

impl CursorQuery {
    /// A continuation request for the page at `cursor`.
    pub fn from_cursor(cursor: &str) -> Self {
        Self {
            common: QueryCommon {
                cursor_paging: CursorPaging {
                    limit: None,
                    cursor: Some(cursor.to_string()),
                },
                ..Default::default()
            },
        }
    }

    /// The request for the page after the one fetched with `self`.
    ///
    /// Keeps the page size and drops filter and sort, which the cursor
    /// already encodes.
    pub fn next_page(&self, cursor: &str) -> Self {
        let mut next = Self::from_cursor(cursor);
        next.common.cursor_paging.limit = self.common.cursor_paging.limit;
        next
    }
}

impl Query for CursorQuery {
    fn to_body(&self) -> Result<serde_json::Value, Error> {
        self.common.validate()?;
        let query = serde_json::to_value(self).map_err(|e| {
            tracing::error!("Failed to serialize query: {}", e);
            Error::RequestFailed
        })?;
        Ok(serde_json::json!({ "query": query }))
    }

    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn common(&self) -> &QueryCommon {
        &self.common
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::query::{CursorQuery, Filter, Query, Sorting};

    #[test]
    fn test_first_page_body() {
        let body = CursorQuery::default()
            .with_filter(Filter::eq("locale", "de"))
            .with_sort(Sorting::desc("_updatedDate"))
            .with_limit(50)
            .to_body()
            .unwrap();

        insta::assert_json_snapshot!(body, @r###"
        {
          "query": {
            "cursorPaging": {
              "limit": 50
            },
            "filter": {
              "locale": {
                "$eq": "de"
              }
            },
            "sort": [
              {
                "fieldName": "_updatedDate",
                "order": "DESC"
              }
            ]
          }
        }
        "###);
    }

    #[test]
    fn test_continuation_carries_only_cursor() {
        let first = CursorQuery::default()
            .with_filter(Filter::eq("locale", "de"))
            .with_limit(20);
        let body = first.next_page("abc").to_body().unwrap();
        assert_eq!(
            body,
            json!({"query": {"cursorPaging": {"limit": 20, "cursor": "abc"}}})
        );
    }

    #[test]
    fn test_cursor_with_filter_fails_fast() {
        let err = CursorQuery::from_cursor("abc")
            .with_filter(Filter::eq("locale", "de"))
            .to_body()
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidArgument { .. }));
        assert!(err.to_string().contains("filter"));
    }

    #[test]
    fn test_zero_limit_is_omitted() {
        let body = CursorQuery::default().with_limit(0).to_body().unwrap();
        assert_eq!(body, json!({"query": {}}));
    }

    #[test]
    fn test_identical_queries_identical_bodies() {
        let build = || {
            CursorQuery::default()
                .with_filter(Filter::is_in("schemaId", ["s1", "s2"]))
                .with_sort(Sorting::asc("entityId"))
        };
        assert_eq!(build().to_body().unwrap(), build().to_body().unwrap());
    }
}
