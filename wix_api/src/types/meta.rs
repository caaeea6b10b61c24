use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Page size the service applies when a request leaves `limit` unset.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Paging information returned with every query and search page.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagingMetadata {
    /// Number of items in this page.
    #[serde(default)]
    pub count: Option<u32>,
    /// Offset of the first item, for offset-paged endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Total matching items. Only returned by search endpoints, on the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Set when `total` was too expensive to compute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub too_many_to_count: Option<bool>,
    #[serde(default)]
    pub cursors: Cursors,
    #[serde(default)]
    pub has_next: bool,
}

impl PagingMetadata {
    /// The cursor for the following page, present only when more results exist.
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.has_next {
            return None;
        }
        self.cursors.next.as_deref().filter(|c| !c.is_empty())
    }

    /// The cursor for the preceding page, if any.
    pub fn prev_cursor(&self) -> Option<&str> {
        self.cursors.prev.as_deref().filter(|c| !c.is_empty())
    }
}

/// Opaque page-boundary tokens.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Cursors {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// A page of results from a cursor-paginated endpoint.
pub trait CursorPage {
    type Item;

    /// Paging metadata of this page.
    fn paging_metadata(&self) -> &PagingMetadata;

    /// Consumes the page, yielding its items in server order.
    fn into_items(self) -> Vec<Self::Item>;
}

/// Optimistic concurrency token. Sent as a decimal string, accepted as either
/// a string or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(pub u64);

impl Serialize for Revision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Revision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Revision(n)),
            Raw::Text(s) => s
                .parse()
                .map(Revision)
                .map_err(|_| de::Error::custom(format!("invalid revision `{}`", s))),
        }
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Explicit list of field paths for a partial update.
///
/// When omitted, the service infers the changed fields from which request
/// fields are present.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FieldMask {
    pub paths: Vec<String>,
}

impl FieldMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}
