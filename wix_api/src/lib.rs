mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, Credentials};
pub use self::errors::{
    ApplicationError, Error, TranslationError, NOT_ENOUGH_CREDITS, SAME_LANGUAGE_ARGUMENTS,
    TEXT_TOO_LONG, UNKNOWN_FORMAT,
};
pub use self::query::{
    CursorPaging, CursorQuery, CursorSearch, Filter, Query, QueryCommon, SearchDetails,
    SearchMode, SortOrder, Sorting,
};
