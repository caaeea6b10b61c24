mod common;
pub use self::common::{CursorPaging, Query, QueryCommon, SortOrder, Sorting};

mod filter;
pub use self::filter::Filter;

mod cursor;
pub use self::cursor::CursorQuery;

mod search;
pub use self::search::{CursorSearch, SearchDetails, SearchMode};
