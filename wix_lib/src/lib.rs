//! Library layer for the Wix REST client: retrying reads, cursor traversal,
//! validated machine translation, and domain-event de-duplication.
//!
//! Wraps the `wix_api` crate, which maps each operation to one HTTP request.

pub mod client;
pub mod db;
pub mod error;
pub mod events;
pub mod pagination;
pub mod translation;
pub mod validation;

pub use wix_api;
pub use wix_api::types;
pub use wix_api::{
    Client, Credentials, CursorPaging, CursorQuery, CursorSearch, Filter, Query, SearchMode,
    SortOrder, Sorting, TranslationError,
};

pub use client::{RetryConfig, RetryingClient};
pub use db::{SqliteSequenceStore, StoreError};
pub use error::WixError;
pub use events::{EventDeduplicator, MemorySequenceStore, SequenceStore};
pub use pagination::{collect_all, PagedRequest, Pager};
pub use translation::TranslationService;
