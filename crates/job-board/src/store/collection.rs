use chrono::{DateTime, Utc};
use serde::Serialize;

use super::object_id::ObjectId;
use crate::query::{Filter, SortOrder, Window};

/// A record that lives in a named collection.
///
/// Filters and projections operate on the serialized (camelCase) form, so the
/// serde representation of an implementor is its storage schema.
pub trait Document: Serialize + Clone + Send + Sync + 'static {
    /// Human-facing name used in messages ("Job list is empty").
    const KIND: &'static str;

    fn id(&self) -> ObjectId;
    fn created_at(&self) -> DateTime<Utc>;
}

/// Storage abstraction so services can be exercised against any backend.
///
/// Each call is a single-document (or single-filter) operation; nothing here
/// spans more than one call atomically.
///
/// `insert_unique` and `replace_unique` play the part of a unique index: the
/// `key` filter is checked against every other document and the write happens
/// in the same step, failing with [`RepositoryError::Conflict`] on a clash.
pub trait Collection<T: Document>: Send + Sync {
    fn insert(&self, document: T) -> Result<T, RepositoryError>;
    fn insert_unique(&self, document: T, key: &Filter) -> Result<T, RepositoryError>;
    fn replace(&self, document: T) -> Result<T, RepositoryError>;
    fn replace_unique(&self, document: T, key: &Filter) -> Result<T, RepositoryError>;
    fn get(&self, id: &ObjectId) -> Result<Option<T>, RepositoryError>;
    fn find(
        &self,
        filter: &Filter,
        sort: SortOrder,
        window: Window,
    ) -> Result<Vec<T>, RepositoryError>;
    fn count(&self, filter: &Filter) -> Result<u64, RepositoryError>;
    fn delete(&self, id: &ObjectId) -> Result<Option<T>, RepositoryError>;
    fn delete_many(&self, filter: &Filter) -> Result<u64, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("document could not be encoded: {0}")]
    Encoding(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
