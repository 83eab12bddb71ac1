use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::filter::Filter;
use super::options::QueryOptions;
use crate::store::{Collection, Document, RepositoryError};

/// One page of a listing plus the totals needed to navigate it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub result: Vec<Value>,
    pub total_count: u64,
    pub page_count: u64,
    pub current_page: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("{kind} list is empty")]
    Empty { kind: &'static str },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Run a filtered listing: the windowed fetch and the total count both use the
/// same filter, so the count never depends on which page was requested.
///
/// The two reads are independent; a concurrent write between them can make
/// `total_count` disagree with `result`.
pub fn execute<T, C>(
    collection: &C,
    filter: &Filter,
    options: &QueryOptions,
) -> Result<ListingPage, ListingError>
where
    T: Document,
    C: Collection<T> + ?Sized,
{
    let documents = collection.find(filter, options.sort, options.window)?;
    let total_count = collection.count(filter)?;

    debug!(
        kind = T::KIND,
        sort = options.sort.label(),
        skip = options.window.skip,
        returned = documents.len(),
        total_count,
        "listing executed"
    );

    if documents.is_empty() {
        return Err(ListingError::Empty { kind: T::KIND });
    }

    let mut result = Vec::with_capacity(documents.len());
    for document in &documents {
        let encoded = serde_json::to_value(document)
            .map_err(|err| RepositoryError::Encoding(err.to_string()))?;
        result.push(match &options.projection {
            Some(projection) => projection.apply(encoded),
            None => encoded,
        });
    }

    Ok(ListingPage {
        result,
        total_count,
        page_count: options.page_count(total_count),
        current_page: options.page,
    })
}
