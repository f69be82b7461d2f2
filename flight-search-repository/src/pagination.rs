//! Search-after pagination over a key-sorted result set.
//!
//! A run fetches bounded pages sorted ascending by document key and resumes
//! each request strictly after the last key of the previous page. It stops
//! on an empty page, on a short page, or when the last key stops advancing.
//! The last case is accepted as the end of the result set rather than
//! retried: under concurrent writes the run may miss documents, but it
//! always terminates.

use std::collections::HashSet;

use flight_search_shared::{PageQuery, SearchPage};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::MAX_PAGE_SIZE;
use crate::errors::SearchBackendError;
use crate::interfaces::SearchBackend;
use crate::types::{CollectedKeys, Termination};

/// Check a requested page size and cap it at `MAX_PAGE_SIZE`.
fn validate_page_size(page_size: usize) -> Result<usize, SearchBackendError> {
    if page_size == 0 {
        return Err(SearchBackendError::validation(
            "Page size must be greater than zero",
        ));
    }
    if page_size > MAX_PAGE_SIZE {
        debug!(
            requested = page_size,
            max = MAX_PAGE_SIZE,
            "Capping page size"
        );
        return Ok(MAX_PAGE_SIZE);
    }
    Ok(page_size)
}

/// Build the first query of a run: `page_size` documents sorted ascending by key.
///
/// # Returns
///
/// * `Ok(PageQuery)` - The query, with its size capped at `MAX_PAGE_SIZE`
/// * `Err(SearchBackendError::ValidationError)` - If `page_size` is zero
pub fn build_initial_query(
    index: &str,
    filter: Option<Value>,
    page_size: usize,
) -> Result<PageQuery, SearchBackendError> {
    let size = validate_page_size(page_size)?;
    let mut query = PageQuery::new(index, size).sorted_by_key();
    query.filter = filter;
    Ok(query)
}

/// The key of the last document on `page`, or `None` for an empty page.
pub fn extract_last_key(page: &SearchPage) -> Option<&str> {
    page.last().map(|doc| doc.id.as_str())
}

/// Point `query` past the last document of `page`.
///
/// Returns the updated query and the new cursor. When the page is empty the
/// query is returned unchanged with a `None` cursor.
pub fn advance_cursor(mut query: PageQuery, page: &SearchPage) -> (PageQuery, Option<String>) {
    let cursor = extract_last_key(page).map(str::to_string);
    if let Some(ref key) = cursor {
        query.search_after = Some(key.clone());
    }
    (query, cursor)
}

/// Whether the cursor failed to move forward between two consecutive pages.
///
/// A cursor that repeats the previous one (or sorts before it) means the
/// backend is replaying results. The first page has no previous cursor and
/// is never stalled.
pub fn is_stalled(new_cursor: Option<&str>, previous_cursor: Option<&str>) -> bool {
    match (new_cursor, previous_cursor) {
        (Some(new), Some(previous)) => new <= previous,
        _ => false,
    }
}

/// A single-use pagination run over one backend query.
///
/// # Example
///
/// ```ignore
/// let template = PageQuery::new("flights", 1000);
/// let collected = PaginationCursor::new(&provider, template)?
///     .collect_all_keys()
///     .await?;
/// if collected.termination.is_stalled() {
///     // result may be incomplete
/// }
/// ```
pub struct PaginationCursor<'a, B: SearchBackend + ?Sized> {
    backend: &'a B,
    query: PageQuery,
}

impl<'a, B: SearchBackend + ?Sized> PaginationCursor<'a, B> {
    /// Prepare a run from a query template.
    ///
    /// The template's index, filter and source fields are kept. Its sort is
    /// replaced by an ascending key sort, any resume key is cleared, and its
    /// size is validated and capped.
    ///
    /// # Returns
    ///
    /// * `Ok(PaginationCursor)` - Ready to run; no request has been made
    /// * `Err(SearchBackendError::ValidationError)` - If the size is zero
    ///   or the index is blank
    pub fn new(backend: &'a B, template: PageQuery) -> Result<Self, SearchBackendError> {
        crate::utils::require_non_empty("index", &template.index)?;

        let source_fields = template.source_fields;
        let mut query = build_initial_query(&template.index, template.filter, template.size)?;
        query.source_fields = source_fields;

        Ok(Self { backend, query })
    }

    /// The query the next fetch will send.
    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    /// Fetch every page and gather the unique keys.
    ///
    /// Fetches are strictly sequential. A backend error ends the run and is
    /// returned as-is; keys gathered before it are discarded.
    pub async fn collect_all_keys(self) -> Result<CollectedKeys, SearchBackendError> {
        let Self { backend, mut query } = self;
        let mut keys = HashSet::new();
        let mut previous: Option<String> = None;
        let mut fetches = 0;

        let termination = loop {
            let page = backend.search(&query).await.inspect_err(|e| {
                warn!(
                    index = %query.index,
                    fetches,
                    collected = keys.len(),
                    error = %e,
                    "Pagination aborted"
                );
            })?;
            fetches += 1;

            keys.extend(page.ids().map(str::to_string));

            if page.is_empty() {
                break Termination::EmptyPage;
            }

            let (next_query, cursor) = advance_cursor(query, &page);

            if is_stalled(cursor.as_deref(), previous.as_deref()) {
                warn!(
                    index = %next_query.index,
                    cursor = ?cursor,
                    fetches,
                    "Pagination cursor did not advance, stopping"
                );
                break Termination::StalledCursor;
            }

            if page.len() < next_query.size {
                break Termination::LastPage;
            }

            debug!(
                index = %next_query.index,
                cursor = ?cursor,
                fetches,
                collected = keys.len(),
                "Advancing pagination cursor"
            );

            query = next_query;
            previous = cursor;
        };

        debug!(
            fetches,
            collected = keys.len(),
            termination = ?termination,
            "Pagination finished"
        );

        Ok(CollectedKeys {
            keys,
            fetches,
            termination,
        })
    }
}
