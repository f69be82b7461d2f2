//! Parsing of OpenSearch response bodies into shared types.

use flight_search_shared::{SearchDocument, SearchPage};
use serde_json::{Map, Value};

use crate::errors::SearchBackendError;

/// Parse a `_search` response body into a page.
///
/// Hits without an `_id` are rejected, since the key is what paging resumes
/// from. A missing `_source` (e.g. when `_source` filtering excluded every
/// field) yields an empty attribute map.
pub fn parse_search_response(body: &Value) -> Result<SearchPage, SearchBackendError> {
    let hits = body
        .get("hits")
        .ok_or_else(|| SearchBackendError::parse("Search response has no 'hits' section"))?;

    let total_hint = match hits.get("total") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(total) => total.get("value").and_then(|v| v.as_u64()),
        None => None,
    };

    let documents = hits
        .get("hits")
        .and_then(|h| h.as_array())
        .map(|hits| hits.iter().map(parse_hit).collect::<Result<Vec<_>, _>>())
        .transpose()?
        .unwrap_or_default();

    Ok(SearchPage::new(documents, total_hint))
}

/// Parse a `_doc` GET response body into a document.
pub fn parse_get_response(body: &Value) -> Result<Option<SearchDocument>, SearchBackendError> {
    if !body.get("found").and_then(|f| f.as_bool()).unwrap_or(false) {
        return Ok(None);
    }
    parse_hit(body).map(Some)
}

fn parse_hit(hit: &Value) -> Result<SearchDocument, SearchBackendError> {
    let id = hit
        .get("_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| SearchBackendError::parse("Hit is missing '_id'"))?;

    let source = match hit.get("_source") {
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(SearchBackendError::parse(format!(
                "Hit '{}' has a non-object _source: {}",
                id, other
            )))
        }
        None => Map::new(),
    };

    let sort = hit.get("sort").and_then(|s| s.as_array()).cloned();

    Ok(SearchDocument {
        id: id.to_string(),
        source,
        sort,
    })
}
