//! Utility functions for the flight search repository.

use crate::errors::SearchBackendError;

/// Reject empty or whitespace-only values for a required field.
///
/// # Arguments
///
/// * `field_name` - Name used in the error message
/// * `value` - The value to check
///
/// # Returns
///
/// * `Ok(&str)` - The trimmed value
/// * `Err(SearchBackendError::ValidationError)` - If the value is blank
pub fn require_non_empty<'a>(
    field_name: &str,
    value: &'a str,
) -> Result<&'a str, SearchBackendError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SearchBackendError::validation(format!(
            "{} is required",
            field_name
        )));
    }
    Ok(trimmed)
}

/// Split a comma-separated field list, dropping blank entries.
///
/// # Example
///
/// ```
/// use flight_search_repository::utils::parse_field_list;
///
/// assert_eq!(
///     parse_field_list("noseNumber, origin,,destination"),
///     vec!["noseNumber", "origin", "destination"]
/// );
/// ```
pub fn parse_field_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
