//! Result types for search backend operations.

use std::collections::HashSet;

/// Why a pagination run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The backend returned a page with no documents.
    EmptyPage,
    /// The backend returned fewer documents than requested, so no further
    /// page can exist.
    LastPage,
    /// The last key of the newest page did not move past the previous
    /// page's last key. Documents written after the run started may be
    /// missing from the result.
    StalledCursor,
}

impl Termination {
    /// Check if the run ended because the cursor stopped advancing.
    pub fn is_stalled(&self) -> bool {
        matches!(self, Self::StalledCursor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPage => "empty_page",
            Self::LastPage => "last_page",
            Self::StalledCursor => "stalled_cursor",
        }
    }
}

/// Outcome of an exhaustive key collection run.
///
/// The run owns nothing once this is returned; the caller owns the key set.
#[derive(Debug, Clone)]
pub struct CollectedKeys {
    /// Every unique key seen across all fetched pages.
    pub keys: HashSet<String>,
    /// Number of pages requested from the backend.
    pub fetches: usize,
    /// The reason the run stopped.
    pub termination: Termination,
}

impl CollectedKeys {
    /// Number of unique keys collected.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if no keys were collected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The collected keys in ascending order.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
