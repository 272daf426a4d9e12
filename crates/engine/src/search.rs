//! Search-term rules and search-as-you-type sequencing.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::{DisplayRecord, EngineError, PayIdResolver, PayeeBook, PayeeStore, ResultEngine};

/// Queries shorter than this never reach a store.
pub const MIN_SEARCH_LENGTH: usize = 3;
pub const MAX_SEARCH_LENGTH: usize = 100;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trim, drop markup characters and collapse whitespace runs.
///
/// Applied to queries and to the record fields they are matched against.
pub fn strip_markup(text: &str) -> String {
    text.split_whitespace()
        .map(|token| token.replace(['<', '>', '\'', '"'], ""))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`strip_markup`] capped at [`MAX_SEARCH_LENGTH`] characters.
pub fn sanitize_query(query: &str) -> String {
    strip_markup(query).chars().take(MAX_SEARCH_LENGTH).collect()
}

/// Validate a raw query.
///
/// Returns `Ok(None)` when the query is empty or too short to be worth a
/// lookup, and the sanitized query otherwise.
pub fn check_query(query: &str) -> ResultEngine<Option<String>> {
    let sanitized = sanitize_query(query);
    if sanitized.contains(['{', '}', '[', ']']) {
        return Err(EngineError::InvalidSearchTerm(
            "Search term contains invalid characters".to_string(),
        ));
    }
    if sanitized.chars().count() < MIN_SEARCH_LENGTH {
        return Ok(None);
    }
    Ok(Some(sanitized))
}

/// Debounced search where only the latest query is answered.
///
/// Every call takes a ticket from a monotonically increasing sequence. A
/// call superseded during its debounce window never reaches the store, and
/// a response arriving after a newer call was issued is dropped.
#[derive(Debug)]
pub struct LiveSearch {
    debounce: Duration,
    latest: AtomicU64,
}

impl Default for LiveSearch {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl LiveSearch {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            latest: AtomicU64::new(0),
        }
    }

    /// Run `query` once the debounce window has passed.
    ///
    /// `None` means the answer is stale and must not be shown.
    pub async fn query<S, R>(
        &self,
        book: &PayeeBook<S, R>,
        query: &str,
    ) -> Option<ResultEngine<Vec<DisplayRecord>>>
    where
        S: PayeeStore,
        R: PayIdResolver,
    {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if !self.is_latest(ticket) {
            tracing::debug!("search #{ticket} superseded before dispatch");
            return None;
        }

        let result = book.search_payees(query).await;
        if !self.is_latest(ticket) {
            tracing::debug!("dropping stale response for search #{ticket}");
            return None;
        }
        Some(result)
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_markup_and_collapses_spaces() {
        assert_eq!(sanitize_query("  <b>Alice</b>   \"Brown\" "), "bAlice/b Brown");
        assert_eq!(sanitize_query("o'neil"), "oneil");
        assert_eq!(sanitize_query("a\t\tb\nc"), "a b c");
        assert_eq!(sanitize_query(&"x".repeat(150)).len(), MAX_SEARCH_LENGTH);
    }

    #[test]
    fn short_queries_are_empty_not_errors() {
        assert_eq!(check_query("").unwrap(), None);
        assert_eq!(check_query("  Al ").unwrap(), None);
        assert_eq!(check_query("<<>>").unwrap(), None);
        assert_eq!(check_query("Ali").unwrap(), Some("Ali".to_string()));
    }

    #[test]
    fn display_names_with_nickname_are_accepted() {
        assert_eq!(
            check_query("Bob Charlie (Bobby)").unwrap(),
            Some("Bob Charlie (Bobby)".to_string())
        );
    }

    #[test]
    fn bracket_characters_are_rejected() {
        for query in ["{x}", "[abc]", "Bob [Bobby]"] {
            assert_eq!(
                check_query(query),
                Err(EngineError::InvalidSearchTerm(
                    "Search term contains invalid characters".to_string()
                )),
                "{query}"
            );
        }
    }
}
