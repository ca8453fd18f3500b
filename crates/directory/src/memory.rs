//! Deterministic in-memory directory.

use crate::{DirectoryError, DirectoryResult, DirectorySearch, RawRecord, SearchScope};
use std::collections::HashMap;

/// A search as it was issued against an [`InMemoryDirectory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedSearch {
    pub base: String,
    pub filter: String,
    pub scope: SearchScope,
}

/// Directory fake that answers searches from canned results keyed by `(base, filter)`.
///
/// Unknown searches return no records, which is what a real directory does for a filter that
/// matches nothing. Every search is recorded so callers can assert on the query sequence.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    results: HashMap<(String, String), Vec<RawRecord>>,
    failures: HashMap<(String, String), String>,
    searches: Vec<RecordedSearch>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the records returned for a `(base, filter)` pair.
    pub fn with_records(
        mut self,
        base: impl Into<String>,
        filter: impl Into<String>,
        records: Vec<RawRecord>,
    ) -> Self {
        self.results.insert((base.into(), filter.into()), records);
        self
    }

    /// Makes a `(base, filter)` pair fail with a query error.
    pub fn with_failure(
        mut self,
        base: impl Into<String>,
        filter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.failures
            .insert((base.into(), filter.into()), reason.into());
        self
    }

    /// Searches issued so far, oldest first.
    pub fn searches(&self) -> &[RecordedSearch] {
        &self.searches
    }
}

impl DirectorySearch for InMemoryDirectory {
    fn search(
        &mut self,
        base: &str,
        filter: &str,
        scope: SearchScope,
    ) -> DirectoryResult<Vec<RawRecord>> {
        self.searches.push(RecordedSearch {
            base: base.to_owned(),
            filter: filter.to_owned(),
            scope,
        });

        let key = (base.to_owned(), filter.to_owned());
        if let Some(reason) = self.failures.get(&key) {
            return Err(DirectoryError::Query {
                base: base.to_owned(),
                filter: filter.to_owned(),
                reason: reason.clone(),
            });
        }

        Ok(self.results.get(&key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "ou=services,o=nhs";

    #[test]
    fn returns_registered_records_and_records_the_search() {
        let record = RawRecord::new("uniqueIdentifier=AS001").with_attribute("nhsIDCode", ["X"]);
        let mut directory =
            InMemoryDirectory::new().with_records(BASE, "(nhsIDCode=X)", vec![record.clone()]);

        let found = directory
            .search(BASE, "(nhsIDCode=X)", SearchScope::Subtree)
            .unwrap();

        assert_eq!(found, vec![record]);
        assert_eq!(
            directory.searches(),
            [RecordedSearch {
                base: BASE.into(),
                filter: "(nhsIDCode=X)".into(),
                scope: SearchScope::Subtree,
            }]
        );
    }

    #[test]
    fn unknown_search_returns_nothing() {
        let mut directory = InMemoryDirectory::new();
        let found = directory
            .search(BASE, "(nhsIDCode=NONE)", SearchScope::Subtree)
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn registered_failure_is_a_query_error() {
        let mut directory = InMemoryDirectory::new().with_failure(BASE, "(broken", "bad filter");
        let err = directory
            .search(BASE, "(broken", SearchScope::Subtree)
            .unwrap_err();
        match err {
            DirectoryError::Query { filter, reason, .. } => {
                assert_eq!(filter, "(broken");
                assert_eq!(reason, "bad filter");
            }
            other => panic!("expected Query error, got {other:?}"),
        }
    }

    #[test]
    fn searches_through_mutable_reference() {
        fn search_once(mut directory: impl DirectorySearch) {
            directory
                .search(BASE, "(nhsIDCode=A)", SearchScope::Subtree)
                .unwrap();
        }

        let mut directory = InMemoryDirectory::new();
        search_once(&mut directory);
        assert_eq!(directory.searches().len(), 1);
    }
}
