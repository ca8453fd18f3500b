//! # SDS Directory
//!
//! Read-only search access to the Spine Directory Service (an LDAP directory).
//!
//! The rest of the workspace talks to the directory only through the [`DirectorySearch`]
//! capability, which exposes a single `search(base, filter, scope)` operation returning raw
//! multi-valued records:
//!
//! - [`LdapDirectory`] is the live implementation over an `ldap3` connection
//! - [`InMemoryDirectory`] is a deterministic fake answering from canned results
//!
//! There are no retries. Transport and protocol errors are returned as soon as they happen and
//! the caller decides whether they are fatal.

mod filter;
mod ldap;
mod memory;
mod record;

pub use filter::and_equals;
pub use ldap::{BindCredentials, DirectorySettings, LdapDirectory};
pub use memory::{InMemoryDirectory, RecordedSearch};
pub use record::{RawRecord, SearchScope};

/// Errors returned by directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The server could not be reached, or it rejected the bind.
    #[error("failed to connect to directory at {url}: {reason}")]
    Connection { url: String, reason: String },

    /// A search failed at the protocol level (malformed filter, non-success result code, or a
    /// transport failure mid-search).
    #[error("search failed (base: {base}, filter: {filter}): {reason}")]
    Query {
        base: String,
        filter: String,
        reason: String,
    },
}

/// Type alias for Results that can fail with a [`DirectoryError`].
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Capability to run scoped, filtered searches against a directory.
pub trait DirectorySearch {
    /// Runs a search and returns every matching record in the order the directory sent them.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Query`] if the filter is rejected or the server reports a
    /// failure.
    fn search(
        &mut self,
        base: &str,
        filter: &str,
        scope: SearchScope,
    ) -> DirectoryResult<Vec<RawRecord>>;
}

impl<T: DirectorySearch + ?Sized> DirectorySearch for &mut T {
    fn search(
        &mut self,
        base: &str,
        filter: &str,
        scope: SearchScope,
    ) -> DirectoryResult<Vec<RawRecord>> {
        (**self).search(base, filter, scope)
    }
}
