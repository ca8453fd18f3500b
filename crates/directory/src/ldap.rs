//! Live directory access over LDAP.

use crate::{DirectoryError, DirectoryResult, DirectorySearch, RawRecord, SearchScope};
use ldap3::{LdapConn, SearchEntry};

/// Simple-bind credentials. When absent the connection stays anonymous.
#[derive(Clone, PartialEq, Eq)]
pub struct BindCredentials {
    pub bind_dn: String,
    pub password: String,
}

impl std::fmt::Debug for BindCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindCredentials")
            .field("bind_dn", &self.bind_dn)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where and how to connect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectorySettings {
    /// Server URL, e.g. `ldaps://orange.testlab.nhs.uk/`.
    pub url: String,
    pub credentials: Option<BindCredentials>,
}

impl DirectorySettings {
    pub fn anonymous(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
        }
    }
}

/// An open LDAP session.
///
/// The session is opened once and reused for every search. It is unbound when dropped, so it is
/// released on every exit path; call [`LdapDirectory::close`] to observe unbind errors.
pub struct LdapDirectory {
    conn: LdapConn,
    url: String,
    open: bool,
}

impl std::fmt::Debug for LdapDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapDirectory")
            .field("url", &self.url)
            .field("open", &self.open)
            .finish()
    }
}

impl LdapDirectory {
    /// Opens a connection and, if credentials are configured, performs a simple bind.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Connection`] if the server is unreachable or rejects the bind.
    pub fn connect(settings: &DirectorySettings) -> DirectoryResult<Self> {
        let connection_error = |reason: String| DirectoryError::Connection {
            url: settings.url.clone(),
            reason,
        };

        tracing::info!("connecting to directory {}", settings.url);
        let mut conn = LdapConn::new(&settings.url).map_err(|e| connection_error(e.to_string()))?;

        if let Some(credentials) = &settings.credentials {
            tracing::debug!("binding as {}", credentials.bind_dn);
            conn.simple_bind(&credentials.bind_dn, &credentials.password)
                .and_then(|result| result.success())
                .map_err(|e| connection_error(format!("bind rejected: {e}")))?;
        }

        Ok(Self {
            conn,
            url: settings.url.clone(),
            open: true,
        })
    }

    /// Unbinds the session.
    pub fn close(mut self) -> DirectoryResult<()> {
        self.unbind()
    }

    fn unbind(&mut self) -> DirectoryResult<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        tracing::debug!("unbinding from {}", self.url);
        self.conn
            .unbind()
            .map_err(|e| DirectoryError::Connection {
                url: self.url.clone(),
                reason: format!("unbind failed: {e}"),
            })
    }
}

impl DirectorySearch for LdapDirectory {
    fn search(
        &mut self,
        base: &str,
        filter: &str,
        scope: SearchScope,
    ) -> DirectoryResult<Vec<RawRecord>> {
        let query_error = |reason: String| DirectoryError::Query {
            base: base.to_owned(),
            filter: filter.to_owned(),
            reason,
        };

        tracing::debug!("search base={} filter={} scope={:?}", base, filter, scope);
        let (entries, _result) = self
            .conn
            .search(base, scope.into(), filter, vec!["*"])
            .and_then(|result| result.success())
            .map_err(|e| query_error(e.to_string()))?;

        let records: Vec<RawRecord> = entries
            .into_iter()
            .map(|entry| RawRecord::from(SearchEntry::construct(entry)))
            .collect();

        for record in &records {
            for (name, values) in record.attributes() {
                for value in values {
                    tracing::trace!("{} : {}", name, value);
                }
            }
        }
        tracing::debug!("search returned {} record(s)", records.len());

        Ok(records)
    }
}

impl Drop for LdapDirectory {
    fn drop(&mut self) {
        if let Err(e) = self.unbind() {
            tracing::warn!("{}", e);
        }
    }
}
