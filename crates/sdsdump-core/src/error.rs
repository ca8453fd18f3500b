use sds_directory::DirectoryError;
use sds_report::ReportError;
use sds_types::{InteractionId, TextError};

#[derive(Debug, thiserror::Error)]
pub enum SdsError {
    #[error("directory connection failed: {0}")]
    Connection(DirectoryError),
    #[error("directory query failed: {0}")]
    Query(DirectoryError),
    #[error(
        "missing attribute {attribute} for organisation {ods_code}{context}",
        context = interaction_context(interaction.as_ref())
    )]
    MissingField {
        attribute: &'static str,
        ods_code: String,
        interaction: Option<InteractionId>,
    },
    #[error("invalid value in attribute {attribute} for organisation {ods_code}: {source}")]
    InvalidAttribute {
        attribute: &'static str,
        ods_code: String,
        source: TextError,
    },
    #[error("report output failed: {0}")]
    Report(#[from] ReportError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read config file: {0}")]
    ConfigRead(std::io::Error),
    #[error("failed to parse config file: {0}")]
    ConfigParse(serde_yaml::Error),
}

/// Coarse classification of an [`SdsError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Query,
    MissingField,
    InvalidAttribute,
    Report,
    Config,
}

impl SdsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdsError::Connection(_) => ErrorKind::Connection,
            SdsError::Query(_) => ErrorKind::Query,
            SdsError::MissingField { .. } => ErrorKind::MissingField,
            SdsError::InvalidAttribute { .. } => ErrorKind::InvalidAttribute,
            SdsError::Report(_) => ErrorKind::Report,
            SdsError::InvalidInput(_) | SdsError::ConfigRead(_) | SdsError::ConfigParse(_) => {
                ErrorKind::Config
            }
        }
    }
}

impl From<DirectoryError> for SdsError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Connection { .. } => SdsError::Connection(err),
            DirectoryError::Query { .. } => SdsError::Query(err),
        }
    }
}

fn interaction_context(interaction: Option<&InteractionId>) -> String {
    interaction
        .map(|id| format!(" (interaction {id})"))
        .unwrap_or_default()
}

pub type SdsResult<T> = std::result::Result<T, SdsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_errors_map_to_named_kinds() {
        let connection: SdsError = DirectoryError::Connection {
            url: "ldap://localhost".into(),
            reason: "refused".into(),
        }
        .into();
        let query: SdsError = DirectoryError::Query {
            base: "ou=services,o=nhs".into(),
            filter: "(".into(),
            reason: "bad filter".into(),
        }
        .into();

        assert_eq!(connection.kind(), ErrorKind::Connection);
        assert_eq!(query.kind(), ErrorKind::Query);
    }

    #[test]
    fn missing_field_message_names_attribute_and_interaction() {
        let err = SdsError::MissingField {
            attribute: "nhsMHSEndPoint",
            ods_code: "A20047".into(),
            interaction: Some(InteractionId::new("COPC_IN000001GB01").unwrap()),
        };
        assert_eq!(
            err.to_string(),
            "missing attribute nhsMHSEndPoint for organisation A20047 (interaction COPC_IN000001GB01)"
        );

        let err = SdsError::MissingField {
            attribute: "uniqueIdentifier",
            ods_code: "A20047".into(),
            interaction: None,
        };
        assert_eq!(
            err.to_string(),
            "missing attribute uniqueIdentifier for organisation A20047"
        );
    }

    #[test]
    fn invalid_attribute_names_attribute_and_reason() {
        let err = SdsError::InvalidAttribute {
            attribute: "nhsAsSvcIA",
            ods_code: "A20047".into(),
            source: TextError::ControlCharacter,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidAttribute);
        assert_eq!(
            err.to_string(),
            "invalid value in attribute nhsAsSvcIA for organisation A20047: Text cannot contain control characters"
        );
    }
}
