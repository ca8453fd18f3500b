//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into [`crate::DumpService`].
//! Binaries start from a [`ConfigFile`] (loaded from YAML, or empty), overlay their own flags or
//! environment variables, and call [`ConfigFile::resolve`] to obtain a validated [`CoreConfig`].

use crate::constants::{DEFAULT_LDAP_URL, DEFAULT_ODS_CODES, DEFAULT_OUTPUT_FILENAME};
use crate::{SdsError, SdsResult};
use sds_directory::{BindCredentials, DirectorySettings};
use sds_report::Escaping;
use sds_types::OdsCode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// What to do when an endpoint record lacks a required attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingFieldPolicy {
    /// Stop the whole run at the first missing attribute.
    #[default]
    Abort,
    /// Log the interaction and carry on with the next one.
    SkipInteraction,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    directory: DirectorySettings,
    output_path: PathBuf,
    ods_codes: Vec<OdsCode>,
    escaping: Escaping,
    missing_field_policy: MissingFieldPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with markup escaping and abort-on-missing-field.
    pub fn new(
        directory: DirectorySettings,
        output_path: PathBuf,
        ods_codes: Vec<OdsCode>,
    ) -> SdsResult<Self> {
        if directory.url.trim().is_empty() {
            return Err(SdsError::InvalidInput(
                "directory URL cannot be empty".into(),
            ));
        }
        if output_path.as_os_str().is_empty() {
            return Err(SdsError::InvalidInput("output path cannot be empty".into()));
        }

        Ok(Self {
            directory,
            output_path,
            ods_codes,
            escaping: Escaping::default(),
            missing_field_policy: MissingFieldPolicy::default(),
        })
    }

    pub fn with_escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn with_missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field_policy = policy;
        self
    }

    pub fn directory(&self) -> &DirectorySettings {
        &self.directory
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn ods_codes(&self) -> &[OdsCode] {
        &self.ods_codes
    }

    pub fn escaping(&self) -> Escaping {
        self.escaping
    }

    pub fn missing_field_policy(&self) -> MissingFieldPolicy {
        self.missing_field_policy
    }
}

/// On-disk (YAML) form of the configuration. Every field is optional.
///
/// ```yaml
/// ldap_url: ldaps://orange.testlab.nhs.uk/
/// output: sdsdump.xml
/// ods_codes: [A20047, B82617]
/// escape_markup: true
/// on_missing_field: abort
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub ldap_url: Option<String>,
    pub bind_dn: Option<String>,
    pub bind_password: Option<String>,
    pub output: Option<PathBuf>,
    pub ods_codes: Option<Vec<OdsCode>>,
    pub escape_markup: Option<bool>,
    pub on_missing_field: Option<MissingFieldPolicy>,
}

impl ConfigFile {
    pub fn from_yaml_str(yaml: &str) -> SdsResult<Self> {
        serde_yaml::from_str(yaml).map_err(SdsError::ConfigParse)
    }

    pub fn load(path: &Path) -> SdsResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(SdsError::ConfigRead)?;
        Self::from_yaml_str(&contents)
    }

    /// Applies defaults and validates.
    ///
    /// # Errors
    ///
    /// Returns `SdsError::InvalidInput` if only one of `bind_dn` / `bind_password` is set, or
    /// if the URL or output path is empty.
    pub fn resolve(self) -> SdsResult<CoreConfig> {
        let credentials = match (self.bind_dn, self.bind_password) {
            (None, None) => None,
            (Some(bind_dn), Some(password)) => Some(BindCredentials { bind_dn, password }),
            _ => {
                return Err(SdsError::InvalidInput(
                    "bind_dn and bind_password must be given together".into(),
                ))
            }
        };

        let ods_codes = match self.ods_codes {
            Some(codes) => codes,
            None => DEFAULT_ODS_CODES
                .iter()
                .map(|code| OdsCode::new(code))
                .collect::<Result<_, _>>()
                .map_err(|e| SdsError::InvalidInput(e.to_string()))?,
        };

        let escaping = match self.escape_markup {
            Some(false) => Escaping::None,
            _ => Escaping::Markup,
        };

        let config = CoreConfig::new(
            DirectorySettings {
                url: self.ldap_url.unwrap_or_else(|| DEFAULT_LDAP_URL.into()),
                credentials,
            },
            self.output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILENAME)),
            ods_codes,
        )?;

        Ok(config
            .with_escaping(escaping)
            .with_missing_field_policy(self.on_missing_field.unwrap_or_default()))
    }
}

/// Parse a comma-separated list of ODS codes, ignoring blank items.
pub fn parse_ods_codes(value: &str) -> SdsResult<Vec<OdsCode>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            OdsCode::new(code)
                .map_err(|e| SdsError::InvalidInput(format!("invalid ODS code {code:?}: {e}")))
        })
        .collect()
}
