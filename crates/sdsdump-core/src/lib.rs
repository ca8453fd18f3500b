//! # SDS Dump Core
//!
//! Core logic for dumping Spine Directory Service endpoint configuration.
//!
//! For each organisation (ODS code) the core:
//! - finds the organisation's accredited system record (ASID and supported interactions)
//! - finds the message handling service record for each interaction
//! - flattens each result set into a single attribute map
//! - writes one report entry per interaction
//!
//! **No transport or CLI concerns**: the LDAP session lives in `sds-directory`, document
//! formatting in `sds_report`, and argument handling in the binaries.

pub mod config;
pub mod constants;
pub mod dump;
mod error;
pub mod flatten;
pub mod lookup;

#[cfg(test)]
mod test_support;

pub use config::{parse_ods_codes, ConfigFile, CoreConfig, MissingFieldPolicy};
pub use dump::{DumpService, DumpSummary};
pub use error::{ErrorKind, SdsError, SdsResult};
pub use flatten::{flatten, NormalizedRecord};
pub use lookup::{device_record, resolve, resolve_each, DeviceRecord, ResolveStats};

pub use sds_directory::{DirectorySearch, InMemoryDirectory, LdapDirectory, RawRecord};
pub use sds_report::Escaping;
pub use sds_types::{Entry, InteractionId, OdsCode};
