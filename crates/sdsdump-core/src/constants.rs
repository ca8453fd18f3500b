//! Constants used throughout the SDS dump core crate.
//!
//! Directory attribute names are case-sensitive and must match the SDS schema exactly.

/// Search base for accredited systems and message handling services.
pub const SERVICES_BASE: &str = "ou=services,o=nhs";

/// Object class of an accredited system (device) record.
pub const ACCREDITED_SYSTEM_CLASS: &str = "nhsAs";

pub const ATTR_OBJECT_CLASS: &str = "objectClass";
pub const ATTR_UNIQUE_IDENTIFIER: &str = "uniqueIdentifier";
pub const ATTR_AS_INTERACTIONS: &str = "nhsAsSvcIA";
pub const ATTR_ODS_CODE: &str = "nhsIDCode";
pub const ATTR_CPA_ID: &str = "nhsMhsCPAId";
pub const ATTR_SERVICE_NAME: &str = "nhsMHsSN";
pub const ATTR_PARTY_KEY: &str = "nhsMHSPartyKey";
pub const ATTR_SYNC_REPLY_MODE: &str = "nhsMHSSyncReplyMode";
pub const ATTR_DUPLICATE_ELIMINATION: &str = "nhsMHSDuplicateElimination";
pub const ATTR_ACK_REQUESTED: &str = "nhsMHSAckRequested";
pub const ATTR_MHS_INTERACTION: &str = "nhsMhsSvcIA";
pub const ATTR_ENDPOINT: &str = "nhsMHSEndPoint";

/// Directory used when no server is configured (the Orange test lab).
pub const DEFAULT_LDAP_URL: &str = "ldaps://orange.testlab.nhs.uk/";

/// Report file written when no output path is configured.
pub const DEFAULT_OUTPUT_FILENAME: &str = "sdsdump.xml";

/// Organisations dumped when none are configured.
pub const DEFAULT_ODS_CODES: [&str; 2] = ["A20047", "B82617"];
