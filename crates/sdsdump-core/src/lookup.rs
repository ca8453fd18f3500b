//! Two-stage endpoint lookup for an organisation.
//!
//! Stage 1 finds the organisation's accredited system (device) record, which yields the ASID and
//! the list of interactions the system supports. Stage 2 runs one search per interaction to find
//! the matching message handling service record and turns it into an [`Entry`].
//!
//! Entries are produced in the order the interactions are listed in the device record.

use crate::config::MissingFieldPolicy;
use crate::constants::{
    ACCREDITED_SYSTEM_CLASS, ATTR_ACK_REQUESTED, ATTR_AS_INTERACTIONS, ATTR_CPA_ID,
    ATTR_DUPLICATE_ELIMINATION, ATTR_ENDPOINT, ATTR_MHS_INTERACTION, ATTR_OBJECT_CLASS,
    ATTR_ODS_CODE, ATTR_PARTY_KEY, ATTR_SERVICE_NAME, ATTR_SYNC_REPLY_MODE,
    ATTR_UNIQUE_IDENTIFIER, SERVICES_BASE,
};
use crate::flatten::flatten;
use crate::{SdsError, SdsResult};
use sds_directory::{and_equals, DirectorySearch, SearchScope};
use sds_types::{Entry, EntryParts, InteractionId, OdsCode};

/// What stage 1 found for an organisation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Accredited system identifier (`uniqueIdentifier`).
    pub asid: String,
    /// Supported interactions (`nhsAsSvcIA`), in directory order.
    pub interactions: Vec<InteractionId>,
}

/// Counts from resolving one organisation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub entries: usize,
    pub skipped: usize,
}

/// Filter selecting an organisation's accredited system records.
pub fn device_filter(ods_code: &OdsCode) -> String {
    and_equals(&[
        (ATTR_ODS_CODE, ods_code.as_str()),
        (ATTR_OBJECT_CLASS, ACCREDITED_SYSTEM_CLASS),
    ])
}

/// Filter selecting an organisation's endpoint record for one interaction.
pub fn endpoint_filter(ods_code: &OdsCode, interaction: &InteractionId) -> String {
    and_equals(&[
        (ATTR_ODS_CODE, ods_code.as_str()),
        (ATTR_MHS_INTERACTION, interaction.as_str()),
    ])
}

/// Stage 1: look up the device record for `ods_code`.
///
/// # Errors
///
/// - `SdsError::Query` if the search fails
/// - `SdsError::MissingField` naming `uniqueIdentifier` if no record (or no ASID) is found, or
///   naming `nhsAsSvcIA` if the record has no interaction attribute
/// - `SdsError::InvalidAttribute` if an interaction value is blank or contains a control
///   character
///
/// A present-but-empty interaction list is not an error; it resolves to no entries.
pub fn device_record<D>(directory: &mut D, ods_code: &OdsCode) -> SdsResult<DeviceRecord>
where
    D: DirectorySearch + ?Sized,
{
    let records = directory.search(SERVICES_BASE, &device_filter(ods_code), SearchScope::Subtree)?;
    if records.is_empty() {
        tracing::warn!("no accredited system record found for {}", ods_code);
    }
    let device = flatten(records);

    let asid = device
        .first(ATTR_UNIQUE_IDENTIFIER)
        .ok_or_else(|| missing(ATTR_UNIQUE_IDENTIFIER, ods_code, None))?
        .to_owned();
    let interactions = device
        .get(ATTR_AS_INTERACTIONS)
        .ok_or_else(|| missing(ATTR_AS_INTERACTIONS, ods_code, None))?
        .iter()
        .map(|value| {
            InteractionId::new(value).map_err(|source| SdsError::InvalidAttribute {
                attribute: ATTR_AS_INTERACTIONS,
                ods_code: ods_code.to_string(),
                source,
            })
        })
        .collect::<SdsResult<Vec<_>>>()?;

    tracing::debug!(
        "{}: asid {} supports {} interaction(s)",
        ods_code,
        asid,
        interactions.len()
    );

    Ok(DeviceRecord { asid, interactions })
}

/// Stage 2: look up the endpoint record for one interaction and build its entry.
///
/// # Errors
///
/// - `SdsError::Query` if the search fails
/// - `SdsError::MissingField` naming the first required attribute that is absent or empty
pub fn endpoint_entry<D>(
    directory: &mut D,
    ods_code: &OdsCode,
    asid: &str,
    interaction: &InteractionId,
) -> SdsResult<Entry>
where
    D: DirectorySearch + ?Sized,
{
    let records = directory.search(
        SERVICES_BASE,
        &endpoint_filter(ods_code, interaction),
        SearchScope::Subtree,
    )?;
    let endpoint = flatten(records);

    let field = |attribute: &'static str| -> SdsResult<String> {
        endpoint
            .first(attribute)
            .map(str::to_owned)
            .ok_or_else(|| missing(attribute, ods_code, Some(interaction)))
    };

    Ok(Entry::new(EntryParts {
        asid: asid.to_owned(),
        nacs: field(ATTR_ODS_CODE)?,
        cpaid: field(ATTR_CPA_ID)?,
        service: field(ATTR_SERVICE_NAME)?,
        party_key: field(ATTR_PARTY_KEY)?,
        sync_reply: field(ATTR_SYNC_REPLY_MODE)?,
        dup_elim: field(ATTR_DUPLICATE_ELIMINATION)?,
        ack_requested: field(ATTR_ACK_REQUESTED)?,
        soap_action: field(ATTR_MHS_INTERACTION)?,
        endpoint: field(ATTR_ENDPOINT)?,
    }))
}

/// Resolves every entry for `ods_code`, handing each one to `sink` as soon as it is built.
///
/// Under [`MissingFieldPolicy::Abort`] the first missing attribute stops processing, after
/// `sink` has already received the entries before it. Under
/// [`MissingFieldPolicy::SkipInteraction`] the interaction is logged and skipped. Query errors
/// and sink errors always stop processing.
pub fn resolve_each<D, F>(
    directory: &mut D,
    ods_code: &OdsCode,
    policy: MissingFieldPolicy,
    mut sink: F,
) -> SdsResult<ResolveStats>
where
    D: DirectorySearch + ?Sized,
    F: FnMut(Entry) -> SdsResult<()>,
{
    let device = device_record(directory, ods_code)?;
    let mut stats = ResolveStats::default();

    for interaction in &device.interactions {
        match endpoint_entry(directory, ods_code, &device.asid, interaction) {
            Ok(entry) => {
                sink(entry)?;
                stats.entries += 1;
            }
            Err(err @ SdsError::MissingField { .. })
                if policy == MissingFieldPolicy::SkipInteraction =>
            {
                tracing::warn!("skipping interaction: {}", err);
                stats.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(stats)
}

/// Resolves every entry for `ods_code` into a vector.
pub fn resolve<D>(
    directory: &mut D,
    ods_code: &OdsCode,
    policy: MissingFieldPolicy,
) -> SdsResult<Vec<Entry>>
where
    D: DirectorySearch + ?Sized,
{
    let mut entries = Vec::new();
    resolve_each(directory, ods_code, policy, |entry| {
        entries.push(entry);
        Ok(())
    })?;
    Ok(entries)
}

fn missing(
    attribute: &'static str,
    ods_code: &OdsCode,
    interaction: Option<&InteractionId>,
) -> SdsError {
    SdsError::MissingField {
        attribute,
        ods_code: ods_code.to_string(),
        interaction: interaction.cloned(),
    }
}
