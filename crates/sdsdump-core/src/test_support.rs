//! Directory fixtures shared by the core tests.

use crate::constants::SERVICES_BASE;
use crate::lookup::{device_filter, endpoint_filter};
use sds_directory::{InMemoryDirectory, RawRecord};
use sds_types::{InteractionId, OdsCode};

pub(crate) fn ods(code: &str) -> OdsCode {
    OdsCode::new(code).unwrap()
}

pub(crate) fn interaction(id: &str) -> InteractionId {
    InteractionId::new(id).unwrap()
}

pub(crate) fn device(asid: &str, interactions: &[&str]) -> RawRecord {
    RawRecord::new(format!("uniqueIdentifier={asid},ou=services,o=nhs"))
        .with_attribute("uniqueIdentifier", [asid])
        .with_attribute("objectClass", ["nhsAs"])
        .with_attribute("nhsAsSvcIA", interactions.iter().copied())
}

pub(crate) fn endpoint(code: &str, interaction: &str, service: &str) -> RawRecord {
    RawRecord::new(format!("uniqueIdentifier={code}-{service},ou=services,o=nhs"))
        .with_attribute("nhsIDCode", [code])
        .with_attribute("nhsMhsCPAId", ["CPA1"])
        .with_attribute("nhsMHsSN", [service])
        .with_attribute("nhsMHSPartyKey", ["PARTY1"])
        .with_attribute("nhsMHSSyncReplyMode", ["MSHSignalsOnly"])
        .with_attribute("nhsMHSDuplicateElimination", ["always"])
        .with_attribute("nhsMHSAckRequested", ["always"])
        .with_attribute("nhsMhsSvcIA", [interaction])
        .with_attribute("nhsMHSEndPoint", ["https://example.nhs.uk/msg"])
}

/// Registers a device record and its endpoint records for one organisation.
pub(crate) fn with_organisation(
    directory: InMemoryDirectory,
    code: &str,
    device_record: RawRecord,
    endpoints: Vec<(&str, RawRecord)>,
) -> InMemoryDirectory {
    let code = ods(code);
    let mut directory =
        directory.with_records(SERVICES_BASE, device_filter(&code), vec![device_record]);
    for (id, record) in endpoints {
        directory = directory.with_records(
            SERVICES_BASE,
            endpoint_filter(&code, &interaction(id)),
            vec![record],
        );
    }
    directory
}

/// The A20047 organisation with a single PDS interaction.
pub(crate) fn a20047_directory() -> InMemoryDirectory {
    with_organisation(
        InMemoryDirectory::new(),
        "A20047",
        device("AS001", &["COPC_IN000001GB01"]),
        vec![(
            "COPC_IN000001GB01",
            endpoint("A20047", "COPC_IN000001GB01", "PDS"),
        )],
    )
}

pub(crate) const A20047_ENTRY_LINE: &str = concat!(
    "<entry asid=\"AS001\" nacs=\"A20047\" cpaid=\"CPA1\" service=\"PDS\" interaction=\"\" ",
    "partykey=\"PARTY1\" mhsactor=\"urn:oasis:names:tc:ebxml-msg:actor:toPartyMSH\" ",
    "sycReply=\"MSHSignalsOnly\" dupElim=\"always\" ackRq=\"always\" ",
    "soapaction=\"COPC_IN000001GB01\" endpoint=\"https://example.nhs.uk/msg\"  />\r\n"
);
