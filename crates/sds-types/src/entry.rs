//! The report entry produced for each (organisation, interaction) pair.

use serde::Serialize;

/// ebXML actor role attached to every entry, independent of directory data.
pub const MHS_ACTOR: &str = "urn:oasis:names:tc:ebxml-msg:actor:toPartyMSH";

/// Values read from the directory for one endpoint, used to build an [`Entry`].
///
/// `asid` comes from the organisation's device record; everything else comes from the
/// endpoint record matched by interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryParts {
    pub asid: String,
    pub nacs: String,
    pub cpaid: String,
    pub service: String,
    pub party_key: String,
    pub sync_reply: String,
    pub dup_elim: String,
    pub ack_requested: String,
    pub soap_action: String,
    pub endpoint: String,
}

/// One line of the dump report.
///
/// Fields are private so an entry cannot be altered once built. The `interaction` attribute is
/// always written empty and `mhsactor` is always [`MHS_ACTOR`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entry {
    asid: String,
    nacs: String,
    cpaid: String,
    service: String,
    interaction: String,
    #[serde(rename = "partykey")]
    party_key: String,
    #[serde(rename = "mhsactor")]
    mhs_actor: &'static str,
    #[serde(rename = "sycReply")]
    sync_reply: String,
    #[serde(rename = "dupElim")]
    dup_elim: String,
    #[serde(rename = "ackRq")]
    ack_requested: String,
    #[serde(rename = "soapaction")]
    soap_action: String,
    endpoint: String,
}

impl Entry {
    pub fn new(parts: EntryParts) -> Self {
        Self {
            asid: parts.asid,
            nacs: parts.nacs,
            cpaid: parts.cpaid,
            service: parts.service,
            interaction: String::new(),
            party_key: parts.party_key,
            mhs_actor: MHS_ACTOR,
            sync_reply: parts.sync_reply,
            dup_elim: parts.dup_elim,
            ack_requested: parts.ack_requested,
            soap_action: parts.soap_action,
            endpoint: parts.endpoint,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn party_key(&self) -> &str {
        &self.party_key
    }

    pub fn soap_action(&self) -> &str {
        &self.soap_action
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Report attribute names paired with their values, in output order.
    pub fn attributes(&self) -> [(&'static str, &str); 12] {
        [
            ("asid", self.asid.as_str()),
            ("nacs", self.nacs.as_str()),
            ("cpaid", self.cpaid.as_str()),
            ("service", self.service.as_str()),
            ("interaction", self.interaction.as_str()),
            ("partykey", self.party_key.as_str()),
            ("mhsactor", self.mhs_actor),
            ("sycReply", self.sync_reply.as_str()),
            ("dupElim", self.dup_elim.as_str()),
            ("ackRq", self.ack_requested.as_str()),
            ("soapaction", self.soap_action.as_str()),
            ("endpoint", self.endpoint.as_str()),
        ]
    }
}
