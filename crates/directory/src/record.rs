//! Raw search results.

use std::collections::BTreeMap;

/// Search scope relative to the search base.
///
/// Every SDS lookup searches the whole services subtree, so that is the only scope offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// The base and everything beneath it.
    #[default]
    Subtree,
}

impl From<SearchScope> for ldap3::Scope {
    fn from(scope: SearchScope) -> Self {
        match scope {
            SearchScope::Subtree => ldap3::Scope::Subtree,
        }
    }
}

/// One directory entry as returned by a search.
///
/// Attribute names are kept exactly as the server returned them. An attribute may carry several
/// values; their order is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    dn: String,
    attributes: BTreeMap<String, Vec<String>>,
}

impl RawRecord {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style helper that sets (replaces) an attribute's values.
    pub fn with_attribute<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn into_attributes(self) -> BTreeMap<String, Vec<String>> {
        self.attributes
    }
}

impl From<ldap3::SearchEntry> for RawRecord {
    fn from(entry: ldap3::SearchEntry) -> Self {
        let mut attributes: BTreeMap<String, Vec<String>> = entry.attrs.into_iter().collect();

        // Values that are not valid UTF-8 arrive separately; keep them rather than drop them.
        for (name, values) in entry.bin_attrs {
            attributes.insert(
                name,
                values
                    .iter()
                    .map(|v| String::from_utf8_lossy(v).into_owned())
                    .collect(),
            );
        }

        Self {
            dn: entry.dn,
            attributes,
        }
    }
}
