//! Flattening of directory result sets.
//!
//! A search can return several records. The lookup stages only care about attribute values, so
//! each result set is folded into a single [`NormalizedRecord`]. When two records carry the same
//! attribute name, the later record's value list replaces the earlier one. Values are never
//! merged across records, which means data from an earlier record is lost if a search matches
//! more than one entry with overlapping attributes.

use sds_directory::RawRecord;
use std::collections::BTreeMap;

/// A result set folded into one attribute-name → values mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    attributes: BTreeMap<String, Vec<String>>,
}

impl NormalizedRecord {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// First value of an attribute, if it is present and non-empty.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Folds a result set into a single record; later records overwrite earlier ones per attribute.
pub fn flatten(records: impl IntoIterator<Item = RawRecord>) -> NormalizedRecord {
    let mut count = 0usize;
    let attributes = records
        .into_iter()
        .inspect(|_| count += 1)
        .flat_map(RawRecord::into_attributes)
        .collect();

    if count > 1 {
        tracing::debug!("flattened {} records into one", count);
    }

    NormalizedRecord { attributes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dn: &str, attrs: &[(&str, &[&str])]) -> RawRecord {
        attrs
            .iter()
            .fold(RawRecord::new(dn), |record, (name, values)| {
                record.with_attribute(*name, values.iter().copied())
            })
    }

    #[test]
    fn empty_result_set_flattens_to_empty_record() {
        let flattened = flatten(Vec::new());
        assert!(flattened.is_empty());
        assert_eq!(flattened.first("uniqueIdentifier"), None);
    }

    #[test]
    fn disjoint_records_keep_every_attribute_regardless_of_order() {
        let a = record("dn=a", &[("uniqueIdentifier", &["AS001"])]);
        let b = record("dn=b", &[("nhsAsSvcIA", &["X", "Y"])]);

        let forward = flatten(vec![a.clone(), b.clone()]);
        let backward = flatten(vec![b, a]);

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 2);
        assert_eq!(forward.get("uniqueIdentifier").unwrap(), ["AS001"]);
        assert_eq!(forward.get("nhsAsSvcIA").unwrap(), ["X", "Y"]);
    }

    #[test]
    fn later_record_overwrites_shared_attribute() {
        let first = record(
            "dn=first",
            &[("nhsMHSEndPoint", &["https://one", "https://two"]), ("nhsMHsSN", &["PDS"])],
        );
        let second = record("dn=second", &[("nhsMHSEndPoint", &["https://three"])]);

        let flattened = flatten(vec![first, second]);

        assert_eq!(flattened.get("nhsMHSEndPoint").unwrap(), ["https://three"]);
        assert_eq!(flattened.first("nhsMHsSN"), Some("PDS"));
    }

    #[test]
    fn overwrite_does_not_append() {
        let first = record("dn=first", &[("nhsAsSvcIA", &["A", "B"])]);
        let second = record("dn=second", &[("nhsAsSvcIA", &["C"])]);

        let flattened = flatten(vec![first, second]);
        assert_eq!(flattened.get("nhsAsSvcIA").unwrap().len(), 1);
    }

    #[test]
    fn first_is_none_for_empty_value_list() {
        let flattened = flatten(vec![record("dn=a", &[("nhsAsSvcIA", &[])])]);
        assert_eq!(flattened.get("nhsAsSvcIA").unwrap().len(), 0);
        assert_eq!(flattened.first("nhsAsSvcIA"), None);
    }
}
