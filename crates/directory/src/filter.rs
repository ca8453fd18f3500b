//! LDAP search filter construction.

/// Builds a conjunction of equality assertions, e.g. `(&(nhsIDCode=A20047)(objectClass=nhsAs))`.
///
/// Values are escaped per RFC 4515 so an identifier containing `*`, `(`, `)` or `\` cannot
/// change the shape of the filter. Attribute names are written as given.
pub fn and_equals(assertions: &[(&str, &str)]) -> String {
    let mut filter = String::from("(&");
    for (attribute, value) in assertions {
        filter.push('(');
        filter.push_str(attribute);
        filter.push('=');
        filter.push_str(&ldap3::ldap_escape(*value));
        filter.push(')');
    }
    filter.push(')');
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_device_filter() {
        let filter = and_equals(&[("nhsIDCode", "A20047"), ("objectClass", "nhsAs")]);
        assert_eq!(filter, "(&(nhsIDCode=A20047)(objectClass=nhsAs))");
    }

    #[test]
    fn leaves_urn_interactions_untouched() {
        let filter = and_equals(&[
            ("nhsIDCode", "B82617"),
            ("nhsMhsSvcIA", "urn:nhs:names:services:pds:QUPA_IN040000UK01"),
        ]);
        assert_eq!(
            filter,
            "(&(nhsIDCode=B82617)(nhsMhsSvcIA=urn:nhs:names:services:pds:QUPA_IN040000UK01))"
        );
    }

    #[test]
    fn escapes_filter_metacharacters() {
        let filter = and_equals(&[("nhsIDCode", "*)(objectClass=*")]);
        assert_eq!(filter, r"(&(nhsIDCode=\2a\29\28objectClass=\2a))");
    }
}
