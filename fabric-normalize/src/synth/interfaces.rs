//! Interface name canonicalization.

use std::sync::OnceLock;

use regex::Regex;

/// Long-form prefix for each recognized shorthand, in match order.
const FORMS: &[(&str, &str)] = &[
    (r"(?i)^(?:ethernet|eth|et|e)\s*(\d+(?:/\d+){1,2})(\.\d+)?$", "Ethernet"),
    (r"(?i)^(?:port-channel|portchannel|po)\s*(\d+)(\.\d+)?$", "port-channel"),
    (r"(?i)^(?:loopback|lo)\s*(\d+)()$", "loopback"),
    (r"(?i)^(?:vlan|vl)\s*(\d+)()$", "Vlan"),
    (r"(?i)^(?:null)\s*(\d+)()$", "Null"),
    (r"(?i)^(?:mgmt)\s*(\d+)()$", "mgmt"),
    (r"(?i)^(?:tunnel|tu)\s*(\d+)()$", "Tunnel"),
];

fn forms() -> &'static [(Regex, &'static str)] {
    static RE: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RE.get_or_init(|| {
        FORMS
            .iter()
            .map(|(pattern, long)| {
                (
                    Regex::new(pattern).expect("interface regex must compile"),
                    *long,
                )
            })
            .collect()
    })
}

/// Return the canonical long form of an interface name.
///
/// `eth1/1` becomes `Ethernet1/1`, `Po10.100` becomes `port-channel10.100`,
/// `lo0` becomes `loopback0`. Sub-interface suffixes are kept. Names that match
/// no known form are returned trimmed but otherwise unchanged.
pub fn canonical_interface_name(raw: &str) -> String {
    let trimmed = raw.trim();
    for (re, long) in forms() {
        if let Some(caps) = re.captures(trimmed) {
            let number = caps.get(1).map_or("", |m| m.as_str());
            let suffix = caps.get(2).map_or("", |m| m.as_str());
            return format!("{long}{number}{suffix}");
        }
    }
    trimmed.to_string()
}

/// Whether a (possibly shorthand) interface name is a loopback.
pub fn is_loopback(raw: &str) -> bool {
    canonical_interface_name(raw).starts_with("loopback")
}

#[cfg(test)]
mod tests {
    use super::{canonical_interface_name, is_loopback};

    #[test]
    fn shorthand_names_expand() {
        assert_eq!(canonical_interface_name("eth1/1"), "Ethernet1/1");
        assert_eq!(canonical_interface_name("E1/2/3"), "Ethernet1/2/3");
        assert_eq!(canonical_interface_name("Po10"), "port-channel10");
        assert_eq!(canonical_interface_name("lo0"), "loopback0");
        assert_eq!(canonical_interface_name("null0"), "Null0");
        assert_eq!(canonical_interface_name("vlan 20"), "Vlan20");
    }

    #[test]
    fn sub_interface_suffix_is_preserved() {
        assert_eq!(canonical_interface_name("eth1/1.100"), "Ethernet1/1.100");
        assert_eq!(canonical_interface_name("po5.20"), "port-channel5.20");
    }

    #[test]
    fn canonical_and_unknown_names_are_stable() {
        assert_eq!(canonical_interface_name("Ethernet1/1"), "Ethernet1/1");
        assert_eq!(canonical_interface_name(" nve1 "), "nve1");
        assert!(is_loopback("Loopback10"));
        assert!(!is_loopback("Ethernet1/1"));
    }
}
