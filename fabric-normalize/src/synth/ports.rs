//! Well-known port and message-type names.
//!
//! Access-list entries are rendered with symbolic names where the switch
//! software has one, so `80` becomes `www` for TCP and `8` becomes `echo` for
//! ICMP. Numbers without a name are left alone.

use fabric_tree::Node;

/// Protocols with a symbolic port (or message type) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortProtocol {
    Tcp,
    Udp,
    Icmp,
    Icmpv6,
}

impl PortProtocol {
    /// Map an access-list `protocol` value to a table, if it has one.
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tcp" | "6" => Some(PortProtocol::Tcp),
            "udp" | "17" => Some(PortProtocol::Udp),
            "icmp" | "1" => Some(PortProtocol::Icmp),
            "icmpv6" | "ipv6-icmp" | "58" => Some(PortProtocol::Icmpv6),
            _ => None,
        }
    }

    fn table(self) -> &'static [(u16, &'static str)] {
        match self {
            PortProtocol::Tcp => TCP_PORTS,
            PortProtocol::Udp => UDP_PORTS,
            PortProtocol::Icmp => ICMP_TYPES,
            PortProtocol::Icmpv6 => ICMPV6_TYPES,
        }
    }
}

const TCP_PORTS: &[(u16, &str)] = &[
    (7, "echo"),
    (9, "discard"),
    (13, "daytime"),
    (19, "chargen"),
    (20, "ftp-data"),
    (21, "ftp"),
    (23, "telnet"),
    (25, "smtp"),
    (37, "time"),
    (43, "whois"),
    (49, "tacacs"),
    (53, "domain"),
    (70, "gopher"),
    (79, "finger"),
    (80, "www"),
    (101, "hostname"),
    (109, "pop2"),
    (110, "pop3"),
    (111, "sunrpc"),
    (113, "ident"),
    (119, "nntp"),
    (179, "bgp"),
    (194, "irc"),
    (496, "pim-auto-rp"),
    (512, "exec"),
    (513, "login"),
    (514, "cmd"),
    (515, "lpd"),
    (517, "talk"),
    (540, "uucp"),
    (543, "klogin"),
    (544, "kshell"),
];

const UDP_PORTS: &[(u16, &str)] = &[
    (7, "echo"),
    (9, "discard"),
    (37, "time"),
    (42, "nameserver"),
    (49, "tacacs"),
    (53, "domain"),
    (67, "bootps"),
    (68, "bootpc"),
    (69, "tftp"),
    (111, "sunrpc"),
    (123, "ntp"),
    (137, "netbios-ns"),
    (138, "netbios-dgm"),
    (139, "netbios-ss"),
    (161, "snmp"),
    (162, "snmptrap"),
    (177, "xdmcp"),
    (195, "dnsix"),
    (434, "mobile-ip"),
    (496, "pim-auto-rp"),
    (500, "isakmp"),
    (512, "biff"),
    (513, "who"),
    (514, "syslog"),
    (517, "talk"),
    (520, "rip"),
    (4500, "non500-isakmp"),
];

const ICMP_TYPES: &[(u16, &str)] = &[
    (0, "echo-reply"),
    (3, "unreachable"),
    (4, "source-quench"),
    (5, "redirect"),
    (6, "alternate-address"),
    (8, "echo"),
    (9, "router-advertisement"),
    (10, "router-solicitation"),
    (11, "time-exceeded"),
    (12, "parameter-problem"),
    (13, "timestamp-request"),
    (14, "timestamp-reply"),
    (15, "information-request"),
    (16, "information-reply"),
    (17, "mask-request"),
    (18, "mask-reply"),
];

const ICMPV6_TYPES: &[(u16, &str)] = &[
    (1, "unreachable"),
    (2, "packet-too-big"),
    (3, "time-exceeded"),
    (4, "parameter-problem"),
    (128, "echo-request"),
    (129, "echo-reply"),
    (130, "mld-query"),
    (131, "mld-report"),
    (132, "mld-reduction"),
    (133, "router-solicitation"),
    (134, "router-advertisement"),
    (135, "nd-ns"),
    (136, "nd-na"),
    (137, "redirect"),
];

/// Symbolic name of a numeric port or message type, if one is defined.
pub fn symbolic_name(protocol: PortProtocol, number: u16) -> Option<&'static str> {
    protocol
        .table()
        .iter()
        .find(|(port, _)| *port == number)
        .map(|(_, name)| *name)
}

/// Canonicalize a port value: numbers (or numeric strings) with a symbolic
/// name become that name, everything else is returned unchanged.
pub fn canonical_port(protocol: PortProtocol, value: &Node) -> Node {
    let number = match value {
        Node::Integer(n) => u16::try_from(*n).ok(),
        Node::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    };
    number
        .and_then(|n| symbolic_name(protocol, n))
        .map(Node::from)
        .unwrap_or_else(|| value.clone())
}

#[cfg(test)]
mod tests {
    use fabric_tree::Node;

    use super::{canonical_port, symbolic_name, PortProtocol};

    #[test]
    fn well_known_ports_become_names() {
        assert_eq!(
            canonical_port(PortProtocol::Tcp, &Node::Integer(80)),
            Node::from("www")
        );
        assert_eq!(
            canonical_port(PortProtocol::Udp, &Node::from("123")),
            Node::from("ntp")
        );
        assert_eq!(
            canonical_port(PortProtocol::Icmp, &Node::Integer(8)),
            Node::from("echo")
        );
        assert_eq!(symbolic_name(PortProtocol::Icmpv6, 128), Some("echo-request"));
    }

    #[test]
    fn unmapped_values_are_unchanged() {
        assert_eq!(
            canonical_port(PortProtocol::Tcp, &Node::Integer(8443)),
            Node::Integer(8443)
        );
        assert_eq!(
            canonical_port(PortProtocol::Tcp, &Node::from("www")),
            Node::from("www")
        );
        assert_eq!(
            canonical_port(PortProtocol::Udp, &Node::Integer(-1)),
            Node::Integer(-1)
        );
    }

    #[test]
    fn protocol_names_are_case_insensitive() {
        assert_eq!(PortProtocol::from_name("TCP"), Some(PortProtocol::Tcp));
        assert_eq!(PortProtocol::from_name("icmpv6"), Some(PortProtocol::Icmpv6));
        assert_eq!(PortProtocol::from_name("ip"), None);
    }
}
