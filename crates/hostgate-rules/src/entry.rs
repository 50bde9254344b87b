//! Entry classification.
//!
//! A rule entry is raw text: an IP literal, a CIDR literal, a
//! `.suffix` hostname pattern, or an exact hostname. Classification is
//! total (every string lands in exactly one category) and happens once,
//! when a rule is constructed. Matching never re-parses entry text.

use std::net::IpAddr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// The syntactic category of a rule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// A single IP address (v4 or v6).
    IpAddress,
    /// A CIDR network (v4 or v6).
    IpNetwork,
    /// A hostname suffix, written with a leading dot.
    HostSuffix,
    /// An exact hostname.
    HostExact,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntryType::IpAddress => "ip_address",
            EntryType::IpNetwork => "ip_network",
            EntryType::HostSuffix => "host_suffix",
            EntryType::HostExact => "host_exact",
        };
        f.write_str(s)
    }
}

/// The parsed form of a rule entry.
///
/// Address and network entries are parsed at classification time so the
/// matcher works on structured values instead of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedEntry {
    IpAddress(IpAddr),
    IpNetwork(IpNet),
    /// Stored with the leading dot; matching is a literal string suffix
    /// comparison, so `.example.com` matches `host.example.com` but not
    /// `example.com`.
    HostSuffix(String),
    HostExact(String),
}

impl ClassifiedEntry {
    /// Classify and parse an entry.
    ///
    /// The priority order is fixed: address, then network, then suffix,
    /// then exact host. A bare address must be tried before network
    /// parsing: it is syntactically a degenerate /32 or /128 network and
    /// must not classify as one. `HostExact` is the universal fallback, so
    /// this never fails.
    pub fn parse(entry: &str) -> Self {
        if let Ok(addr) = entry.parse::<IpAddr>() {
            return ClassifiedEntry::IpAddress(addr);
        }
        if let Ok(net) = entry.parse::<IpNet>() {
            return ClassifiedEntry::IpNetwork(net);
        }
        if entry.starts_with('.') {
            return ClassifiedEntry::HostSuffix(entry.to_string());
        }
        ClassifiedEntry::HostExact(entry.to_string())
    }

    /// The category this entry parsed into.
    pub fn entry_type(&self) -> EntryType {
        match self {
            ClassifiedEntry::IpAddress(_) => EntryType::IpAddress,
            ClassifiedEntry::IpNetwork(_) => EntryType::IpNetwork,
            ClassifiedEntry::HostSuffix(_) => EntryType::HostSuffix,
            ClassifiedEntry::HostExact(_) => EntryType::HostExact,
        }
    }

    /// Check this entry against a caller's address and optional hostname.
    ///
    /// Hostname comparisons are byte-literal; no implicit lowercasing.
    /// `IpNet::contains` is address-family aware: a v4 address never
    /// matches a v6 network and vice versa.
    pub fn matches(&self, address: IpAddr, hostname: Option<&str>) -> bool {
        match self {
            ClassifiedEntry::IpAddress(addr) => address == *addr,
            ClassifiedEntry::IpNetwork(net) => net.contains(&address),
            ClassifiedEntry::HostSuffix(suffix) => {
                hostname.is_some_and(|host| host.ends_with(suffix.as_str()))
            }
            ClassifiedEntry::HostExact(exact) => hostname.is_some_and(|host| host == exact),
        }
    }
}

/// Classify an entry without keeping the parsed form.
///
/// Pure function of the entry text; repeated calls always agree.
pub fn classify(entry: &str) -> EntryType {
    ClassifiedEntry::parse(entry).entry_type()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn classify_four_categories() {
        assert_eq!(classify("10.0.0.1"), EntryType::IpAddress);
        assert_eq!(classify("10.0.0.0/24"), EntryType::IpNetwork);
        assert_eq!(classify(".example.com"), EntryType::HostSuffix);
        assert_eq!(classify("host.example.com"), EntryType::HostExact);
    }

    #[test]
    fn classify_v6() {
        assert_eq!(classify("::1"), EntryType::IpAddress);
        assert_eq!(classify("2001:db8::/32"), EntryType::IpNetwork);
    }

    #[test]
    fn classify_address_before_network() {
        // A bare address is a degenerate network; the fixed order keeps it
        // classified as an address.
        match ClassifiedEntry::parse("192.168.1.1") {
            ClassifiedEntry::IpAddress(addr) => {
                assert_eq!(addr, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)));
            }
            other => panic!("expected address, got {other:?}"),
        }
    }

    #[test]
    fn classify_is_total() {
        // Anything unparsable falls through to host_exact.
        assert_eq!(classify(""), EntryType::HostExact);
        assert_eq!(classify("10.0.0.0/64"), EntryType::HostExact);
        assert_eq!(classify("not an entry"), EntryType::HostExact);
    }

    #[test]
    fn classify_idempotent() {
        for entry in ["10.0.0.1", "10.0.0.0/8", ".example.com", "example.com"] {
            assert_eq!(classify(entry), classify(entry));
        }
    }

    #[test]
    fn suffix_retains_leading_dot() {
        match ClassifiedEntry::parse(".example.com") {
            ClassifiedEntry::HostSuffix(s) => assert_eq!(s, ".example.com"),
            other => panic!("expected suffix, got {other:?}"),
        }
    }

    #[test]
    fn suffix_match_is_literal() {
        let entry = ClassifiedEntry::parse(".example.com");
        let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(entry.matches(addr, Some("a.example.com")));
        assert!(entry.matches(addr, Some("deep.a.example.com")));
        // No leading dot in the hostname, so the bare domain is excluded.
        assert!(!entry.matches(addr, Some("example.com")));
        assert!(!entry.matches(addr, Some("notexample.com")));
        assert!(!entry.matches(addr, None));
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        let entry = ClassifiedEntry::parse(".Example.com");
        let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(!entry.matches(addr, Some("a.example.com")));
        assert!(entry.matches(addr, Some("a.Example.com")));
    }

    #[test]
    fn exact_match() {
        let entry = ClassifiedEntry::parse("host.example.com");
        let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(entry.matches(addr, Some("host.example.com")));
        assert!(!entry.matches(addr, Some("other.example.com")));
        assert!(!entry.matches(addr, Some("a.host.example.com")));
        assert!(!entry.matches(addr, None));
    }

    #[test]
    fn address_match() {
        let entry = ClassifiedEntry::parse("10.0.5.5");
        assert!(entry.matches(IpAddr::V4(Ipv4Addr::new(10, 0, 5, 5)), None));
        assert!(!entry.matches(IpAddr::V4(Ipv4Addr::new(10, 0, 5, 6)), None));
    }

    #[test]
    fn network_match_family_aware() {
        let v4net = ClassifiedEntry::parse("10.0.0.0/8");
        assert!(v4net.matches(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)), None));
        assert!(!v4net.matches(IpAddr::V4(Ipv4Addr::new(11, 0, 0, 1)), None));
        // A v6 address never matches a v4 network.
        assert!(!v4net.matches(IpAddr::V6(Ipv6Addr::LOCALHOST), None));

        let v6net = ClassifiedEntry::parse("2001:db8::/32");
        assert!(v6net.matches(
            IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)),
            None
        ));
        // And a v4 address never matches a v6 network.
        assert!(!v6net.matches(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), None));
    }
}
