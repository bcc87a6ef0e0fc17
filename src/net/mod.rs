// Tue Jan 13 2026 - Alex

pub mod prefix;

pub use prefix::{Ipv6Prefix, PrefixError, PrefixTable};

use std::net::Ipv6Addr;

/// Fully expanded, zero-padded lowercase form: eight groups of four hex digits.
pub fn expand(addr: &Ipv6Addr) -> String {
    let s = addr.segments();
    format!(
        "{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}",
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]
    )
}

pub fn parse_address(s: &str) -> Option<Ipv6Addr> {
    let s = s.trim();
    let s = s.strip_prefix('[').and_then(|s| s.strip_suffix(']')).unwrap_or(s);
    s.parse().ok()
}
