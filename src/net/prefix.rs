// Tue Jan 13 2026 - Alex

use ahash::AHashMap;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    #[error("Invalid IPv6 address: {0}")]
    InvalidAddress(String),
    #[error("Invalid prefix length in {0}")]
    InvalidLength(String),
    #[error("Not an IPv6 prefix: {0}")]
    NotIpv6(String),
}

fn mask(len: u8) -> u128 {
    if len == 0 {
        0
    } else {
        u128::MAX << (128 - len as u32)
    }
}

/// An IPv6 network in CIDR notation. The host bits of `network` are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv6Prefix {
    network: u128,
    len: u8,
}

impl Ipv6Prefix {
    pub fn new(addr: Ipv6Addr, len: u8) -> Result<Self, PrefixError> {
        if len > 128 {
            return Err(PrefixError::InvalidLength(format!("{}/{}", addr, len)));
        }

        Ok(Self {
            network: u128::from(addr) & mask(len),
            len,
        })
    }

    pub fn host(addr: Ipv6Addr) -> Self {
        Self {
            network: u128::from(addr),
            len: 128,
        }
    }

    pub fn network(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.network)
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    pub fn contains(&self, addr: Ipv6Addr) -> bool {
        u128::from(addr) & mask(self.len) == self.network
    }
}

impl FromStr for Ipv6Prefix {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (addr_part, len_part) = match s.split_once('/') {
            Some((addr, len)) => (addr, Some(len)),
            None => (s, None),
        };

        if !addr_part.contains(':') {
            return Err(PrefixError::NotIpv6(s.to_string()));
        }

        let addr: Ipv6Addr = addr_part
            .parse()
            .map_err(|_| PrefixError::InvalidAddress(s.to_string()))?;

        match len_part {
            Some(len) => {
                let len: u8 = len
                    .trim()
                    .parse()
                    .map_err(|_| PrefixError::InvalidLength(s.to_string()))?;
                Self::new(addr, len)
            }
            None => Ok(Self::host(addr)),
        }
    }
}

impl fmt::Display for Ipv6Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

/// Longest-prefix-match table keyed by prefix length.
///
/// Lookups consult one hash map per distinct prefix length, longest first, so the
/// cost is bounded by the number of lengths present (at most 129) rather than
/// the number of prefixes.
#[derive(Debug, Clone)]
pub struct PrefixTable<V> {
    by_len: AHashMap<u8, AHashMap<u128, V>>,
    lengths: Vec<u8>,
    count: usize,
}

impl<V> PrefixTable<V> {
    pub fn new() -> Self {
        Self {
            by_len: AHashMap::new(),
            lengths: Vec::new(),
            count: 0,
        }
    }

    pub fn insert(&mut self, prefix: Ipv6Prefix, value: V) -> Option<V> {
        let bucket = self.by_len.entry(prefix.len).or_insert_with(|| {
            self.lengths.push(prefix.len);
            self.lengths.sort_unstable_by(|a, b| b.cmp(a));
            AHashMap::new()
        });

        let previous = bucket.insert(prefix.network, value);
        if previous.is_none() {
            self.count += 1;
        }
        previous
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn longest_match(&self, addr: Ipv6Addr) -> Option<(Ipv6Prefix, &V)> {
        let bits = u128::from(addr);

        for &len in &self.lengths {
            let network = bits & mask(len);
            if let Some(value) = self.by_len.get(&len).and_then(|b| b.get(&network)) {
                return Some((Ipv6Prefix { network, len }, value));
            }
        }

        None
    }

    pub fn contains(&self, addr: Ipv6Addr) -> bool {
        self.longest_match(addr).is_some()
    }
}

impl<V> Default for PrefixTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Ipv6Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_prefix_parse_and_contains() {
        let prefix: Ipv6Prefix = "2001:db8:ffff::1/32".parse().unwrap();

        assert_eq!(prefix.prefix_len(), 32);
        assert_eq!(prefix.to_string(), "2001:db8::/32");
        assert!(prefix.contains(addr("2001:db8:1::5")));
        assert!(!prefix.contains(addr("2001:db9::1")));
    }

    #[test]
    fn test_bare_address_is_host_prefix() {
        let prefix: Ipv6Prefix = "2001:db8::7".parse().unwrap();

        assert_eq!(prefix.prefix_len(), 128);
        assert!(prefix.contains(addr("2001:db8::7")));
        assert!(!prefix.contains(addr("2001:db8::8")));
    }

    #[test]
    fn test_rejects_ipv4_and_bad_lengths() {
        assert_eq!(
            "10.0.0.0/8".parse::<Ipv6Prefix>(),
            Err(PrefixError::NotIpv6("10.0.0.0/8".to_string()))
        );
        assert!(matches!(
            "2001:db8::/129".parse::<Ipv6Prefix>(),
            Err(PrefixError::InvalidLength(_))
        ));
        assert!(matches!(
            "2001:zz8::/32".parse::<Ipv6Prefix>(),
            Err(PrefixError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_zero_length_matches_everything() {
        let prefix: Ipv6Prefix = "::/0".parse().unwrap();
        assert!(prefix.contains(addr("ffff::1")));
    }

    #[test]
    fn test_longest_match_prefers_more_specific() {
        let mut table = PrefixTable::new();
        table.insert("2001:db8::/32".parse().unwrap(), 64500u32);
        table.insert("2001:db8:aa00::/40".parse().unwrap(), 64501u32);

        let (prefix, asn) = table.longest_match(addr("2001:db8:aa00::1")).unwrap();
        assert_eq!(*asn, 64501);
        assert_eq!(prefix.prefix_len(), 40);

        let (_, asn) = table.longest_match(addr("2001:db8:bb00::1")).unwrap();
        assert_eq!(*asn, 64500);

        assert!(table.longest_match(addr("2001:db9::1")).is_none());
        assert_eq!(table.len(), 2);
    }
}
