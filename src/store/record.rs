// Tue Jan 13 2026 - Alex

use crate::net;
use std::cmp::Ordering;
use std::fmt;
use std::net::Ipv6Addr;

/// One line of an address set: an IPv6 address plus optional CSV metadata
/// (AS number, category tag, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressRecord {
    addr: Ipv6Addr,
    metadata: Vec<String>,
}

impl AddressRecord {
    pub fn new(addr: Ipv6Addr) -> Self {
        Self {
            addr,
            metadata: Vec::new(),
        }
    }

    /// Parses `address[,field...]`. Returns `None` when the first field is not
    /// an IPv6 address.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.trim().split(',');
        let addr = net::parse_address(fields.next()?)?;

        Some(Self {
            addr,
            metadata: fields.map(|f| f.trim().to_string()).collect(),
        })
    }

    pub fn addr(&self) -> Ipv6Addr {
        self.addr
    }

    pub fn metadata(&self) -> &[String] {
        &self.metadata
    }

    pub fn expanded(&self) -> String {
        net::expand(&self.addr)
    }
}

impl From<Ipv6Addr> for AddressRecord {
    fn from(addr: Ipv6Addr) -> Self {
        Self::new(addr)
    }
}

// Numeric order on the address equals lexicographic order on the expanded text.
impl Ord for AddressRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.addr
            .cmp(&other.addr)
            .then_with(|| self.metadata.cmp(&other.metadata))
    }
}

impl PartialOrd for AddressRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expanded())?;
        for field in &self.metadata {
            write!(f, ",{}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_metadata() {
        let record = AddressRecord::parse("2001:db8::1, 64500 ,ISP").unwrap();

        assert_eq!(record.addr(), "2001:db8::1".parse::<Ipv6Addr>().unwrap());
        assert_eq!(record.metadata(), &["64500".to_string(), "ISP".to_string()]);
        assert_eq!(
            record.to_string(),
            "2001:0db8:0000:0000:0000:0000:0000:0001,64500,ISP"
        );
    }

    #[test]
    fn test_parse_rejects_header_and_ipv4() {
        assert!(AddressRecord::parse("saddr,ttl").is_none());
        assert!(AddressRecord::parse("192.0.2.1").is_none());
        assert!(AddressRecord::parse("").is_none());
    }

    #[test]
    fn test_ordering_follows_expanded_text() {
        let mut records: Vec<AddressRecord> = ["2001:db8::1:0", "2001:db8::ff", "::1"]
            .iter()
            .filter_map(|s| AddressRecord::parse(s))
            .collect();
        records.sort();

        let texts: Vec<String> = records.iter().map(|r| r.to_string()).collect();
        let mut sorted_texts = texts.clone();
        sorted_texts.sort();
        assert_eq!(texts, sorted_texts);
    }
}
