// Tue Jan 13 2026 - Alex

use crate::asn::error::LookupError;
use crate::net::{Ipv6Prefix, PrefixError, PrefixTable};
use crate::store::{LineReader, StoreError};
use std::net::Ipv6Addr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsMatch {
    pub asn: u32,
    pub prefix: Ipv6Prefix,
}

/// Origin-AS lookup for a single address. Implementations are shared
/// read-only across worker threads.
pub trait AsLookup: Send + Sync {
    fn lookup(&self, addr: Ipv6Addr) -> Option<AsMatch>;
}

/// Longest-prefix-match table built from an IPASN-style routing snapshot.
#[derive(Debug, Default)]
pub struct RoutingTable {
    table: PrefixTable<u32>,
    source: Option<PathBuf>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prefix: Ipv6Prefix, asn: u32) {
        self.table.insert(prefix, asn);
    }

    /// Reads `prefix<whitespace>origin` lines. `;` and `#` lines are comments,
    /// IPv4 prefixes are ignored, and for AS-set origins (`{64500,64501}`) the
    /// first member is taken.
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let mut table = Self::new();
        let mut malformed = 0usize;
        let mut ipv4 = 0usize;

        for line in LineReader::open(path, false)? {
            let line = match line {
                Ok(line) => line,
                Err(StoreError::Encoding { .. }) => {
                    malformed += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let line = line.trim();
            if line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let (prefix, origin) = match (parts.next(), parts.next()) {
                (Some(p), Some(o)) => (p, o),
                _ => {
                    malformed += 1;
                    continue;
                }
            };

            let prefix = match prefix.parse::<Ipv6Prefix>() {
                Ok(prefix) => prefix,
                Err(PrefixError::NotIpv6(_)) => {
                    ipv4 += 1;
                    continue;
                }
                Err(_) => {
                    malformed += 1;
                    continue;
                }
            };

            match parse_origin(origin) {
                Some(asn) => table.insert(prefix, asn),
                None => malformed += 1,
            }
        }

        if malformed > 0 {
            log::warn!("Skipped {} malformed lines in {}", malformed, path.display());
        }
        log::debug!(
            "Loaded {} IPv6 prefixes from {} ({} IPv4 ignored)",
            table.len(),
            path.display(),
            ipv4
        );

        if table.is_empty() {
            return Err(LookupError::EmptySnapshot(path.to_path_buf()));
        }

        table.source = Some(path.to_path_buf());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn parse_origin(origin: &str) -> Option<u32> {
    origin
        .trim_matches(|c: char| c == '{' || c == '}')
        .split(|c: char| c == ',' || c == '_')
        .next()
        .and_then(|asn| asn.trim().trim_start_matches("AS").parse().ok())
}

impl AsLookup for RoutingTable {
    fn lookup(&self, addr: Ipv6Addr) -> Option<AsMatch> {
        self.table
            .longest_match(addr)
            .map(|(prefix, asn)| AsMatch { asn: *asn, prefix })
    }
}

impl FromIterator<(Ipv6Prefix, u32)> for RoutingTable {
    fn from_iter<I: IntoIterator<Item = (Ipv6Prefix, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (prefix, asn) in iter {
            table.insert(prefix, asn);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_ipasn_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipasn_20240101.dat");
        fs::write(
            &path,
            "; IP-ASN32-DAT file\n1.0.0.0/24\t13335\n2001:db8::/32\t64500\n2001:db8:aa00::/40\t{64501,64502}\nbroken\n",
        )
        .unwrap();

        let table = RoutingTable::load(&path).unwrap();

        assert_eq!(table.len(), 2);
        let hit = table.lookup("2001:db8:aa00::1".parse().unwrap()).unwrap();
        assert_eq!(hit.asn, 64501);
        assert_eq!(hit.prefix.prefix_len(), 40);
        assert_eq!(table.lookup("2001:db8:1::1".parse().unwrap()).unwrap().asn, 64500);
        assert!(table.lookup("2001:db9::1".parse().unwrap()).is_none());
    }

    #[test]
    fn test_snapshot_without_ipv6_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v4only.dat");
        fs::write(&path, "1.0.0.0/24\t13335\n").unwrap();

        assert!(matches!(
            RoutingTable::load(&path),
            Err(LookupError::EmptySnapshot(_))
        ));
    }

    #[test]
    fn test_parse_origin_variants() {
        assert_eq!(parse_origin("64500"), Some(64500));
        assert_eq!(parse_origin("{64500,64501}"), Some(64500));
        assert_eq!(parse_origin("64500_64501"), Some(64500));
        assert_eq!(parse_origin("AS3320"), Some(3320));
        assert_eq!(parse_origin("none"), None);
    }
}
