// Tue Jan 13 2026 - Alex

use crate::store::{self, AddressRecord, AddressSetReader, AddressSetWriter};
use crate::transform::error::TransformError;
use crate::transform::TransformStats;
use itertools::{EitherOrBoth, Itertools};
use std::net::Ipv6Addr;
use std::path::{Path, PathBuf};

/// Streams a sorted address set, collapsing adjacent duplicates. The first
/// error (I/O, malformed line, order violation) stops iteration and is
/// reported by `finish`.
struct SortedAddresses {
    path: PathBuf,
    reader: AddressSetReader,
    last: Option<Ipv6Addr>,
    position: usize,
    count: usize,
    error: Option<TransformError>,
}

impl SortedAddresses {
    fn open(path: &Path) -> Result<Self, TransformError> {
        Ok(Self {
            path: path.to_path_buf(),
            reader: store::read(path)?,
            last: None,
            position: 0,
            count: 0,
            error: None,
        })
    }

    fn finish(self) -> Result<usize, TransformError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.count),
        }
    }
}

impl Iterator for SortedAddresses {
    type Item = Ipv6Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }

        loop {
            let addr = match self.reader.next()? {
                Ok(record) => record.addr(),
                Err(e) => {
                    self.error = Some(e.into());
                    return None;
                }
            };
            self.position += 1;
            self.count += 1;

            match self.last {
                Some(last) if addr == last => continue,
                Some(last) if addr < last => {
                    self.error = Some(TransformError::Unsorted {
                        path: self.path.clone(),
                        line: self.position,
                    });
                    return None;
                }
                _ => {
                    self.last = Some(addr);
                    return Some(addr);
                }
            }
        }
    }
}

fn merge_sets<F>(
    left: &Path,
    right: &Path,
    output: &Path,
    mut keep: F,
) -> Result<TransformStats, TransformError>
where
    F: FnMut(EitherOrBoth<Ipv6Addr, Ipv6Addr>) -> Option<Ipv6Addr>,
{
    let mut stats = TransformStats::default();
    let mut writer = AddressSetWriter::create(output)?;
    let mut left_iter = SortedAddresses::open(left)?;
    let mut right_iter = SortedAddresses::open(right)?;

    for item in (&mut left_iter).merge_join_by(&mut right_iter, |a, b| a.cmp(b)) {
        if let Some(addr) = keep(item) {
            writer.write_record(&AddressRecord::new(addr))?;
        }
    }

    stats.read = left_iter.finish()? + right_iter.finish()?;
    stats.written = writer.commit()?;
    stats.removed = stats.read.saturating_sub(stats.written);
    Ok(stats)
}

/// Records present in both sorted sets.
pub fn intersect(left: &Path, right: &Path, output: &Path) -> Result<TransformStats, TransformError> {
    merge_sets(left, right, output, |item| match item {
        EitherOrBoth::Both(addr, _) => Some(addr),
        _ => None,
    })
}

/// Records of `left` absent from `right`.
pub fn difference(left: &Path, right: &Path, output: &Path) -> Result<TransformStats, TransformError> {
    merge_sets(left, right, output, |item| match item {
        EitherOrBoth::Left(addr) => Some(addr),
        _ => None,
    })
}

fn merge_slices<'a, T, F>(left: &'a [T], right: &'a [T], keep: F) -> Vec<T>
where
    T: Ord + Clone + 'a,
    F: FnMut(EitherOrBoth<&'a T, &'a T>) -> Option<&'a T>,
{
    left.iter()
        .merge_join_by(right.iter(), |a, b| a.cmp(b))
        .filter_map(keep)
        .cloned()
        .collect()
}

/// In-memory `intersect` over sorted, deduplicated slices.
pub fn intersect_sorted<T: Ord + Clone>(left: &[T], right: &[T]) -> Vec<T> {
    merge_slices(left, right, |item| match item {
        EitherOrBoth::Both(value, _) => Some(value),
        _ => None,
    })
}

pub fn difference_sorted<T: Ord + Clone>(left: &[T], right: &[T]) -> Vec<T> {
    merge_slices(left, right, |item| match item {
        EitherOrBoth::Left(value) => Some(value),
        _ => None,
    })
}

pub fn union_sorted<T: Ord + Clone>(left: &[T], right: &[T]) -> Vec<T> {
    merge_slices(left, right, |item| match item {
        EitherOrBoth::Both(value, _) | EitherOrBoth::Left(value) | EitherOrBoth::Right(value) => {
            Some(value)
        }
    })
}
