// Tue Jan 13 2026 - Alex

use crate::stability::error::StabilityError;
use chrono::{Days, Local, NaiveDate};
use std::path::{Path, PathBuf};

/// A hitlist snapshot and the day it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Layouts tried for each day, in order. The first one with a match wins.
fn day_patterns(base: &str, extension: &str, date: NaiveDate) -> [String; 3] {
    let day = date.format("%Y-%m-%d");
    let month = date.format("%Y-%m");
    [
        format!("{}/{}/{}-{}.csv*", base, month, day, extension),
        format!("{}/{}-*.csv.{}*", base, day, extension),
        format!("{}/{}-{}.csv*", base, day, extension),
    ]
}

fn matching_files(pattern: &str) -> Result<Vec<PathBuf>, StabilityError> {
    let entries = glob::glob(pattern).map_err(|source| StabilityError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StabilityError::Walk {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Walks day by day from `start` through today (or up to, not including,
/// `end`) and picks at most one snapshot per day. `limit` caps the number of
/// snapshots; 0 means no cap.
pub fn find_snapshots(
    base: &Path,
    extension: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
    limit: usize,
) -> Result<Vec<DatedFile>, StabilityError> {
    let base = glob::Pattern::escape(&base.to_string_lossy());
    let extension = glob::Pattern::escape(extension);
    let today = Local::now().date_naive();

    let mut files = Vec::new();
    let mut date = start;

    while date <= today
        && end.map_or(true, |end| date < end)
        && (limit == 0 || files.len() < limit)
    {
        for pattern in day_patterns(&base, &extension, date) {
            let mut paths = matching_files(&pattern)?;
            if paths.is_empty() {
                continue;
            }
            if paths.len() > 1 {
                log::warn!(
                    "{} snapshots for {}, using {}",
                    paths.len(),
                    date,
                    paths[0].display()
                );
            }
            files.push(DatedFile {
                date,
                path: paths.swap_remove(0),
            });
            break;
        }

        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    log::debug!("Found {} snapshots from {}", files.len(), start);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_each_layout_is_found() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        touch(&base.join("2024-03/2024-03-01-total.csv.xz"));
        touch(&base.join("2024-03-02-icmp.csv.total"));
        touch(&base.join("2024-03-04-total.csv"));

        let files = find_snapshots(base, "total", day(1), Some(day(6)), 0).unwrap();

        let dates: Vec<NaiveDate> = files.iter().map(|f| f.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(4)]);
        assert_eq!(files[0].path, base.join("2024-03/2024-03-01-total.csv.xz"));
    }

    #[test]
    fn test_end_is_exclusive_and_limit_caps() {
        let dir = TempDir::new().unwrap();
        for d in 1..=5 {
            touch(&dir.path().join(format!("2024-03-0{}-total.csv", d)));
        }

        let until = find_snapshots(dir.path(), "total", day(1), Some(day(4)), 0).unwrap();
        let limited = find_snapshots(dir.path(), "total", day(2), None, 2).unwrap();

        assert_eq!(until.len(), 3);
        assert_eq!(limited.iter().map(|f| f.date).collect::<Vec<_>>(), vec![day(2), day(3)]);
    }

    #[test]
    fn test_one_file_per_day() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("2024-03-01-icmp.csv.total"));
        touch(&dir.path().join("2024-03-01-tcp80.csv.total"));
        touch(&dir.path().join("2024-03-01-total.csv"));

        let files = find_snapshots(dir.path(), "total", day(1), Some(day(2)), 0).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, dir.path().join("2024-03-01-icmp.csv.total"));
    }
}
