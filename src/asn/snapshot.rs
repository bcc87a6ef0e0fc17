// Tue Jan 13 2026 - Alex

use crate::asn::error::LookupError;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})-(\d{2})-(\d{2})|(\d{4})(\d{2})(\d{2})").expect("valid date regex")
});

/// First `YYYY-MM-DD` or `YYYYMMDD` date embedded in a file name.
pub fn date_from_name(name: &str) -> Option<NaiveDate> {
    DATE_PATTERN.captures_iter(name).find_map(|caps| {
        let (y, m, d) = if caps.get(1).is_some() {
            (caps.get(1)?, caps.get(2)?, caps.get(3)?)
        } else {
            (caps.get(4)?, caps.get(5)?, caps.get(6)?)
        };

        NaiveDate::from_ymd_opt(
            y.as_str().parse().ok()?,
            m.as_str().parse().ok()?,
            d.as_str().parse().ok()?,
        )
    })
}

pub fn date_from_path(path: &Path) -> Option<NaiveDate> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(date_from_name)
}

/// Most recent dated snapshot in `dir` at or before `target`. Ties on the date
/// resolve to the lexicographically greatest file name.
pub fn select_snapshot(dir: &Path, target: NaiveDate) -> Result<PathBuf, LookupError> {
    let entries = fs::read_dir(dir).map_err(|source| LookupError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut best: Option<(NaiveDate, PathBuf)> = None;

    for entry in entries {
        let entry = entry.map_err(|source| LookupError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let date = match date_from_path(&path) {
            Some(date) if date <= target => date,
            _ => continue,
        };

        let better = match &best {
            Some((best_date, best_path)) => (date, &path) > (*best_date, best_path),
            None => true,
        };
        if better {
            best = Some((date, path));
        }
    }

    best.map(|(_, path)| path).ok_or_else(|| LookupError::NoSnapshot {
        dir: dir.to_path_buf(),
        date: target,
    })
}

/// A file is used as is; a directory is searched with `select_snapshot`
/// (target defaults to today).
pub fn resolve(path: &Path, target: Option<NaiveDate>) -> Result<PathBuf, LookupError> {
    if path.is_dir() {
        let target = target.unwrap_or_else(|| Local::now().date_naive());
        let selected = select_snapshot(path, target)?;
        log::info!("Using routing snapshot {} for {}", selected.display(), target);
        Ok(selected)
    } else if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(LookupError::Missing(path.to_path_buf()))
    }
}
