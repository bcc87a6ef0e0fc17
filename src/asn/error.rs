// Tue Jan 13 2026 - Alex

use crate::store::StoreError;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Cannot read snapshot directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No routing snapshot in {} at or before {date}", dir.display())]
    NoSnapshot { dir: PathBuf, date: NaiveDate },
    #[error("AS database not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Routing snapshot {} contains no IPv6 prefixes", .0.display())]
    EmptySnapshot(PathBuf),
}
