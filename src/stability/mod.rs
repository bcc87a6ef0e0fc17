// Tue Jan 13 2026 - Alex

//! Hitlist stability over time.
//!
//! Consecutive dated snapshots of annotated addresses (`address,asn` rows) are
//! compared pairwise. Every record ever seen gets a history: the day it first
//! appeared, then each day it left or came back.

pub mod error;
pub mod timeline;

pub use error::StabilityError;
pub use timeline::{find_snapshots, DatedFile};

use crate::store::{self, AddressRecord};
use crate::transform::setops::{difference_sorted, intersect_sorted, union_sorted};
use chrono::NaiveDate;
use indexmap::IndexMap;
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// Set sizes for one snapshot compared with the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityStep {
    pub date: NaiveDate,
    /// Distinct records seen up to and including this day.
    pub total: usize,
    pub current: usize,
    pub stayed: usize,
    /// Back after being absent from at least one earlier snapshot.
    pub readded: usize,
    /// Never seen before.
    pub new: usize,
    pub gone: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StabilityReport {
    steps: Vec<StabilityStep>,
    history: IndexMap<AddressRecord, Vec<NaiveDate>>,
    skipped: usize,
}

impl StabilityReport {
    pub fn steps(&self) -> &[StabilityStep] {
        &self.steps
    }

    /// Change dates per record, in first-seen order.
    pub fn history(&self) -> &IndexMap<AddressRecord, Vec<NaiveDate>> {
        &self.history
    }

    /// Lines that were not `address[,field...]`, headers included.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// One `address,asn,date;date;...` line per record.
    pub fn write(&self, path: &Path) -> Result<usize, StabilityError> {
        let lines = self
            .history
            .iter()
            .map(|(record, dates)| format!("{},{}", record, dates.iter().join(";")));
        Ok(store::write_lines(path, lines)?)
    }
}

/// `<start>.<extension>.ipstability` in the working directory.
pub fn default_output(start: NaiveDate, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}.ipstability", start, extension))
}

fn load(path: &Path, skipped: &mut usize) -> Result<Vec<AddressRecord>, StabilityError> {
    let mut reader = store::read_lenient(path)?;
    let mut records: Vec<AddressRecord> = reader.by_ref().collect::<Result<_, _>>()?;
    *skipped += reader.skipped();

    records.sort();
    records.dedup();
    Ok(records)
}

/// Compares the snapshots in the order given.
pub fn analyze(files: &[DatedFile]) -> Result<StabilityReport, StabilityError> {
    let mut report = StabilityReport::default();
    let mut seen: Vec<AddressRecord> = Vec::new();
    let mut previous: Vec<AddressRecord> = Vec::new();

    for file in files {
        let current = load(&file.path, &mut report.skipped)?;

        let stayed = intersect_sorted(&current, &previous);
        let arrived = difference_sorted(&current, &previous);
        let gone = difference_sorted(&previous, &current);
        let readded = intersect_sorted(&arrived, &seen);
        let new = difference_sorted(&arrived, &seen);

        for record in &new {
            report.history.insert(record.clone(), vec![file.date]);
        }
        for record in gone.iter().chain(&readded) {
            if let Some(dates) = report.history.get_mut(record) {
                dates.push(file.date);
            }
        }

        seen = union_sorted(&seen, &current);

        let step = StabilityStep {
            date: file.date,
            total: seen.len(),
            current: current.len(),
            stayed: stayed.len(),
            readded: readded.len(),
            new: new.len(),
            gone: gone.len(),
        };
        log::info!(
            "{}: total {} current {} stayed {} readded {} new {} gone {}",
            step.date,
            step.total,
            step.current,
            step.stayed,
            step.readded,
            step.new,
            step.gone
        );
        report.steps.push(step);
        previous = current;
    }

    Ok(report)
}
