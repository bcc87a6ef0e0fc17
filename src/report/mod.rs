// Tue Jan 13 2026 - Alex

use crate::graph::{Combination, Plan};
use crate::store::{self, AddressSetWriter, StoreError};
use crate::ui::table::{Alignment, BorderStyle, TableBuilder};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(flatten)]
    pub combination: Combination,
    /// Seed-excluded candidates that also appear in the scan set.
    pub candidates: usize,
    /// Of those, addresses responsive over this protocol.
    pub responsive: usize,
    pub hit_rate: f64,
}

impl ResultRow {
    pub fn new(combination: Combination, candidates: usize, responsive: usize) -> Self {
        let hit_rate = if candidates == 0 {
            0.0
        } else {
            responsive as f64 / candidates as f64
        };
        Self {
            combination,
            candidates,
            responsive,
            hit_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultMatrix {
    pub generated_at: DateTime<Local>,
    pub rows: Vec<ResultRow>,
}

impl ResultMatrix {
    /// Counts the terminal sets of a finished run, in plan order.
    pub fn collect(plan: &Plan) -> Result<Self, StoreError> {
        let layout = &plan.layout;
        let mut rows = Vec::with_capacity(plan.combinations.len());

        for combination in &plan.combinations {
            let candidates = store::count_records(
                &layout.candidates_scanned(&combination.algorithm, &combination.category),
            )?;
            let responsive = store::count_records(&layout.results(
                &combination.algorithm,
                &combination.category,
                &combination.protocol,
            ))?;
            rows.push(ResultRow::new(combination.clone(), candidates, responsive));
        }

        Ok(Self {
            generated_at: Local::now(),
            rows,
        })
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_responsive(&self) -> usize {
        self.rows.iter().map(|r| r.responsive).sum()
    }

    pub fn render(&self, use_color: bool) -> String {
        let mut table = TableBuilder::new()
            .with_headers(&["protocol", "algorithm", "category", "candidates", "responsive", "hit rate"])
            .with_alignment(3, Alignment::Right)
            .with_alignment(4, Alignment::Right)
            .with_alignment(5, Alignment::Right)
            .with_color(use_color)
            .with_border_style(if use_color {
                BorderStyle::Unicode
            } else {
                BorderStyle::Ascii
            });

        for row in &self.rows {
            let c = &row.combination;
            let algorithm = if c.placeholder {
                format!("{}*", c.algorithm)
            } else {
                c.algorithm.clone()
            };
            table = table.add_row(&[
                c.protocol.clone(),
                algorithm,
                c.category.clone(),
                row.candidates.to_string(),
                row.responsive.to_string(),
                format!("{:.2}%", row.hit_rate * 100.0),
            ]);
        }

        table.build()
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_vec_pretty(self)?;
        let mut writer = AddressSetWriter::create(path)?;
        writer.write_raw(&json)?;
        writer.write_raw(b"\n")?;
        writer.commit()?;
        Ok(())
    }
}
