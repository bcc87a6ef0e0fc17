// Tue Jan 13 2026 - Alex

use crate::store::{AddressSetWriter, ColumnReader};
use crate::transform::error::TransformError;
use crate::transform::TransformStats;
use std::path::Path;

/// Projects one CSV field of every row. Rows too short to carry the field are
/// dropped. The projected text is written verbatim; normalization happens
/// downstream.
pub fn strip_metadata(
    input: &Path,
    output: &Path,
    field: usize,
    skip_header: bool,
) -> Result<TransformStats, TransformError> {
    let mut stats = TransformStats::default();
    let mut writer = AddressSetWriter::create(output)?;

    for value in ColumnReader::open(input, field, skip_header)? {
        stats.read += 1;

        match value? {
            Some(value) => writer.write_line(&value)?,
            None => stats.skipped += 1,
        }
    }

    stats.written = writer.commit()?;
    Ok(stats)
}
