// frbhost-core/src/application/records.rs
//
// USE CASE: base table rows -> vetted FRB JSON records.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::frb::{FRB_PREFIX, FrbRecord, FrbRow, parse_frb_name};
use crate::domain::photometry::{ColumnData, PhotometryTable};
use crate::domain::ports::dispersion::{DispersionModel, ISM_DISTANCE_KPC};
use crate::error::HostError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

pub const DEFAULT_RECORDS_DIR: &str = "data/FRBs";

/// Which rows of the base table to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Names(Vec<String>),
}

impl Selection {
    /// `all` (any case) or a comma separated list of names.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Names(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub out_path: PathBuf,
    /// Skip records whose dispersion-model call fails instead of aborting.
    pub override_failures: bool,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from(DEFAULT_RECORDS_DIR),
            override_failures: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub written: Vec<PathBuf>,
    pub records: Vec<FrbRecord>,
    pub unmatched: Vec<String>,
    pub skipped: Vec<String>,
}

// --- BASE TABLE ---

fn text_cell(data: &ColumnData, row: usize) -> Option<String> {
    match data {
        ColumnData::Text(v) => v.get(row).cloned().flatten(),
        ColumnData::Float(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
        ColumnData::Int(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
    }
}

fn bool_cell(data: &ColumnData, row: usize) -> bool {
    match data {
        ColumnData::Int(v) => v.get(row).copied().flatten().is_some_and(|x| x != 0),
        ColumnData::Float(v) => v.get(row).copied().flatten().is_some_and(|x| x != 0.0),
        ColumnData::Text(v) => v.get(row).cloned().flatten().is_some_and(|s| {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "t" | "yes" | "1")
        }),
    }
}

/// Rows of the FRB base table (`FRB, ra, dec, DM, z, repeater`, optionally
/// `DM_err, RM, RM_err`).
pub fn rows_from_table(table: &PhotometryTable) -> Result<Vec<FrbRow>, DomainError> {
    let required = |name: &str| {
        table
            .column(name)
            .map(|c| &c.data)
            .ok_or_else(|| DomainError::MissingColumn(name.to_string()))
    };
    let optional = |name: &str| -> Result<Vec<Option<f64>>, DomainError> {
        match table.column(name) {
            Some(_) => table.floats(name),
            None => Ok(vec![None; table.row_count()]),
        }
    };

    let names = required("FRB")?;
    let ra = required("ra")?;
    let dec = required("dec")?;
    let repeater = required("repeater")?;
    let dm = table.floats("DM")?;
    let z = table.floats("z")?;
    let dm_err = optional("DM_err")?;
    let rm = optional("RM")?;
    let rm_err = optional("RM_err")?;

    Ok((0..table.row_count())
        .map(|i| FrbRow {
            name: text_cell(names, i).unwrap_or_default(),
            ra: text_cell(ra, i).unwrap_or_default(),
            dec: text_cell(dec, i).unwrap_or_default(),
            dm: dm[i],
            dm_err: dm_err[i],
            z: z[i],
            repeater: bool_cell(repeater, i),
            rm: rm[i],
            rm_err: rm_err[i],
        })
        .collect())
}

/// Canonical form used to match names; unparsable names compare as written.
fn match_key(name: &str) -> String {
    parse_frb_name(name, FRB_PREFIX)
        .unwrap_or_else(|_| name.trim().to_string())
        .to_ascii_uppercase()
}

fn select_rows<'a>(selection: &Selection, rows: &'a [FrbRow]) -> (Vec<&'a FrbRow>, Vec<String>) {
    match selection {
        Selection::All => (rows.iter().collect(), Vec::new()),
        Selection::Names(names) => {
            let mut picked = Vec::new();
            let mut unmatched = Vec::new();
            for name in names {
                let key = match_key(name);
                let hits: Vec<&FrbRow> = rows.iter().filter(|r| match_key(&r.name) == key).collect();
                if hits.is_empty() {
                    warn!(frb = %name, "FRB not found in the base table");
                    unmatched.push(name.clone());
                }
                picked.extend(hits);
            }
            (picked, unmatched)
        }
    }
}

// --- BUILD ---

fn write_record(record: &FrbRecord, out_path: &Path) -> Result<PathBuf, HostError> {
    let path = out_path.join(record.file_name());
    let json = serde_json::to_string_pretty(record).map_err(InfrastructureError::from)?;
    atomic_write(&path, json, true)?;
    Ok(path)
}

/// Build, enrich, vet and write one record per selected row.
///
/// A record failing vetting aborts the batch; nothing is written for it.
#[instrument(skip_all, fields(rows = rows.len(), out = %options.out_path.display()))]
pub fn build_records(
    selection: &Selection,
    rows: &[FrbRow],
    model: &dyn DispersionModel,
    options: &RecordOptions,
) -> Result<BuildReport, HostError> {
    let (picked, unmatched) = select_rows(selection, rows);
    let mut report = BuildReport {
        unmatched,
        ..Default::default()
    };

    for row in picked {
        let record = FrbRecord::from_row(row)?;
        info!(frb = %record.name, "Building FRB JSON file");

        let direction = record.coord().to_galactic();
        let dm_ism = match model.dm_ism(direction, ISM_DISTANCE_KPC) {
            Ok(v) => v,
            Err(e) if options.override_failures => {
                warn!(frb = %record.name, error = %e, "DM_ISM unavailable, record skipped");
                report.skipped.push(record.name);
                continue;
            }
            Err(e) => return Err(e),
        };

        let record = record.with_dm_ism(dm_ism);
        record.vet()?;

        report.written.push(write_record(&record, &options.out_path)?);
        report.records.push(record);
    }

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        unmatched = report.unmatched.len(),
        "All done"
    );
    Ok(report)
}
