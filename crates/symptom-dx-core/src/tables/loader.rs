//! CSV loaders for the precaution and description tables.
//!
//! Expected headers:
//! - precautions: `Disease, Precaution_1, Precaution_2, Precaution_3, Precaution_4`
//! - descriptions: `Disease, Description`
//!
//! Columns are located by header name; order and extra columns don't matter.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::{ReferenceTable, TableError, TableResult};

const PRECAUTIONS: &str = "precautions";
const DESCRIPTIONS: &str = "descriptions";

const DISEASE_COLUMN: &str = "Disease";
const DESCRIPTION_COLUMN: &str = "Description";
const PRECAUTION_COLUMNS: [&str; 4] = [
    "Precaution_1",
    "Precaution_2",
    "Precaution_3",
    "Precaution_4",
];

/// Separator between merged precautions.
pub const PRECAUTION_SEPARATOR: &str = ", ";

/// Raw precaution record before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecautionRow {
    pub disease: String,
    /// `Precaution_1..4`, in column order
    pub precautions: [Option<String>; 4],
}

impl PrecautionRow {
    /// Join the present precautions with [`PRECAUTION_SEPARATOR`].
    ///
    /// Absent cells (missing, blank, or a literal `nan`) are dropped, so the
    /// output never holds empty segments. No present cell yields `""`.
    pub fn merged(&self) -> String {
        self.precautions
            .iter()
            .filter_map(|cell| cell.as_deref())
            .filter(|cell| is_present(cell))
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(PRECAUTION_SEPARATOR)
    }
}

/// Whether a raw cell holds a value.
pub fn is_present(cell: &str) -> bool {
    let trimmed = cell.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan")
}

/// Load the precaution table from a CSV file.
pub fn load_precautions_path<P: AsRef<Path>>(path: P) -> TableResult<ReferenceTable> {
    load_precautions(open(PRECAUTIONS, path.as_ref())?)
}

/// Load the description table from a CSV file.
pub fn load_descriptions_path<P: AsRef<Path>>(path: P) -> TableResult<ReferenceTable> {
    load_descriptions(open(DESCRIPTIONS, path.as_ref())?)
}

/// Load the precaution table from CSV data.
pub fn load_precautions<R: Read>(reader: R) -> TableResult<ReferenceTable> {
    let mut table = ReferenceTable::default();
    for row in read_precaution_rows(reader)? {
        let merged = row.merged();
        if table.insert(&row.disease, merged).is_some() {
            tracing::warn!(disease = %row.disease, "Duplicate precaution row, keeping the last one");
        }
    }
    Ok(table)
}

/// Parse precaution rows without merging them.
pub fn read_precaution_rows<R: Read>(reader: R) -> TableResult<Vec<PrecautionRow>> {
    let mut csv = csv_reader(reader);
    let headers = headers(PRECAUTIONS, &mut csv)?;

    let disease_idx = column_index(PRECAUTIONS, &headers, DISEASE_COLUMN)?;
    let mut precaution_idx = [0usize; 4];
    for (slot, column) in precaution_idx.iter_mut().zip(PRECAUTION_COLUMNS) {
        *slot = column_index(PRECAUTIONS, &headers, column)?;
    }

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record.map_err(|source| TableError::Csv {
            table: PRECAUTIONS,
            source,
        })?;
        let disease = disease_cell(PRECAUTIONS, &record, disease_idx)?;
        let precautions = precaution_idx.map(|idx| record.get(idx).map(str::to_string));

        rows.push(PrecautionRow {
            disease,
            precautions,
        });
    }

    Ok(rows)
}

/// Load the description table from CSV data.
pub fn load_descriptions<R: Read>(reader: R) -> TableResult<ReferenceTable> {
    let mut csv = csv_reader(reader);
    let headers = headers(DESCRIPTIONS, &mut csv)?;

    let disease_idx = column_index(DESCRIPTIONS, &headers, DISEASE_COLUMN)?;
    let description_idx = column_index(DESCRIPTIONS, &headers, DESCRIPTION_COLUMN)?;

    let mut table = ReferenceTable::default();
    for record in csv.records() {
        let record = record.map_err(|source| TableError::Csv {
            table: DESCRIPTIONS,
            source,
        })?;
        let disease = disease_cell(DESCRIPTIONS, &record, disease_idx)?;
        let description = record
            .get(description_idx)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        if table.insert(&disease, description).is_some() {
            tracing::warn!(disease = %disease, "Duplicate description row, keeping the last one");
        }
    }

    Ok(table)
}

fn open(table: &'static str, path: &Path) -> TableResult<File> {
    File::open(path).map_err(|source| TableError::Io {
        table,
        path: path.to_path_buf(),
        source,
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    // Flexible: trailing empty precaution cells are often omitted entirely.
    ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader)
}

fn headers<R: Read>(table: &'static str, csv: &mut csv::Reader<R>) -> TableResult<StringRecord> {
    csv.headers()
        .cloned()
        .map_err(|source| TableError::Csv { table, source })
}

fn column_index(table: &'static str, headers: &StringRecord, column: &str) -> TableResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| TableError::MissingColumn {
            table,
            column: column.to_string(),
        })
}

fn disease_cell(table: &'static str, record: &StringRecord, idx: usize) -> TableResult<String> {
    match record.get(idx).map(str::trim) {
        Some(disease) if !disease.is_empty() => Ok(disease.to_string()),
        _ => Err(TableError::MissingDisease {
            table,
            line: record.position().map(|p| p.line()).unwrap_or_default(),
        }),
    }
}
