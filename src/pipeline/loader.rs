//! Batch loading: per-year sheets into one unified table.

use super::record::{first_of_month, month_name, Record, SheetRow};
use super::table::Table;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Largest accepted `aum_value`. Sums of up to 10^13 such values stay
/// within `Decimal` range.
pub const MAX_AUM: Decimal = dec!(1_000_000_000_000_000);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("batch '{batch}' not found")]
    MissingBatch { batch: String },
    #[error("batch '{batch}' could not be read: {reason}")]
    Unreadable { batch: String, reason: String },
    #[error("batch '{batch}' is missing required column '{column}'")]
    MissingColumn { batch: String, column: String },
    #[error("batch '{batch}' row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        batch: String,
        row: usize,
        column: String,
        value: String,
    },
    #[error("batch '{batch}' row {row}: no calendar date for year {year} month {month}")]
    InvalidDate {
        batch: String,
        row: usize,
        year: i16,
        month: u8,
    },
}

impl LoadError {
    /// Name of the batch the error was raised for.
    pub fn batch(&self) -> &str {
        match self {
            LoadError::MissingBatch { batch }
            | LoadError::Unreadable { batch, .. }
            | LoadError::MissingColumn { batch, .. }
            | LoadError::InvalidValue { batch, .. }
            | LoadError::InvalidDate { batch, .. } => batch,
        }
    }
}

/// Content digest of a source, used as the memoization key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(String);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something that yields one named batch of rows per reporting year.
pub trait BatchSource {
    /// Batch names in load order.
    fn batch_names(&self) -> &[String];

    /// Open the CSV content of a single batch.
    fn open(&self, batch: &str) -> Result<Box<dyn Read + '_>, LoadError>;
}

/// Every batch body of a source, read once.
///
/// The identity and the parsed table come from the same bytes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    id: SourceId,
    batches: Vec<(String, Vec<u8>)>,
}

impl Snapshot {
    pub fn read(source: &dyn BatchSource) -> Result<Self, LoadError> {
        let mut hasher = Sha256::new();
        let mut batches = Vec::new();
        for batch in source.batch_names() {
            let mut body = Vec::new();
            source
                .open(batch)?
                .read_to_end(&mut body)
                .map_err(|e| unreadable(batch, e))?;
            hasher.update((batch.len() as u64).to_le_bytes());
            hasher.update(batch.as_bytes());
            hasher.update((body.len() as u64).to_le_bytes());
            hasher.update(&body);
            batches.push((batch.clone(), body));
        }
        Ok(Snapshot {
            id: SourceId(hex::encode(hasher.finalize())),
            batches,
        })
    }

    /// SHA-256 over every batch name and body.
    pub fn id(&self) -> &SourceId {
        &self.id
    }

    pub fn into_id(self) -> SourceId {
        self.id
    }

    /// Parse every batch, in order, into one table.
    pub fn parse(&self) -> Result<Table, LoadError> {
        let mut records = Vec::new();
        for (batch, body) in &self.batches {
            let mut batch_records = read_batch(batch, body.as_slice())?;
            log::info!("Read {} records from batch '{}'", batch_records.len(), batch);
            records.append(&mut batch_records);
        }
        Ok(Table::new(records))
    }
}

/// A workbook stored as a directory with one `<batch>.csv` file per sheet.
#[derive(Debug, Clone)]
pub struct WorkbookDir {
    dir: PathBuf,
    sheets: Vec<String>,
}

impl WorkbookDir {
    pub fn new(dir: impl Into<PathBuf>, sheets: Vec<String>) -> Self {
        WorkbookDir {
            dir: dir.into(),
            sheets,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sheet_path(&self, batch: &str) -> PathBuf {
        self.dir.join(format!("{batch}.csv"))
    }
}

impl BatchSource for WorkbookDir {
    fn batch_names(&self) -> &[String] {
        &self.sheets
    }

    fn open(&self, batch: &str) -> Result<Box<dyn Read + '_>, LoadError> {
        let path = self.sheet_path(batch);
        match std::fs::File::open(&path) {
            Ok(file) => Ok(Box::new(io::BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LoadError::MissingBatch {
                batch: batch.to_string(),
            }),
            Err(e) => Err(unreadable(batch, e)),
        }
    }
}

/// In-memory batches, mostly for tests and generated data.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: Vec<String>,
    contents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a batch with its CSV body.
    pub fn with_batch(mut self, name: &str, csv: &str) -> Self {
        self.sheets.push(name.to_string());
        self.contents.insert(name.to_string(), csv.to_string());
        self
    }

    /// Expect a batch that has no content.
    pub fn expect_batch(mut self, name: &str) -> Self {
        self.sheets.push(name.to_string());
        self
    }
}

impl BatchSource for MemorySource {
    fn batch_names(&self) -> &[String] {
        &self.sheets
    }

    fn open(&self, batch: &str) -> Result<Box<dyn Read + '_>, LoadError> {
        match self.contents.get(batch) {
            Some(body) => Ok(Box::new(body.as_bytes())),
            None => Err(LoadError::MissingBatch {
                batch: batch.to_string(),
            }),
        }
    }
}

/// Load every batch of `source`, in order, into one table.
pub fn load(source: &dyn BatchSource) -> Result<Table, LoadError> {
    Snapshot::read(source)?.parse()
}

/// Read and coerce a single batch.
pub fn read_batch<R: Read>(batch: &str, reader: R) -> Result<Vec<Record>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let headers = number_repeats(rdr.headers().map_err(|e| unreadable(batch, e))?);
    for column in SheetRow::columns() {
        if !headers.iter().any(|h| column.accepts(h)) {
            return Err(LoadError::MissingColumn {
                batch: batch.to_string(),
                column: column.name.to_string(),
            });
        }
    }

    rdr.set_headers(headers);

    let mut records = Vec::new();
    for (i, row) in rdr.deserialize::<SheetRow>().enumerate() {
        let row = row.map_err(|e| unreadable(batch, e))?;
        records.push(coerce(batch, i + 1, row)?);
    }
    Ok(records)
}

/// Repeated headers become `name.1`, `name.2`, ... so only the first maps to a field.
fn number_repeats(headers: &csv::StringRecord) -> csv::StringRecord {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    headers
        .iter()
        .map(|h| {
            let n = seen.entry(h).or_insert(0);
            let name = match *n {
                0 => h.to_string(),
                k => format!("{h}.{k}"),
            };
            *n += 1;
            name
        })
        .collect()
}

fn coerce(batch: &str, row: usize, raw: SheetRow) -> Result<Record, LoadError> {
    let cells = Cells { batch, row };
    let year: i16 = cells.integer("year", raw.year)?;
    let month: u8 = cells.integer("month", raw.month)?;
    let aum_value = cells.decimal("aum_value", raw.aum_value)?;
    let client_flag: u8 = cells.integer("client_flag", raw.client_flag)?;

    let invalid_date = || LoadError::InvalidDate {
        batch: batch.to_string(),
        row,
        year,
        month,
    };
    let date = first_of_month(year, month).ok_or_else(invalid_date)?;
    let label = month_name(month).ok_or_else(invalid_date)?;

    Ok(Record {
        year,
        month,
        segment: text(raw.segment),
        desk: text(raw.desk),
        advisor_id: text(raw.advisor_id),
        advisor_name: text(raw.advisor_name),
        client_id: text(raw.client_id),
        client_name: text(raw.client_name),
        aum_value,
        client_flag,
        date,
        month_name: label,
    })
}

struct Cells<'a> {
    batch: &'a str,
    row: usize,
}

impl Cells<'_> {
    fn invalid(&self, column: &str, value: &str) -> LoadError {
        LoadError::InvalidValue {
            batch: self.batch.to_string(),
            row: self.row,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    /// Integers may arrive as `2017` or `2017.0`; blanks become zero.
    fn integer<T>(&self, column: &str, cell: Option<String>) -> Result<T, LoadError>
    where
        T: TryFrom<i64> + Default,
    {
        let Some(value) = present(cell) else {
            return Ok(T::default());
        };
        let whole = match value.parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => parse_decimal(&value)
                .filter(|d| d.fract().is_zero())
                .and_then(|d| d.to_i64()),
        };
        whole
            .and_then(|n| T::try_from(n).ok())
            .ok_or_else(|| self.invalid(column, &value))
    }

    /// Decimal in `0..=MAX_AUM`; blanks become zero.
    fn decimal(&self, column: &str, cell: Option<String>) -> Result<Decimal, LoadError> {
        let Some(value) = present(cell) else {
            return Ok(Decimal::ZERO);
        };
        match parse_decimal(&value) {
            Some(d) if d >= Decimal::ZERO && d <= MAX_AUM => Ok(d),
            _ => Err(self.invalid(column, &value)),
        }
    }
}

fn present(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn text(cell: Option<String>) -> String {
    cell.unwrap_or_default()
}

fn unreadable(batch: &str, err: impl fmt::Display) -> LoadError {
    LoadError::Unreadable {
        batch: batch.to_string(),
        reason: err.to_string(),
    }
}
