use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::Table,
};

use super::RawTables;

pub const COURSES_FILE: &str = "courses.csv";
pub const STUDENTS_FILE: &str = "students.csv";
pub const ENROLLMENTS_FILE: &str = "enrollments.csv";
pub const ACADEMIC_RECORDS_FILE: &str = "academic_records.csv";

/// Supplier of the raw input tables
///
/// Implementations own storage and discovery; the recommender only sees
/// string-typed tables.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Loads all four tables. Fails only when a required table is unreadable.
    async fn load(&self) -> AppResult<RawTables>;

    /// Human-readable description for logging
    fn describe(&self) -> String;
}

/// Reads the tables from CSV files in one directory
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    data_dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    async fn read_required(&self, file: &str) -> AppResult<Table> {
        let path = self.data_dir.join(file);
        match read_table(&path).await? {
            Some(table) => Ok(table),
            None => Err(AppError::MissingTable(path.display().to_string())),
        }
    }

    async fn read_optional(&self, file: &str) -> AppResult<Table> {
        let path = self.data_dir.join(file);
        match read_table(&path).await? {
            Some(table) => Ok(table),
            None => {
                tracing::warn!(path = %path.display(), "Optional table not found; using empty table");
                Ok(Table::default())
            }
        }
    }
}

#[async_trait]
impl TableSource for CsvDirectorySource {
    async fn load(&self) -> AppResult<RawTables> {
        tracing::info!(data_dir = %self.data_dir.display(), "Loading tables");

        Ok(RawTables {
            courses: self.read_required(COURSES_FILE).await?,
            students: self.read_required(STUDENTS_FILE).await?,
            enrollments: self.read_required(ENROLLMENTS_FILE).await?,
            academic_records: self.read_optional(ACADEMIC_RECORDS_FILE).await?,
        })
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.data_dir.display())
    }
}

/// Reads and parses one CSV file; `Ok(None)` when it does not exist
async fn read_table(path: &Path) -> AppResult<Option<Table>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let table = parse_table(&content)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "Table loaded");
    Ok(Some(table))
}

/// Parses CSV text into a string-typed table
///
/// Every field is trimmed, ragged rows are padded or truncated to the header
/// width, and malformed records are skipped with a warning.
pub fn parse_table(content: &str) -> AppResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(e) => {
                skipped += 1;
                tracing::warn!(line = line + 2, error = %e, "Skipping malformed CSV row");
            }
        }
    }

    if skipped > 0 {
        tracing::info!(parsed = rows.len(), skipped, "CSV parsing finished with skipped rows");
    }

    Ok(Table::new(headers, rows))
}
