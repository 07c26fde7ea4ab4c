/*!
 * In-memory CSV table.
 *
 * A whole file is loaded, edited column-wise and written back in place. Rows
 * may be short; missing trailing cells read as empty and are created on write.
 * Rows wider than the header are rejected at load so that no cell can be lost
 * or mistaken for a new column.
 */

use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::TableError;

/// A CSV file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a CSV file with a header row
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let csv_error = |source| TableError::Csv {
            path: path.display().to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(String::from)
            .collect();

        let width = headers.len();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            if record.len() > width {
                return Err(TableError::WideRow {
                    path: path.display().to_string(),
                    line: record.position().map_or(rows.len() + 2, |p| p.line() as usize),
                    found: record.len(),
                    expected: width,
                });
            }
            rows.push(record.iter().map(String::from).collect());
        }

        debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// Build a table from parts, bound to `path` for saving
    pub fn from_parts(path: impl Into<PathBuf>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            path: path.into(),
            headers,
            rows,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Rename `from` to `to` unless `to` already exists.
    ///
    /// Returns whether a rename happened.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if self.has_column(to) {
            return false;
        }
        match self.column_index(from) {
            Some(index) => {
                self.headers[index] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Index of column `name`, appending it with empty cells when missing
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.headers.push(name.to_string());
        let width = self.headers.len();
        for row in self.rows.iter_mut().filter(|row| row.len() < width) {
            row.resize(width, String::new());
        }
        width - 1
    }

    /// Cell value; cells past the end of a short row are empty
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) {
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.into();
    }

    /// All values of a named column in row order
    pub fn column_values(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let column = self
            .column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;
        Ok((0..self.rows.len()).map(|row| self.cell(row, column)).collect())
    }

    /// Overwrite the file the table was loaded from
    pub fn save(&self) -> Result<(), TableError> {
        self.save_to(&self.path)
    }

    /// Write the table to `path`, replacing it atomically
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let io_error = |source| TableError::Io {
            path: path.display().to_string(),
            source,
        };
        let csv_error = |source| TableError::Csv {
            path: path.display().to_string(),
            source,
        };

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(directory).map_err(io_error)?;

        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(temp.as_file_mut());
            writer.write_record(&self.headers).map_err(csv_error)?;
            for row in &self.rows {
                writer.write_record(row).map_err(csv_error)?;
            }
            writer.flush().map_err(io_error)?;
        }
        temp.as_file_mut().flush().map_err(io_error)?;

        if let Ok(metadata) = fs::metadata(path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(io_error)?;
        }

        temp.persist(path).map_err(|e| io_error(e.error))?;
        debug!("Saved {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}
