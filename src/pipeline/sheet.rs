//! Spreadsheet tabs as plain string tables
//!
//! The pipeline only ever reads a whole tab, rewrites a whole tab, or
//! clears one. `Sheet` captures exactly that so the Google backend and the
//! local CSV workbook are interchangeable.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::core::{Result, ScoutError};

/// A header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self { header, rows };
        table.pad_rows();
        table
    }

    /// Build from a 2-D value range whose first row is the header
    ///
    /// Short rows are padded with empty cells, as spreadsheets drop trailing
    /// blanks.
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut values = values.into_iter();
        match values.next() {
            Some(header) => Self::new(header, values.collect()),
            None => Self::default(),
        }
    }

    /// Header followed by rows
    pub fn to_values(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }

    fn pad_rows(&mut self) {
        let width = self.header.len();
        for row in &mut self.rows {
            if row.len() < width {
                row.resize(width, String::new());
            }
        }
    }

    /// Index of a header column
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Cell value by column name, `""` when the column is absent
    pub fn cell<'a>(&'a self, row: &'a [String], column: &str) -> &'a str {
        self.column(column)
            .and_then(|i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

/// Trait for spreadsheet backends
#[async_trait]
pub trait Sheet: Send + Sync {
    /// Read a whole tab
    async fn read(&self, tab: &str) -> Result<Table>;

    /// Write a table starting at the top-left cell of a tab
    async fn write(&self, tab: &str, table: &Table) -> Result<()>;

    /// Remove every value from a tab
    async fn clear(&self, tab: &str) -> Result<()>;

    /// Get the backend name
    fn name(&self) -> &str;
}

/// A directory of `<tab>.csv` files standing in for a spreadsheet
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn tab_path(&self, tab: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", tab))
    }
}

#[async_trait]
impl Sheet for CsvWorkbook {
    async fn read(&self, tab: &str) -> Result<Table> {
        let path = self.tab_path(tab);
        if !path.exists() {
            return Err(ScoutError::sheet(format!(
                "Tab '{}' not found at {}",
                tab,
                path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut values = Vec::new();
        for record in reader.records() {
            values.push(record?.iter().map(str::to_string).collect());
        }

        debug!(tab, rows = values.len().saturating_sub(1), "Read CSV tab");
        Ok(Table::from_values(values))
    }

    async fn write(&self, tab: &str, table: &Table) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(self.tab_path(tab))?;
        if !table.header.is_empty() {
            for row in table.to_values() {
                writer.write_record(&row)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    async fn clear(&self, tab: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.tab_path(tab), "")?;
        Ok(())
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::from_values(vec![
            strings(&["Company", "Email", "Status"]),
            strings(&["Vercel"]),
        ]);
        assert_eq!(table.rows[0], strings(&["Vercel", "", ""]));
        assert_eq!(table.cell(&table.rows[0], "Status"), "");
        assert_eq!(table.cell(&table.rows[0], "Missing"), "");
    }

    #[tokio::test]
    async fn test_workbook_write_read_clear() {
        let dir = tempfile::tempdir().unwrap();
        let book = CsvWorkbook::new(dir.path());
        let table = Table::new(
            strings(&["Company", "Status"]),
            vec![strings(&["Vercel", "Outreach"])],
        );

        book.write("Outreach", &table).await.unwrap();
        assert_eq!(book.read("Outreach").await.unwrap(), table);

        book.clear("Outreach").await.unwrap();
        assert!(book.read("Outreach").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tab_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let book = CsvWorkbook::new(dir.path());
        assert!(book.read("Negotiation").await.is_err());
    }
}
