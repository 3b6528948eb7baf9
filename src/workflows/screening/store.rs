use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::catalog;
use super::domain::{SchemaMismatch, StoredRow, RECORD_WIDTH};

/// Append-only tabular store holding one row per respondent.
pub trait ResponseStore: Send + Sync {
    fn read_all(&self) -> Result<Vec<StoredRow>, StoreError>;
    fn append(&self, rows: Vec<StoredRow>) -> Result<(), StoreError>;
    fn width(&self) -> usize;

    /// Most recently appended row.
    fn last(&self) -> Result<Option<StoredRow>, StoreError> {
        Ok(self.read_all()?.pop())
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    #[error("response store unavailable: {0}")]
    Unavailable(String),
    #[error("response store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("response store data is malformed: {0}")]
    Csv(#[from] csv::Error),
}

fn ensure_width(rows: &[StoredRow], width: usize) -> Result<(), SchemaMismatch> {
    match rows.iter().find(|row| row.width() != width) {
        Some(row) => Err(SchemaMismatch::RowWidth {
            expected: width,
            found: row.width(),
        }),
        None => Ok(()),
    }
}

/// Process-local store used by tests and the demo server.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResponseStore {
    rows: Arc<Mutex<Vec<StoredRow>>>,
}

impl InMemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<StoredRow>) -> Result<Self, StoreError> {
        ensure_width(&rows, RECORD_WIDTH)?;
        Ok(Self {
            rows: Arc::new(Mutex::new(rows)),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseStore for InMemoryResponseStore {
    fn read_all(&self) -> Result<Vec<StoredRow>, StoreError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(rows.clone())
    }

    fn append(&self, rows: Vec<StoredRow>) -> Result<(), StoreError> {
        ensure_width(&rows, RECORD_WIDTH)?;
        let mut stored = self
            .rows
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        stored.extend(rows);
        Ok(())
    }

    fn width(&self) -> usize {
        RECORD_WIDTH
    }
}

/// Comma-delimited file with a header row, created on first append.
#[derive(Debug)]
pub struct CsvResponseStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvResponseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Width of the stored header row; `None` while the file is missing or empty.
    fn header_width(&self) -> Result<Option<usize>, StoreError> {
        if !self.path.exists() || std::fs::metadata(&self.path)?.len() == 0 {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;
        let width = reader.headers()?.len();
        Ok((width > 0).then_some(width))
    }

    fn ensure_header(&self) -> Result<bool, StoreError> {
        match self.header_width()? {
            None => Ok(false),
            Some(RECORD_WIDTH) => Ok(true),
            Some(found) => Err(SchemaMismatch::RowWidth {
                expected: RECORD_WIDTH,
                found,
            }
            .into()),
        }
    }

    fn read_rows(&self) -> Result<Vec<StoredRow>, StoreError> {
        if !self.ensure_header()? {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let row = StoredRow(record?.iter().map(str::to_string).collect());
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }
        ensure_width(&rows, RECORD_WIDTH)?;
        Ok(rows)
    }
}

impl ResponseStore for CsvResponseStore {
    fn read_all(&self) -> Result<Vec<StoredRow>, StoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        self.read_rows()
    }

    fn append(&self, rows: Vec<StoredRow>) -> Result<(), StoreError> {
        ensure_width(&rows, RECORD_WIDTH)?;
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;

        let needs_header = !self.ensure_header()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new().from_writer(file);
        if needs_header {
            writer.write_record(catalog::column_headers())?;
        }
        for row in &rows {
            writer.write_record(row.cells())?;
        }
        writer.flush()?;

        debug!(path = %self.path.display(), appended = rows.len(), "response rows appended");
        Ok(())
    }

    fn width(&self) -> usize {
        RECORD_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(identifier: &str) -> StoredRow {
        let mut cells = vec!["Sí".to_string(); RECORD_WIDTH];
        cells[0] = "Ana Pérez".to_string();
        cells[1] = identifier.to_string();
        StoredRow(cells)
    }

    fn scratch_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "risk-screening-{name}-{}.csv",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn memory_store_keeps_append_order() {
        let store = InMemoryResponseStore::new();
        store.append(vec![row("1"), row("2")]).expect("append");
        store.append(vec![row("3")]).expect("append");

        let last = store.last().expect("read").expect("row present");
        assert_eq!(last.identifier(), Some("3"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn memory_store_rejects_other_widths() {
        let store = InMemoryResponseStore::new();
        let error = store
            .append(vec![StoredRow(vec!["x".to_string(); 10])])
            .expect_err("narrow row rejected");
        assert!(matches!(
            error,
            StoreError::Schema(SchemaMismatch::RowWidth { found: 10, .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn csv_store_writes_header_once_and_reads_back() {
        let path = scratch_path("roundtrip");
        let store = CsvResponseStore::new(&path);
        assert!(store.read_all().expect("missing file reads empty").is_empty());

        store.append(vec![row("11")]).expect("first append");
        store.append(vec![row("12")]).expect("second append");

        let rows = store.read_all().expect("read");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].identifier(), Some("12"));

        let raw = std::fs::read_to_string(&path).expect("file exists");
        assert_eq!(raw.matches("Nombre completo").count(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn csv_store_skips_blank_rows() {
        let path = scratch_path("blank");
        let store = CsvResponseStore::new(&path);
        store.append(vec![row("21")]).expect("append");
        store
            .append(vec![StoredRow(vec![String::new(); RECORD_WIDTH])])
            .expect("blank row append");

        let rows = store.read_all().expect("read");
        assert_eq!(rows.len(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn csv_store_treats_an_empty_file_as_a_fresh_store() {
        let path = scratch_path("touched");
        std::fs::write(&path, "").expect("touch store");
        let store = CsvResponseStore::new(&path);

        assert!(store.read_all().expect("empty file reads empty").is_empty());
        store.append(vec![row("31")]).expect("append");

        let rows = store.read_all().expect("read");
        assert_eq!(rows.len(), 1);
        let raw = std::fs::read_to_string(&path).expect("file exists");
        assert!(raw.starts_with("Nombre completo,"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn csv_store_refuses_to_append_to_foreign_layouts() {
        let path = scratch_path("foreign-append");
        std::fs::write(&path, "a,b,c\n").expect("write fixture");
        let store = CsvResponseStore::new(&path);

        assert!(matches!(
            store.append(vec![row("41")]),
            Err(StoreError::Schema(SchemaMismatch::RowWidth { found: 3, .. }))
        ));
        let raw = std::fs::read_to_string(&path).expect("file exists");
        assert_eq!(raw, "a,b,c\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn csv_store_rejects_foreign_layouts() {
        let path = scratch_path("foreign");
        std::fs::write(&path, "a,b,c\n1,2,3\n").expect("write fixture");
        let store = CsvResponseStore::new(&path);

        assert!(matches!(
            store.read_all(),
            Err(StoreError::Schema(SchemaMismatch::RowWidth { found: 3, .. }))
        ));
        let _ = std::fs::remove_file(&path);
    }
}
