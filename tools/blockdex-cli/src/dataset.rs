//! Dataset template writer.
//!
//! Lays out one directory per category and one CSV file per block, each
//! pre-filled with row ids and empty annotation columns.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blockdex_core::Catalog;
use serde::Serialize;
use tracing::debug;

/// Column header of every template file.
pub const HEADER: [&str; 6] = ["id", "task_type", "block_id", "question", "cot_steps", "answer"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Totals of one dataset write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub categories: usize,
    pub files: usize,
    pub rows: usize,
}

/// Writes annotation templates for every record of a catalog.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    root: PathBuf,
    rows_per_record: usize,
    task_type: String,
}

impl DatasetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rows_per_record: 5,
            task_type: "explain".into(),
        }
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows_per_record = rows;
        self
    }

    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    /// Writes `<root>/<category>/<record>.csv` for every record, replacing
    /// existing files.
    pub fn write(&self, catalog: &Catalog) -> Result<DatasetSummary> {
        let mut summary = DatasetSummary::default();

        for group in catalog.categories() {
            let dir = self.root.join(path_component(&group.label));
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            summary.categories += 1;

            for record in &group.records {
                let path = self.write_record(&dir, &record.name)?;
                debug!(path = %path.display(), "template written");
                summary.files += 1;
                summary.rows += self.rows_per_record;
            }
        }

        Ok(summary)
    }

    fn write_record(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let path = dir.join(format!("{}.csv", path_component(name)));
        let mut file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(UTF8_BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);
        writer.write_record(HEADER)?;
        for i in 1..=self.rows_per_record {
            let id = format!("{name}_{i:03}");
            writer.write_record([id.as_str(), self.task_type.as_str(), name, "", "", ""])?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to write {}", path.display()))?;

        Ok(path)
    }
}

/// Keeps labels and names from escaping their directory.
fn path_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}
