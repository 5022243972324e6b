//! CSV export of generated column sets.

use csv::Writer;
use datagen_core::{Column, ColumnData, ColumnSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for CSV writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Errors that can occur while exporting.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// What an export wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub rows: usize,
    pub columns: usize,
    /// Cells left empty because the row is null
    pub null_cells: usize,
    /// Size of the finished file
    pub bytes: u64,
    pub elapsed: Duration,
}

impl ExportReport {
    pub fn rows_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rows as f64 / secs
        } else {
            0.0
        }
    }
}

/// Writes a [`ColumnSet`] as one CSV row per generated row.
///
/// Null cells are empty, array cells hold a JSON array.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    /// Exporter that writes a header row.
    pub fn new() -> Self {
        Self {
            include_header: true,
        }
    }

    /// Set whether to include a header row in the CSV output.
    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    /// Write `set` to `output_path`, replacing any existing file.
    pub fn export<P: AsRef<Path>>(
        &self,
        set: &ColumnSet,
        output_path: P,
    ) -> Result<ExportReport, ExportError> {
        let start_time = Instant::now();
        let output_path = output_path.as_ref();
        info!(
            "Writing {} rows x {} columns to '{}'",
            set.row_count,
            set.columns.len(),
            output_path.display()
        );

        let file = File::create(output_path)?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = Writer::from_writer(buf_writer);

        if self.include_header {
            writer.write_record(set.column_names())?;
        }

        let mut report = ExportReport {
            columns: set.columns.len(),
            ..Default::default()
        };
        for row in 0..set.row_count {
            let record: Vec<String> = set.columns.iter().map(|c| render_cell(c, row)).collect();
            writer.write_record(&record)?;
            report.null_cells += set.columns.iter().filter(|c| !c.is_valid(row)).count();
            report.rows += 1;
        }

        writer.flush()?;
        drop(writer);

        report.bytes = std::fs::metadata(output_path)?.len();
        report.elapsed = start_time.elapsed();
        debug!(
            "Wrote {} bytes, {} null cells ({:.0} rows/s)",
            report.bytes,
            report.null_cells,
            report.rows_per_second()
        );
        Ok(report)
    }
}

/// Text of one CSV cell.
pub fn render_cell(column: &Column, row: usize) -> String {
    if !column.is_valid(row) {
        return String::new();
    }
    match &column.data {
        ColumnData::Array { .. } => column.data.json_at(row).to_string(),
        data => data
            .scalar_at(row)
            .map(|value| value.to_string())
            .unwrap_or_default(),
    }
}
