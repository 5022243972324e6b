//! scalar-datagen library
//!
//! Front-end helpers for the `scalar-datagen` binary: CSV export of
//! generated column sets and per-column statistics. Generation itself lives
//! in the `datagen-generator` crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate a dataset and write it as CSV
//! scalar-datagen generate --config dataset.yaml --output out.csv --rows 100000
//!
//! # Check every field configuration without generating
//! scalar-datagen validate --config dataset.yaml
//! ```

pub mod export;
pub mod summary;

pub use export::{render_cell, CsvExporter, ExportError, ExportReport};
pub use summary::{summarize, summarize_column, ColumnSummary};
