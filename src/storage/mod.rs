//! Article persistence
//!
//! Articles are written to a single UTF-8 CSV file per run. Nothing is kept
//! between runs; an existing file at the output path is replaced.

pub mod export;

pub use export::{ensure_output_writable, export_csv, read_csv, CSV_HEADER};
