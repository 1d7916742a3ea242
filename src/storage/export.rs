//! CSV export of scraped articles

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::models::Article;
use crate::utils::error::ExportError;

/// Column names, in [`Article`] field order
pub const CSV_HEADER: [&str; 9] = [
    "source",
    "title",
    "url",
    "author",
    "publish_time",
    "hash",
    "category",
    "excerpt",
    "scraped_at",
];

/// Write `articles` to `path` as CSV, replacing any existing file
///
/// The header row is always written, also for an empty slice. Parent
/// directories are created as needed. Returns the number of rows written.
///
/// # Errors
///
/// - `ExportError::Io` if the directory or file cannot be created
/// - `ExportError::Csv` if a row cannot be written
///
/// # Example
///
/// ```no_run
/// use tcscrape::models::Article;
/// use tcscrape::storage::export_csv;
///
/// let articles = vec![Article::new("TechCrunch", "Title", "https://techcrunch.com/a/", "", "")];
/// let rows = export_csv(&articles, "out/articles.csv").unwrap();
/// assert_eq!(rows, 1);
/// ```
pub fn export_csv(articles: &[Article], path: impl AsRef<Path>) -> Result<usize, ExportError> {
    let path = path.as_ref();
    create_parent_dirs(path)?;

    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;

    // Header is written by hand so that an empty run still gets one
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(CSV_HEADER)?;

    for article in articles {
        writer.serialize(article)?;
    }
    writer.flush().map_err(|e| ExportError::io(path, e))?;

    tracing::info!(path = %path.display(), rows = articles.len(), "Exported articles to CSV");
    Ok(articles.len())
}

/// Read articles back from a CSV file written by [`export_csv`]
///
/// # Errors
///
/// - `ExportError::Io` if the file cannot be opened
/// - `ExportError::Csv` if a row does not match the article schema
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<Article>, ExportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ExportError::io(path, e))?;

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let mut articles = Vec::new();
    for record in reader.deserialize() {
        articles.push(record?);
    }
    Ok(articles)
}

/// Check that `path` can be written before any network traffic happens
///
/// Creates missing parent directories and opens the file for appending. A
/// file created only by this check is removed again.
///
/// # Errors
///
/// Returns `ExportError::Io` if the directory or file is not writable
pub fn ensure_output_writable(path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    create_parent_dirs(path)?;

    let existed = path.exists();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ExportError::io(path, e))?;

    if !existed {
        fs::remove_file(path).map_err(|e| ExportError::io(path, e))?;
    }

    tracing::debug!(path = %path.display(), "Output path is writable");
    Ok(())
}

fn create_parent_dirs(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))
        }
        _ => Ok(()),
    }
}
