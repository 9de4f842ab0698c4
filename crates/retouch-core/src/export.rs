//! Writing edited documents to disk.
//!
//! Batch export never stops at the first failure: every document gets its
//! own result in the [`ExportReport`], and no document is modified.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::document::Document;
use crate::encode::{encode, save, EncodeError, OutputFormat};

/// Errors for a single exported document.
#[derive(Debug, Error)]
#[error("Failed to export {}: {source}", .path.display())]
pub struct ExportError {
    pub path: PathBuf,
    #[source]
    pub source: EncodeError,
}

/// Batch export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Prepended to every output file name, before the 1-based index
    pub prefix: String,
    /// Force one format for every file (the extension is replaced to match).
    /// `None` keeps each document's own extension.
    pub format: Option<OutputFormat>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            prefix: "processed_".to_string(),
            format: None,
        }
    }
}

/// Outcome of one document in a batch.
#[derive(Debug)]
pub struct ExportItem {
    /// 1-based position in the batch
    pub index: usize,
    pub path: PathBuf,
    pub result: Result<(), ExportError>,
}

/// Per-document outcomes of [`export_all`], in input order.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub items: Vec<ExportItem>,
}

impl ExportReport {
    /// Number of documents written.
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_ok()).count()
    }

    /// The items that failed.
    pub fn failed(&self) -> impl Iterator<Item = &ExportItem> {
        self.items.iter().filter(|item| item.result.is_err())
    }

    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Output file name for the `index`-th (1-based) document of a batch.
///
/// Documents without a name are exported as `image_{index}.png`.
pub fn export_file_name(document: &Document, index: usize, options: &ExportOptions) -> String {
    let fallback = format!("image_{index}.png");
    let name = document.name().unwrap_or(&fallback);
    let name = match options.format {
        Some(format) => Path::new(name)
            .with_extension(format.extension())
            .to_string_lossy()
            .into_owned(),
        None => name.to_string(),
    };
    format!("{}{}_{}", options.prefix, index, name)
}

/// Write one document's current preview to `path`, choosing the format
/// from the extension.
pub fn export_document(document: &Document, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    save(document.current_preview(), path).map_err(|source| ExportError {
        path: path.to_path_buf(),
        source,
    })
}

fn export_with_format(document: &Document, path: &Path, format: OutputFormat) -> Result<(), EncodeError> {
    let bytes = encode(document.current_preview(), format)?;
    std::fs::write(path, bytes).map_err(|e| EncodeError::Io(format!("{}: {}", path.display(), e)))
}

/// Export every document into `dest_dir`.
///
/// The i-th document is written as `{prefix}{i}_{name}`. Failures are
/// recorded and logged; the remaining documents are still exported.
pub fn export_all(documents: &[Document], dest_dir: impl AsRef<Path>, options: &ExportOptions) -> ExportReport {
    let dest_dir = dest_dir.as_ref();
    let mut report = ExportReport::default();

    for (i, document) in documents.iter().enumerate() {
        let index = i + 1;
        let path = dest_dir.join(export_file_name(document, index, options));

        let result = match options.format {
            Some(format) => export_with_format(document, &path, format),
            None => save(document.current_preview(), &path),
        }
        .map_err(|source| ExportError {
            path: path.clone(),
            source,
        });

        match &result {
            Ok(()) => debug!(index, path = %path.display(), "exported"),
            Err(e) => warn!(index, error = %e, "export failed"),
        }
        report.items.push(ExportItem { index, path, result });
    }

    debug!(
        total = report.items.len(),
        succeeded = report.succeeded(),
        "batch export finished"
    );
    report
}
