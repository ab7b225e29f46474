//! Folder loading for batch backtest exports.

use std::path::Path;

use tracing::info;

use super::error::LoadError;
use super::normalizer::{SourceDocument, normalize};
use super::record::Dataset;
use super::report::NormalizationReport;

/// Read every file with the given extension from `folder`, sorted by name.
///
/// # Errors
///
/// Returns `LoadError::Io` if the folder cannot be listed or a matching file
/// cannot be read. Malformed contents are not an error here; they surface in
/// the normalization report.
pub fn read_documents(folder: &Path, extension: &str) -> Result<Vec<SourceDocument>, LoadError> {
    let io_error = |path: &Path, source| LoadError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(|e| io_error(folder, e))? {
        let path = entry.map_err(|e| io_error(folder, e))?.path();
        let matches = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = std::fs::read(&path).map_err(|e| io_error(&path, e))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        documents.push(SourceDocument { name, contents });
    }

    info!(folder = %folder.display(), files = documents.len(), "Read backtest documents");
    Ok(documents)
}

/// Read and normalize every matching document of a folder.
///
/// # Errors
///
/// See [`read_documents`].
pub fn load_dir(
    folder: &Path,
    extension: &str,
) -> Result<(Dataset, NormalizationReport), LoadError> {
    let documents = read_documents(folder, extension)?;
    Ok(normalize(&documents))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRADE_DOC: &str = r#"{"considering_timeframes": ["1h"], "trades": [
        {"id": "1", "strategy_name": "s", "symbol": "BTC-USDT", "entry_price": 1, "exit_price": 2,
         "qty": 1, "fee": 0, "size": 1, "PNL": 1, "opened_at": 1000, "closed_at": 2000}
    ]}"#;

    #[test]
    fn test_load_dir_reads_matching_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), TRADE_DOC).unwrap();
        std::fs::write(dir.path().join("a.JSON"), TRADE_DOC).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();

        let (dataset, report) = load_dir(dir.path(), "json").unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].source, "a.JSON");
        assert_eq!(dataset.records()[1].source, "b.json");
        assert_eq!(report.documents_loaded, 2);
        assert_eq!(report.documents_failed(), 1);
        assert_eq!(report.document_failures[0].document, "broken.json");
    }

    #[test]
    fn test_missing_folder_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let Err(LoadError::Io { path, .. }) = load_dir(&missing, "json") else {
            panic!("missing folder should fail");
        };
        assert!(path.ends_with("nope"));
    }
}
