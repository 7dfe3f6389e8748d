use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error};

use crate::chunker::StatementChunker;
use crate::error::ChunkerError;
use crate::model::{FileType, Metadata, ProcessResult};

/// File-level facts reported next to a processing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub file_path: PathBuf,
    pub file_size: u64,
    pub file_type: FileType,
    pub num_chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    #[serde(flatten)]
    pub result: ProcessResult,
    pub file_info: FileInfo,
}

/// Outcome of one file in a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchEntry {
    Processed(FileReport),
    Failed { file_path: PathBuf, error: String },
}

impl BatchEntry {
    pub fn file_path(&self) -> &Path {
        match self {
            BatchEntry::Processed(report) => &report.file_info.file_path,
            BatchEntry::Failed { file_path, .. } => file_path,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BatchEntry::Failed { .. })
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    modified: Option<SystemTime>,
    size: u64,
    report: FileReport,
}

/// Caching and batch front end over [`StatementChunker`].
///
/// Results are cached per canonical path and reused while the file's
/// modification time and size are unchanged.
pub struct ChunkService {
    chunker: StatementChunker,
    cache: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl ChunkService {
    pub fn new(chunker: StatementChunker) -> Self {
        ChunkService {
            chunker,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn chunker(&self) -> &StatementChunker {
        &self.chunker
    }

    pub fn process_file(&self, path: &Path) -> Result<FileReport, ChunkerError> {
        let stat = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ChunkerError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ChunkerError::Io(e),
        })?;
        let file_type = FileType::from_path(path)?;
        let key = std::fs::canonicalize(path)?;
        let modified = stat.modified().ok();
        let size = stat.len();

        if let Some(entry) = self.cache.lock().get(&key) {
            if entry.modified == modified && entry.size == size {
                debug!(file = %path.display(), "cache hit");
                return Ok(entry.report.clone());
            }
        }

        let result = self.chunker.process(path)?;
        let report = FileReport {
            file_info: FileInfo {
                file_path: path.to_path_buf(),
                file_size: size,
                file_type,
                num_chunks: result.chunks().len(),
            },
            result,
        };

        self.cache.lock().insert(
            key,
            CacheEntry {
                modified,
                size,
                report: report.clone(),
            },
        );
        Ok(report)
    }

    pub fn chunks(&self, path: &Path) -> Result<Vec<String>, ChunkerError> {
        Ok(self.process_file(path)?.result.chunks().to_vec())
    }

    pub fn metadata(&self, path: &Path) -> Result<Metadata, ChunkerError> {
        Ok(self.process_file(path)?.result.metadata().clone())
    }

    pub fn is_fallback_used(&self, path: &Path) -> Result<bool, ChunkerError> {
        Ok(self.process_file(path)?.result.fallback_used())
    }

    /// Process files in parallel. Entries come back in input order and a
    /// failing file does not stop the others.
    pub fn batch_process(&self, paths: &[PathBuf]) -> Vec<BatchEntry> {
        paths
            .par_iter()
            .map(|path| match self.process_file(path) {
                Ok(report) => BatchEntry::Processed(report),
                Err(e) => {
                    error!(file = %path.display(), error = %e, "failed to process");
                    BatchEntry::Failed {
                        file_path: path.clone(),
                        error: e.to_string(),
                    }
                }
            })
            .collect()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkerConfig;
    use std::io::Write;

    const STATEMENT: &str = "\
Account Holder: John Doe
Date,Narration,Chq/Ref,Date_1,Withdrawal,Deposit,Balance
01/04/2024,UPI-ACME,R1,01/04/2024,250.00,,9750.00
02/04/2024,SALARY,R2,02/04/2024,,50000.00,59750.00
";

    fn service() -> ChunkService {
        ChunkService::new(StatementChunker::new(ChunkerConfig::default()).unwrap())
    }

    fn csv_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_process_file_reports_file_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = csv_file(&dir, "stmt.csv", STATEMENT);
        let report = service().process_file(&path).unwrap();

        assert_eq!(report.file_info.file_type, FileType::Csv);
        assert_eq!(report.file_info.file_size, STATEMENT.len() as u64);
        assert_eq!(report.file_info.num_chunks, 2);
        assert!(!report.result.fallback_used());
    }

    #[test]
    fn test_results_are_cached_until_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = csv_file(&dir, "stmt.csv", STATEMENT);
        let svc = service();

        let first = svc.process_file(&path).unwrap();
        let second = svc.process_file(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(svc.cached_len(), 1);

        csv_file(&dir, "stmt.csv", "Account Holder: Jane Roe\nno table here at all\n");
        let third = svc.process_file(&path).unwrap();
        assert!(third.result.fallback_used());
        assert_eq!(svc.cached_len(), 1);

        svc.clear_cache();
        assert_eq!(svc.cached_len(), 0);
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = csv_file(&dir, "a.csv", STATEMENT);
        let missing = dir.path().join("missing.csv");
        let wrong_type = csv_file(&dir, "notes.txt", "hello");

        let entries = service().batch_process(&[good.clone(), missing.clone(), wrong_type]);
        assert_eq!(entries.len(), 3);
        assert!(!entries[0].is_failed());
        assert_eq!(entries[0].file_path(), good.as_path());
        assert!(entries[1].is_failed());
        assert_eq!(entries[1].file_path(), missing.as_path());
        match &entries[2] {
            BatchEntry::Failed { error, .. } => assert!(error.contains("unsupported file type")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_convenience_accessors() {
        let dir = tempfile::tempdir().unwrap();
        let path = csv_file(&dir, "stmt.csv", STATEMENT);
        let svc = service();

        assert_eq!(svc.metadata(&path).unwrap().get("Account Holder"), Some("John Doe"));
        assert_eq!(svc.chunks(&path).unwrap().len(), 2);
        assert!(!svc.is_fallback_used(&path).unwrap());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = service()
            .process_file(Path::new("/nonexistent/stmt.pdf"))
            .unwrap_err();
        assert!(matches!(err, ChunkerError::NotFound { .. }));

        let err = service()
            .process_file(Path::new("/nonexistent/notes.txt"))
            .unwrap_err();
        assert!(matches!(err, ChunkerError::NotFound { .. }));
    }
}
