//! Lists the documents folder and attaches an extraction to every PDF.

use std::collections::HashMap;
use std::fs::Metadata;
use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::analyzer::DocumentAnalyzer;
use super::cache::{cache_key, ExtractionCache};
use super::models::{ExtractedRecord, ScannedDocument, Sentinel};

/// Extensions listed by a scan. Only PDFs are extracted.
pub const ALLOWED_EXTENSIONS: [&str; 3] = [".pdf", ".docx", ".doc"];

/// Result of one scan. `warning` is set when the folder itself was unusable.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub documents: Vec<ScannedDocument>,
    pub warning: Option<String>,
}

impl ScanOutcome {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            documents: Vec::new(),
            warning: Some(message.into()),
        }
    }
}

pub struct DocumentScanner {
    analyzer: Arc<dyn DocumentAnalyzer>,
    cache: Arc<dyn ExtractionCache>,
    // Records from the most recent scan, by document id
    latest: Mutex<HashMap<String, ExtractedRecord>>,
    // One scan at a time; the analyzer is sequential and cache writes must not race
    scan_lock: Mutex<()>,
}

impl DocumentScanner {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>, cache: Arc<dyn ExtractionCache>) -> Self {
        Self {
            analyzer,
            cache,
            latest: Mutex::new(HashMap::new()),
            scan_lock: Mutex::new(()),
        }
    }

    /// Scan `folder`, newest first. Never fails: unreadable files are skipped
    /// and an unusable folder produces an empty list with a warning.
    pub async fn scan(&self, folder: &Path) -> ScanOutcome {
        let _guard = self.scan_lock.lock().await;

        if !tokio::fs::try_exists(folder).await.unwrap_or(false) {
            warn!(folder = %folder.display(), "Documents folder not found");
            return ScanOutcome::warning(format!(
                "Documents folder not found: {}",
                folder.display()
            ));
        }

        let mut entries = match tokio::fs::read_dir(folder).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(folder = %folder.display(), error = %e, "Failed to read documents folder");
                return ScanOutcome::warning(format!("Failed to read documents folder: {}", e));
            }
        };

        let mut documents = Vec::new();
        let mut latest = HashMap::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Stopped reading documents folder early");
                    break;
                }
            };

            let path = entry.path();
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                    continue;
                }
            };
            if metadata.is_dir() {
                continue;
            }

            let Some(extension) = allowed_extension(&path) else {
                continue;
            };

            let mut document = match describe(&path, &metadata, extension) {
                Some(document) => document,
                None => {
                    warn!(path = %path.display(), "Skipping file without usable timestamps");
                    continue;
                }
            };

            if document.is_pdf() {
                let record = self.extract(&path, &document.id).await;
                latest.insert(document.id.clone(), record.clone());
                document.record = Some(record);
            }

            documents.push(document);
        }

        documents.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| a.filename.cmp(&b.filename))
        });

        *self.latest.lock().await = latest;
        info!(count = documents.len(), folder = %folder.display(), "Scan complete");

        ScanOutcome {
            documents,
            warning: None,
        }
    }

    /// The record a document had in the most recent scan.
    pub async fn record_for(&self, document_id: &str) -> Option<ExtractedRecord> {
        self.latest.lock().await.get(document_id).cloned()
    }

    async fn extract(&self, path: &Path, key: &str) -> ExtractedRecord {
        match self.cache.get(key).await {
            Ok(Some(record)) => {
                debug!(key, "Extraction cache hit");
                return record;
            }
            Ok(None) => {}
            Err(e) => warn!(key, error = %e, "Extraction cache read failed"),
        }

        let record = match self.analyzer.analyze(path).await {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Analyzer failed; marking fields missing");
                ExtractedRecord::sentinel(Sentinel::Missing)
            }
        };

        // Sentinel records are cached too; clearing the cache is the retry path
        if let Err(e) = self.cache.set(key, record.clone()).await {
            warn!(key, error = %e, "Extraction cache write failed");
        }

        record
    }
}

fn allowed_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .iter()
        .copied()
        .find(|allowed| allowed[1..] == extension)
}

fn describe(path: &Path, metadata: &Metadata, extension: &str) -> Option<ScannedDocument> {
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let modified = metadata.modified().ok()?;
    let created = metadata.created().unwrap_or(modified);
    let modified_ms = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    Some(ScannedDocument {
        id: cache_key(&filename, modified_ms),
        path: path.to_string_lossy().into_owned(),
        size: metadata.len(),
        created_at: DateTime::<Utc>::from(created),
        modified_at: DateTime::<Utc>::from(modified),
        extension: extension.to_string(),
        filename,
        record: None,
    })
}
