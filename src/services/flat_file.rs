//! Flat-File Store
//!
//! Serves range queries from JSON files on disk. Collection `X` lives in
//! `<root>/X.json`, either as a bare array of objects or wrapped as
//! `{ "data": [...] }`.
//!
//! Parsed files are memoized, keyed by path and validated against the file's
//! size and modification time on every call, so the total count stays a
//! fresh read without reparsing an unchanged file.

use crate::constants::FLAT_FILE_MEMO_CAPACITY;
use crate::domain::{CollectionInfo, RangePage, RangeQuery, Record};
use crate::error::{Error, Result};
use crate::services::store::{RangeStore, StoreFuture};
use futures::FutureExt;
use hashlink::LruCache;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Rows(Vec<Record>),
    Wrapped { data: Vec<Record> },
}

impl DatasetFile {
    fn into_records(self) -> Vec<Record> {
        match self {
            DatasetFile::Rows(rows) | DatasetFile::Wrapped { data: rows } => rows,
        }
    }
}

#[derive(Clone)]
struct MemoEntry {
    modified: Option<SystemTime>,
    len: u64,
    records: Arc<Vec<Record>>,
}

type Memo = Arc<Mutex<LruCache<PathBuf, MemoEntry>>>;

/// Range store backed by a directory of JSON files
#[derive(Clone)]
pub struct FlatFileStore {
    root: Arc<Path>,
    max_page_size: usize,
    memo: Memo,
}

impl FlatFileStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>, max_page_size: usize) -> Self {
        Self {
            root: Arc::from(root.into()),
            max_page_size,
            memo: Arc::new(Mutex::new(LruCache::new(FLAT_FILE_MEMO_CAPACITY))),
        }
    }

    /// Directory the store reads from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a collection, or `None` if the id cannot name a file
    fn collection_path(root: &Path, collection: &str) -> Option<PathBuf> {
        let valid = !collection.is_empty()
            && !collection.starts_with('.')
            && !collection.contains(['/', '\\'])
            && !collection.contains("..");
        valid.then(|| root.join(format!("{collection}.json")))
    }

    /// Load (or reuse) the parsed records of a file; `None` if it does not exist
    fn load_records(memo: &Memo, path: &Path) -> Result<Option<Arc<Vec<Record>>>> {
        let meta = match fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let modified = meta.modified().ok();
        let len = meta.len();

        if let Ok(mut memo) = memo.lock()
            && let Some(entry) = memo.get(path)
            && entry.modified == modified
            && entry.len == len
        {
            return Ok(Some(entry.records.clone()));
        }

        let content = fs::read_to_string(path)?;
        let parsed: DatasetFile = serde_json::from_str(&content).map_err(|e| {
            Error::unexpected(format!("{} is not a dataset file: {e}", path.display()))
        })?;
        let records = Arc::new(parsed.into_records());
        debug!(path = %path.display(), rows = records.len(), "Parsed dataset file");

        if let Ok(mut memo) = memo.lock() {
            memo.insert(
                path.to_path_buf(),
                MemoEntry {
                    modified,
                    len,
                    records: records.clone(),
                },
            );
        }

        Ok(Some(records))
    }

    fn read_page(root: &Path, memo: &Memo, query: &RangeQuery, max_page_size: usize) -> Result<RangePage> {
        let range = query.validate(max_page_size)?;

        let not_found = || Error::NotFound {
            collection: query.collection.to_string(),
        };
        let Some(path) = Self::collection_path(root, &query.collection) else {
            warn!(collection = %query.collection, "Rejected collection id");
            return Err(not_found());
        };
        let Some(records) = Self::load_records(memo, &path)? else {
            debug!(collection = %query.collection, "No dataset file for collection");
            return Err(not_found());
        };

        let total_count = records.len();
        let start = range.start.min(total_count);
        let end = range.end().min(total_count);

        Ok(RangePage {
            data: records[start..end].to_vec(),
            total_count,
        })
    }

    fn scan_collections(root: &Path, memo: &Memo) -> Result<Vec<CollectionInfo>> {
        let mut collections = Vec::new();
        if !root.exists() {
            return Ok(collections);
        }

        for entry in fs::read_dir(root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            match Self::load_records(memo, &path) {
                Ok(Some(records)) => collections.push(CollectionInfo {
                    id,
                    total_count: records.len(),
                }),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable dataset"),
            }
        }

        collections.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(collections)
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::transport(format!("flat-file reader failed: {e}")))?
}

impl RangeStore for FlatFileStore {
    fn name(&self) -> &str {
        "flat-file"
    }

    fn fetch_range(&self, query: RangeQuery) -> StoreFuture<RangePage> {
        let root = self.root.clone();
        let memo = self.memo.clone();
        let max_page_size = self.max_page_size;
        run_blocking(move || Self::read_page(&root, &memo, &query, max_page_size)).boxed()
    }

    fn list_collections(&self) -> StoreFuture<Vec<CollectionInfo>> {
        let root = self.root.clone();
        let memo = self.memo.clone();
        run_blocking(move || Self::scan_collections(&root, &memo)).boxed()
    }
}

impl std::fmt::Debug for FlatFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatFileStore")
            .field("root", &self.root)
            .field("max_page_size", &self.max_page_size)
            .finish()
    }
}
