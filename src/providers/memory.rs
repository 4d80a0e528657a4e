//! Scriptable in-memory provider and storage for tests.
//!
//! Listings are paged with `page-N` markers and downloads with
//! `chunk-N` markers so the runner's loops are exercised the same
//! way the RDS adapter drives them.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::{
    error::{ProviderError, StorageError},
    schema::{LogFileDescriptor, LogFilePage, LogPortion},
};

use super::adapter::{LogProvider, ObjectStorage, START_MARKER};

#[derive(Default)]
pub struct MemoryProvider {
    instances: Vec<String>,
    files: HashMap<String, Vec<LogFileDescriptor>>,
    contents: HashMap<(String, String), Vec<String>>,
    fail_enumeration: bool,
    failing_listings: HashSet<String>,
    failing_downloads: HashSet<(String, String)>,
    markerless_downloads: HashSet<(String, String)>,
    pub list_calls: Mutex<Vec<(String, i64, String)>>,
    pub download_calls: Mutex<Vec<(String, String, String)>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, id: &str) -> Self {
        self.instances.push(id.to_string());
        self
    }

    pub fn with_file(mut self, instance: &str, file: LogFileDescriptor, chunks: &[&str]) -> Self {
        self.contents.insert(
            (instance.to_string(), file.name.clone()),
            chunks.iter().map(|c| c.to_string()).collect(),
        );
        self.files.entry(instance.to_string()).or_default().push(file);
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn failing_listing(mut self, instance: &str) -> Self {
        self.failing_listings.insert(instance.to_string());
        self
    }

    pub fn failing_download(mut self, instance: &str, file: &str) -> Self {
        self.failing_downloads.insert((instance.to_string(), file.to_string()));
        self
    }

    /// The first portion of `file` reports more data pending but
    /// carries no marker to continue from.
    pub fn markerless_after(mut self, instance: &str, file: &str) -> Self {
        self.markerless_downloads.insert((instance.to_string(), file.to_string()));
        self
    }

    pub fn downloads_of(&self, file: &str) -> usize {
        self.download_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, f, _)| f == file)
            .count()
    }
}

fn index_of(marker: &str, prefix: &str) -> usize {
    if marker == START_MARKER {
        return 0;
    }
    marker
        .strip_prefix(prefix)
        .and_then(|n| n.parse().ok())
        .unwrap_or(usize::MAX)
}

#[async_trait::async_trait]
impl LogProvider for MemoryProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_instances(&self) -> Result<Vec<String>, ProviderError> {
        if self.fail_enumeration {
            return Err(ProviderError::EnumerateInstances("access denied".into()));
        }
        Ok(self.instances.clone())
    }

    async fn list_log_files(
        &self,
        instance: &str,
        since_ms: i64,
        page_size: i32,
        marker: &str,
    ) -> Result<LogFilePage, ProviderError> {
        self.list_calls
            .lock()
            .unwrap()
            .push((instance.to_string(), since_ms, marker.to_string()));

        if self.failing_listings.contains(instance) {
            return Err(ProviderError::ListLogFiles {
                instance: instance.to_string(),
                message: "throttled".into(),
            });
        }

        let matching: Vec<LogFileDescriptor> = self
            .files
            .get(instance)
            .map(|files| {
                files
                    .iter()
                    .filter(|f| f.last_written.timestamp_millis() >= since_ms)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let page_size = page_size as usize;
        let page = index_of(marker, "page-");
        let start = page.saturating_mul(page_size).min(matching.len());
        let end = (start + page_size).min(matching.len());

        Ok(LogFilePage {
            files: matching[start..end].to_vec(),
            next_marker: (end < matching.len()).then(|| format!("page-{}", page + 1)),
        })
    }

    async fn download_log_portion(
        &self,
        instance: &str,
        file_name: &str,
        marker: &str,
    ) -> Result<LogPortion, ProviderError> {
        self.download_calls
            .lock()
            .unwrap()
            .push((instance.to_string(), file_name.to_string(), marker.to_string()));

        let key = (instance.to_string(), file_name.to_string());
        if self.failing_downloads.contains(&key) {
            return Err(ProviderError::DownloadPortion {
                instance: instance.to_string(),
                file: file_name.to_string(),
                message: "file rotated away".into(),
            });
        }

        let chunks = self.contents.get(&key).cloned().unwrap_or_default();
        if self.markerless_downloads.contains(&key) {
            return Ok(LogPortion {
                data: chunks.first().cloned(),
                more_pending: true,
                next_marker: None,
            });
        }

        let index = index_of(marker, "chunk-");
        let more_pending = index.saturating_add(1) < chunks.len();

        Ok(LogPortion {
            data: chunks.get(index).cloned(),
            more_pending,
            next_marker: more_pending.then(|| format!("chunk-{}", index + 1)),
        })
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    failing_keys: HashSet<String>,
    pub objects: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_key(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(_, key, _)| key.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn upload(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        if self.failing_keys.contains(key) {
            return Err(StorageError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "slow down".into(),
            });
        }
        self.objects
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), body));
        Ok(())
    }
}
