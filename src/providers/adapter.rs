use crate::error::{ProviderError, StorageError};
use crate::schema::{LogFilePage, LogPortion};

/// Marker that starts both pagination loops.
pub const START_MARKER: &str = "0";

/// LogProvider is the seam between the collector runtime and the
/// managed-database control plane.
///
/// Implementations must:
/// - Translate provider responses into `schema` types
/// - Report every failed round-trip as a `ProviderError`
///
/// They must NOT:
/// - Retry (the next scheduled run is the retry)
/// - Filter by time window or category (runner responsibility)
///
#[async_trait::async_trait]
pub trait LogProvider: Send + Sync {
    /// Short name used in log lines ("rds", "memory", ...).
    fn name(&self) -> &'static str;

    /// Returns the identifiers of every instance known to the provider.
    ///
    /// Provider-side pagination of the instance list is resolved
    /// inside the implementation. A failure here aborts the run.
    async fn list_instances(&self) -> Result<Vec<String>, ProviderError>;

    /// Returns one page of log files last written at or after `since_ms`.
    ///
    /// PARAMETERS:
    /// - `since_ms`: lower bound, epoch milliseconds
    /// - `page_size`: upper bound on `files.len()`
    /// - `marker`: `START_MARKER` or the previous page's `next_marker`
    ///
    async fn list_log_files(
        &self,
        instance: &str,
        since_ms: i64,
        page_size: i32,
        marker: &str,
    ) -> Result<LogFilePage, ProviderError>;

    /// Returns one portion of a log file starting at `marker`.
    async fn download_log_portion(
        &self,
        instance: &str,
        file_name: &str,
        marker: &str,
    ) -> Result<LogPortion, ProviderError>;
}

/// ObjectStorage receives finished archives.
///
/// Writes are plain overwrites; there is no conditional put.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn upload(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError>;
}
