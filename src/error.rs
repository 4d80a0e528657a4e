use thiserror::Error;

// ------------------------------------------------------------
// Error taxonomy
// ------------------------------------------------------------
//
// Only `ProviderError::EnumerateInstances` and `ConfigError`
// abort a run. Everything else is logged by the runner and the
// affected instance or file is skipped.
//

/// Failures reported by the database control plane.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to enumerate database instances: {0}")]
    EnumerateInstances(String),

    #[error("failed to list log files for {instance}: {message}")]
    ListLogFiles { instance: String, message: String },

    #[error("failed to download {file} from {instance}: {message}")]
    DownloadPortion {
        instance: String,
        file: String,
        message: String,
    },
}

/// Failures while preparing or writing an archive object.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to compress {key}: {source}")]
    Compress {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to upload s3://{bucket}/{key}: {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Invalid or missing environment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("window start ({from_minutes} min ago) must be further back than window end ({to_minutes} min ago)")]
    WindowOrder { from_minutes: i64, to_minutes: i64 },

    #[error("log file page size must be greater than zero")]
    PageSize,
}

/// Why a single file was not archived. Never aborts a run.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
