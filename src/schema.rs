use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------
// Log file descriptor
// ------------------------------------------------------------
//
// One entry of a log-file listing. Built by the provider adapter,
// consumed by the runner, dropped at the end of the run.
//
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileDescriptor {
    /// Provider file name, may contain '/' (e.g. "error/mysql-error.log")
    pub name: String,

    /// Last write time as reported by the provider
    pub last_written: DateTime<Utc>,

    /// Size in bytes, when the provider reports it
    pub size: Option<i64>,
}

// ------------------------------------------------------------
// Listing page
// ------------------------------------------------------------
//
// `next_marker` is None (or empty) on the last page.
//
#[derive(Debug, Clone, Default)]
pub struct LogFilePage {
    pub files: Vec<LogFileDescriptor>,
    pub next_marker: Option<String>,
}

// ------------------------------------------------------------
// Content portion
// ------------------------------------------------------------
//
// One chunk of a log file download. `more_pending` is the only
// continuation signal; `next_marker` is where the next request
// starts.
//
#[derive(Debug, Clone, Default)]
pub struct LogPortion {
    pub data: Option<String>,
    pub more_pending: bool,
    pub next_marker: Option<String>,
}

// ------------------------------------------------------------
// Counters
// ------------------------------------------------------------
//
// A file only counts once its archive has been uploaded.
//
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub files: usize,
    pub records: usize,
}

impl InstanceSummary {
    pub fn record_upload(&mut self, records: usize) {
        self.files += 1;
        self.records += records;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(rename = "totalFiles")]
    pub files: usize,

    #[serde(rename = "totalRecords")]
    pub records: usize,
}

impl RunSummary {
    pub fn absorb(&mut self, instance: InstanceSummary) {
        self.files += instance.files;
        self.records += instance.records;
    }

    /// Structured invocation result. Partial failures are only
    /// visible in the log, the status is always 200.
    pub fn into_result(self) -> InvocationResult {
        InvocationResult {
            status_code: 200,
            body: format!(
                "Log file processing completed. Processed {} files with {} records.",
                self.files, self.records
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}
