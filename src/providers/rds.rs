use aws_config::SdkConfig;
use aws_sdk_rds::Client;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::types::DescribeDbLogFilesDetails;
use log::warn;

use crate::{
    error::ProviderError,
    schema::{LogFileDescriptor, LogFilePage, LogPortion},
    util,
};

use super::adapter::LogProvider;

/// Amazon RDS control-plane adapter.
///
/// APIs used:
/// - DescribeDBInstances
/// - DescribeDBLogFiles
/// - DownloadDBLogFilePortion
///
/// DESIGN:
/// - Pure protocol translation
/// - One request per trait call, except instance enumeration
///   which follows the marker until the last page
pub struct RdsLogProvider {
    client: Client,
}

impl RdsLogProvider {
    pub fn new(sdk: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk),
        }
    }
}

#[async_trait::async_trait]
impl LogProvider for RdsLogProvider {
    fn name(&self) -> &'static str {
        "rds"
    }

    async fn list_instances(&self) -> Result<Vec<String>, ProviderError> {
        let mut identifiers = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let out = self
                .client
                .describe_db_instances()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| ProviderError::EnumerateInstances(DisplayErrorContext(&e).to_string()))?;

            identifiers.extend(
                out.db_instances()
                    .iter()
                    .filter_map(|i| i.db_instance_identifier())
                    .map(str::to_string),
            );

            match out.marker() {
                Some(m) if !m.is_empty() => marker = Some(m.to_string()),
                _ => break,
            }
        }

        Ok(identifiers)
    }

    async fn list_log_files(
        &self,
        instance: &str,
        since_ms: i64,
        page_size: i32,
        marker: &str,
    ) -> Result<LogFilePage, ProviderError> {
        let out = self
            .client
            .describe_db_log_files()
            .db_instance_identifier(instance)
            .file_last_written(since_ms)
            .max_records(page_size)
            .marker(marker)
            .send()
            .await
            .map_err(|e| ProviderError::ListLogFiles {
                instance: instance.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let files = out
            .describe_db_log_files()
            .iter()
            .filter_map(|d| to_descriptor(instance, d))
            .collect();

        Ok(LogFilePage {
            files,
            next_marker: out.marker().map(str::to_string),
        })
    }

    async fn download_log_portion(
        &self,
        instance: &str,
        file_name: &str,
        marker: &str,
    ) -> Result<LogPortion, ProviderError> {
        let out = self
            .client
            .download_db_log_file_portion()
            .db_instance_identifier(instance)
            .log_file_name(file_name)
            .marker(marker)
            .send()
            .await
            .map_err(|e| ProviderError::DownloadPortion {
                instance: instance.to_string(),
                file: file_name.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(LogPortion {
            data: out.log_file_data,
            more_pending: out.additional_data_pending.unwrap_or(false),
            next_marker: out.marker,
        })
    }
}

/// Converts one listing entry; entries without a name or a usable
/// LastWritten are dropped with a warning.
fn to_descriptor(instance: &str, d: &DescribeDbLogFilesDetails) -> Option<LogFileDescriptor> {
    let Some(name) = d.log_file_name() else {
        warn!("[{}] dropping a log file entry without a LogFileName", instance);
        return None;
    };
    // LastWritten is epoch milliseconds
    let Some(last_written) = d.last_written().and_then(util::from_epoch_ms) else {
        warn!("[{}] dropping {} without a usable LastWritten", instance, name);
        return None;
    };

    Some(LogFileDescriptor {
        name: name.to_string(),
        last_written,
        size: d.size(),
    })
}
