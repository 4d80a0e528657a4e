use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use crate::{
    classify::LogCategory,
    config::Config,
    error::{ProviderError, StorageError, TransferError},
    providers::adapter::{LogProvider, ObjectStorage, START_MARKER},
    schema::{InstanceSummary, LogFileDescriptor, RunSummary},
    util,
    window::TimeWindow,
};

/// Runs one collection pass.
///
/// This function is responsible for:
/// - Computing the trailing window from `now`
/// - Enumerating instances and applying the prefix filter
/// - Harvesting every matching instance in turn
/// - Summing the per-instance counters
///
/// FAILURE POLICY:
/// - Instance enumeration failure is returned (the run is useless
///   without an instance list)
/// - Everything below that is logged and skipped
///
/// Execution is strictly sequential: one instance, one file, one
/// request at a time.
///
pub async fn run_collection(
    cfg: &Config,
    provider: &dyn LogProvider,
    storage: &dyn ObjectStorage,
    now: DateTime<Utc>,
) -> Result<RunSummary, ProviderError> {
    let window = TimeWindow::compute(now, &cfg.window);

    info!(
        "Log collection period: {} -> {} (from {} min ago, buffer {} min, to {} min ago)",
        util::iso(window.from),
        util::iso(window.to),
        cfg.window.from_ago.num_minutes(),
        cfg.window.buffer.num_minutes(),
        cfg.window.to_ago.num_minutes(),
    );
    info!(
        "Settings - Error Logs: {}, Slow Query Logs: {}, Audit Logs: {}, storage: {}",
        cfg.transfer.error,
        cfg.transfer.slow_query,
        cfg.transfer.audit,
        storage.name(),
    );

    let instances: Vec<String> = provider
        .list_instances()
        .await?
        .into_iter()
        .filter(|id| id.starts_with(&cfg.instance_prefix))
        .collect();

    info!(
        "{} {} instance(s) match prefix {:?}",
        instances.len(),
        provider.name(),
        cfg.instance_prefix
    );

    let mut summary = RunSummary::default();
    for instance in &instances {
        summary.absorb(collect_instance(cfg, provider, storage, &window, instance).await);
    }

    info!(
        "Execution complete - Total files: {}, Total records: {}",
        summary.files, summary.records
    );

    Ok(summary)
}

/// Harvests a single instance.
///
/// A listing failure contributes an empty summary; per-file
/// failures only drop the affected file.
async fn collect_instance(
    cfg: &Config,
    provider: &dyn LogProvider,
    storage: &dyn ObjectStorage,
    window: &TimeWindow,
    instance: &str,
) -> InstanceSummary {
    info!("Processing instance: {}", instance);

    let mut summary = InstanceSummary::default();

    let files = match list_all_log_files(provider, instance, window.since_ms(), cfg.page_size).await {
        Ok(files) => files,
        Err(e) => {
            error!("Error getting log files: {}", e);
            return summary;
        }
    };

    info!("[{}] found {} log file(s)", instance, files.len());

    for file in &files {
        let category = LogCategory::classify(&file.name);

        debug!(
            "[{}] {} last written {} size {:?} audit={} error={} slow_query={}",
            instance,
            file.name,
            util::iso(file.last_written),
            file.size,
            category.audit,
            category.error,
            category.slow_query,
        );

        if category.is_unclassified() {
            debug!("[{}] {} matches no known log category", instance, file.name);
        }

        // --------------------------------------------------
        // TRANSFER DECISION
        // --------------------------------------------------
        // The listing bound is inclusive on `from` only, so
        // files newer than `to` show up here and are dropped.
        //
        if !window.contains(file.last_written) {
            info!(
                "[{}] skipping {} (outside time window {} to {})",
                instance,
                file.name,
                util::iso(window.from),
                util::iso(window.to)
            );
            continue;
        }

        if !category.is_enabled_by(&cfg.transfer) {
            info!("[{}] skipping {} (not matching enabled log types)", instance, file.name);
            continue;
        }

        match transfer_file(cfg, provider, storage, instance, &file.name).await {
            Ok(Some(records)) => {
                summary.record_upload(records);
                info!("[{}] processed {}: {} records", instance, file.name, records);
            }
            Ok(None) => info!("[{}] no data in log file: {}", instance, file.name),
            Err(e) => error!("[{}] error processing {}: {}", instance, file.name, e),
        }
    }

    if summary.files > 0 {
        info!(
            "Instance {} summary - Files: {}, Records: {}",
            instance, summary.files, summary.records
        );
    }

    summary
}

/// Downloads, compresses and uploads one file.
///
/// RETURNS:
/// - `Some(records)` after a successful upload
/// - `None` when the file has no content (nothing is written)
///
async fn transfer_file(
    cfg: &Config,
    provider: &dyn LogProvider,
    storage: &dyn ObjectStorage,
    instance: &str,
    file_name: &str,
) -> Result<Option<usize>, TransferError> {
    let chunks = download_log_file(provider, instance, file_name).await?;
    if chunks.is_empty() {
        return Ok(None);
    }

    let blob = chunks.concat();
    let records = util::count_records(&blob);

    let key = util::object_key(&cfg.key_prefix, instance, file_name);
    let body = util::gzip(&blob).map_err(|source| StorageError::Compress {
        key: key.clone(),
        source,
    })?;

    storage.upload(&cfg.bucket, &key, body).await?;

    Ok(Some(records))
}

/// Lists every log file written at or after `since_ms`.
///
/// Follows `next_marker` from `START_MARKER` until the provider
/// stops returning a non-empty one.
///
/// TODO:
/// - Yield pages lazily if rotation volumes outgrow memory.
///
async fn list_all_log_files(
    provider: &dyn LogProvider,
    instance: &str,
    since_ms: i64,
    page_size: i32,
) -> Result<Vec<LogFileDescriptor>, ProviderError> {
    let mut files = Vec::new();
    let mut marker = START_MARKER.to_string();

    loop {
        let page = provider.list_log_files(instance, since_ms, page_size, &marker).await?;
        files.extend(page.files);

        match page.next_marker {
            Some(next) if !next.is_empty() => marker = next,
            _ => break,
        }
    }

    Ok(files)
}

/// Downloads the non-empty portions of a log file, in order.
async fn download_log_file(
    provider: &dyn LogProvider,
    instance: &str,
    file_name: &str,
) -> Result<Vec<String>, ProviderError> {
    let mut chunks = Vec::new();
    let mut marker = START_MARKER.to_string();

    loop {
        let portion = provider.download_log_portion(instance, file_name, &marker).await?;

        if let Some(data) = portion.data.filter(|d| !d.is_empty()) {
            chunks.push(data);
        }

        if !portion.more_pending {
            break;
        }

        // More data without a marker would restart from the top forever
        match portion.next_marker {
            Some(next) if !next.is_empty() => marker = next,
            _ => {
                warn!("[{}] {} reports pending data without a marker", instance, file_name);
                return Err(ProviderError::DownloadPortion {
                    instance: instance.to_string(),
                    file: file_name.to_string(),
                    message: "additional data pending but no marker returned".to_string(),
                });
            }
        }
    }

    Ok(chunks)
}
