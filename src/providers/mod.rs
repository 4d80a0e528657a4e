//! Provider adapter registry and factory
//!
//! This module provides:
//! - The `LogProvider` / `ObjectStorage` seam
//! - AWS implementations of both
//! - A factory that picks the storage backend from configuration
//!
//! The runner interacts exclusively through the traits.

pub mod adapter;
pub mod rds;
pub mod s3;
mod dry_run;

#[cfg(test)]
pub mod memory;

use aws_config::SdkConfig;

use crate::config::Config;
use adapter::ObjectStorage;

/// Returns the archive sink for this run.
///
/// - `DRY_RUN=true` -> uploads are logged, nothing is written
/// - otherwise      -> S3 PutObject
pub fn get_storage(cfg: &Config, sdk: &SdkConfig) -> Box<dyn ObjectStorage> {
    if cfg.dry_run {
        Box::new(dry_run::DryRunStorage)
    } else {
        Box::new(s3::S3Storage::new(sdk))
    }
}
