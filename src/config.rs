use chrono::Duration;

use crate::error::ConfigError;

// ------------------------------------------------------------
// Root configuration
// ------------------------------------------------------------
//
// Built exactly once in `main` from environment variables and
// passed down by reference. Nothing below `main` reads the
// environment.
//
// It defines:
// - Which instances are harvested (prefix)
// - Where archives are written (bucket + key prefix)
// - Which log categories are transferred
// - The trailing time window
//
#[derive(Debug, Clone)]
pub struct Config {
    /// Only instances whose identifier starts with this are processed
    pub instance_prefix: String,

    /// Destination bucket for compressed archives
    pub bucket: String,

    /// First segment of every destination key ("rds")
    pub key_prefix: String,

    /// Per-category transfer switches
    pub transfer: TransferFlags,

    /// Trailing window offsets
    pub window: WindowConfig,

    /// Page size used when listing log files
    pub page_size: i32,

    /// Log destination keys instead of uploading
    pub dry_run: bool,
}

// ------------------------------------------------------------
// Transfer flags
// ------------------------------------------------------------
//
// All default to false: a deployment must opt in to every
// category it wants archived.
//
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferFlags {
    pub audit: bool,
    pub error: bool,
    pub slow_query: bool,
}

// ------------------------------------------------------------
// Window configuration
// ------------------------------------------------------------
//
// Window = [now - from_ago - buffer, now - to_ago)
//
// `from_ago > to_ago` is enforced at load time so the window
// is never empty or inverted.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Stale end: how far back the far edge sits
    pub from_ago: Duration,

    /// Fresh end: how far back the near edge sits
    pub to_ago: Duration,

    /// Extra widening applied to the far edge only
    pub buffer: Duration,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            from_ago: Duration::hours(2),
            to_ago: Duration::hours(1),
            buffer: Duration::minutes(10),
        }
    }
}

pub const DEFAULT_PAGE_SIZE: i32 = 256;
pub const DEFAULT_KEY_PREFIX: &str = "rds";

/// Upper bound for any window offset: ten years.
pub const MAX_OFFSET_MINUTES: i64 = 10 * 365 * 24 * 60;

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Tests pass a closure over a map instead of mutating
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let instance_prefix = required(&lookup, "RDS_PREFIX")?;
        let bucket = required(&lookup, "S3_BUCKET")?;

        let transfer = TransferFlags {
            audit: flag(&lookup, "TRANSFER_AUDIT_LOGS"),
            error: flag(&lookup, "TRANSFER_ERROR_LOGS"),
            slow_query: flag(&lookup, "TRANSFER_SLOW_QUERY_LOGS"),
        };

        let defaults = WindowConfig::default();
        let from_minutes = offset_minutes(&lookup, "WINDOW_FROM_MINUTES_AGO", defaults.from_ago)?;
        let to_minutes = offset_minutes(&lookup, "WINDOW_TO_MINUTES_AGO", defaults.to_ago)?;
        let buffer_minutes = offset_minutes(&lookup, "WINDOW_BUFFER_MINUTES", defaults.buffer)?;

        if from_minutes <= to_minutes {
            return Err(ConfigError::WindowOrder { from_minutes, to_minutes });
        }

        let page_size = number(&lookup, "LOG_FILES_PAGE_SIZE", i64::from(DEFAULT_PAGE_SIZE))?;
        let page_size = i32::try_from(page_size).map_err(|_| ConfigError::Invalid {
            key: "LOG_FILES_PAGE_SIZE",
            value: page_size.to_string(),
        })?;
        if page_size <= 0 {
            return Err(ConfigError::PageSize);
        }

        let key_prefix = lookup("DESTINATION_KEY_PREFIX")
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string());

        Ok(Self {
            instance_prefix,
            bucket,
            key_prefix,
            transfer,
            window: WindowConfig {
                from_ago: minutes("WINDOW_FROM_MINUTES_AGO", from_minutes)?,
                to_ago: minutes("WINDOW_TO_MINUTES_AGO", to_minutes)?,
                buffer: minutes("WINDOW_BUFFER_MINUTES", buffer_minutes)?,
            },
            page_size,
            dry_run: flag(&lookup, "DRY_RUN"),
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or(ConfigError::Missing(key))
}

/// Only a case-insensitive "true" enables a flag.
fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn number<F>(lookup: &F, key: &'static str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Reads a window offset in minutes, bounded to `0..=MAX_OFFSET_MINUTES`
/// so the window can always be subtracted from the current time.
fn offset_minutes<F>(lookup: &F, key: &'static str, default: Duration) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = number(lookup, key, default.num_minutes())?;
    if !(0..=MAX_OFFSET_MINUTES).contains(&value) {
        return Err(ConfigError::Invalid { key, value: value.to_string() });
    }
    Ok(value)
}

fn minutes(key: &'static str, value: i64) -> Result<Duration, ConfigError> {
    Duration::try_minutes(value).ok_or_else(|| ConfigError::Invalid { key, value: value.to_string() })
}
