use crate::config::TransferFlags;

/// Name fragments that mark a slow-query log.
///
/// `slow/` covers engines that place slow logs in a
/// `slowquery/` or `slow/` directory of the log listing.
const SLOW_QUERY_PATTERNS: [&str; 4] = ["slowquery", "slow-query", "slow_query", "slow/"];

/// Category membership of a single log file.
///
/// The checks are independent: one name can be both an audit
/// and an error log. A file with no flag set is unclassified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogCategory {
    pub audit: bool,
    pub error: bool,
    pub slow_query: bool,
}

impl LogCategory {
    /// Classifies a file by case-insensitive substring match on its name.
    pub fn classify(file_name: &str) -> Self {
        let name = file_name.to_lowercase();

        Self {
            audit: name.contains("audit"),
            error: name.contains("error"),
            slow_query: SLOW_QUERY_PATTERNS.iter().any(|p| name.contains(p)),
        }
    }

    pub fn is_unclassified(&self) -> bool {
        !(self.audit || self.error || self.slow_query)
    }

    /// True when at least one matched category is enabled.
    pub fn is_enabled_by(&self, flags: &TransferFlags) -> bool {
        (self.audit && flags.audit) || (self.error && flags.error) || (self.slow_query && flags.slow_query)
    }
}
