/// Collector module
///
/// This module holds the single orchestration procedure:
/// window -> instances -> file list -> classify/filter ->
/// fetch -> compress -> upload -> accumulate.
///
/// Design notes:
/// - Provider-specific logic MUST NOT live here
/// - Remote calls go through `providers::adapter` traits only
pub mod runner;
