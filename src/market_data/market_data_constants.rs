/// Cache time-to-live for quote lookups, in seconds
pub const QUOTE_CACHE_TTL_SECS: u64 = 300;

/// Cache time-to-live for profile and fundamentals lookups, in seconds
pub const PROFILE_CACHE_TTL_SECS: u64 = 3600;

/// History window requested when the caller does not name one
pub const DEFAULT_HISTORY_PERIOD: &str = "1y";
