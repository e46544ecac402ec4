/// Default number of records returned by list endpoints
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum number of records a single list call may return
pub const MAX_LIST_LIMIT: i64 = 500;
