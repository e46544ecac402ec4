use serde::Deserialize;
use utoipa::IntoParams;

use crate::shared::constants::DEFAULT_LIST_LIMIT;

/// Standard offset/limit query parameters for list endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Number of records to skip (default: 0)
    #[serde(default)]
    #[param(minimum = 0)]
    pub offset: i64,

    /// Maximum number of records to return (default: 100, max: 500)
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 500)]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}
