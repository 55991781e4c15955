use serde::Serialize;

use crate::entities::{activity_logs, users};

/// An audit record about to be written.
#[derive(Debug, Clone, Default)]
pub struct NewActivity {
    pub user_id: Option<i32>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}

impl NewActivity {
    #[must_use]
    pub fn new(user_id: Option<i32>, action: &str) -> Self {
        Self {
            user_id,
            action: action.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn entity(mut self, entity_type: &str, entity_id: i32) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self.entity_id = Some(entity_id);
        self
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }
}

/// Activity log row joined with the acting user, if that user still exists.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityLogEntry {
    pub id: i64,
    pub user_id: Option<i32>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: String,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl From<(activity_logs::Model, Option<users::Model>)> for ActivityLogEntry {
    fn from((log, user): (activity_logs::Model, Option<users::Model>)) -> Self {
        let (username, email) = user.map_or((None, None), |u| (Some(u.username), Some(u.email)));
        Self {
            id: log.id,
            user_id: log.user_id,
            action: log.action,
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            details: log.details,
            ip_address: log.ip_address,
            created_at: log.created_at,
            username,
            email,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub user_id: Option<i32>,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Row offset of the first entry on `page` (1-based). `None` when it does
    /// not fit a signed 64-bit SQL integer.
    #[must_use]
    pub const fn offset(page: u64, limit: u64) -> Option<u64> {
        match page.saturating_sub(1).checked_mul(limit) {
            Some(offset) if offset <= i64::MAX.unsigned_abs() => Some(offset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogPage {
    pub logs: Vec<ActivityLogEntry>,
    pub pagination: Pagination,
}
