pub mod activity;
pub mod user;

pub use activity::{ActivityLogEntry, LogFilter, LogPage, NewActivity, Pagination};
pub use user::{Role, SessionUser, User, UserInfo, UserPatch, UserSummary};

/// Current UTC time as RFC 3339 with fixed microsecond precision, so stored
/// timestamps sort lexicographically in chronological order.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_fixed_width() {
        let a = timestamp_now();
        let b = timestamp_now();
        assert_eq!(a.len(), b.len());
        assert!(a.ends_with('Z'));
        assert!(a <= b);
    }
}
