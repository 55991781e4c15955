use super::ApiError;
use crate::constants::logs::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::models::Pagination;

pub fn validate_user_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid user ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_page(page: Option<u64>) -> Result<u64, ApiError> {
    match page {
        None => Ok(DEFAULT_PAGE),
        Some(0) => Err(ApiError::validation("Invalid page: 0. Page starts at 1")),
        Some(page) => Ok(page),
    }
}

/// Rejects pages whose row offset the database cannot represent.
pub fn validate_page_range(page: u64, limit: u64) -> Result<(), ApiError> {
    if Pagination::offset(page, limit).is_none() {
        return Err(ApiError::validation(format!(
            "Invalid page: {page}. Page is out of range"
        )));
    }
    Ok(())
}

pub fn validate_limit(limit: Option<u64>) -> Result<u64, ApiError> {
    const MIN_LIMIT: u64 = 1;

    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

/// Empty means absent. The value is otherwise kept as sent so it matches exactly.
pub fn optional_filter(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id(1).is_ok());
        assert!(validate_user_id(12345).is_ok());
        assert!(validate_user_id(0).is_err());
        assert!(validate_user_id(-1).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some(3)).unwrap(), 3);
        assert!(validate_page(Some(0)).is_err());
    }

    #[test]
    fn test_validate_page_range() {
        assert!(validate_page_range(1, 100).is_ok());
        assert!(validate_page_range(1_000_000, 100).is_ok());
        assert!(validate_page_range(u64::MAX, 100).is_err());
        assert!(validate_page_range(1_152_921_504_606_846_976, 10).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None).unwrap(), 50);
        assert!(validate_limit(Some(1)).is_ok());
        assert!(validate_limit(Some(100)).is_ok());
        assert!(validate_limit(Some(0)).is_err());
        assert!(validate_limit(Some(101)).is_err());
    }

    #[test]
    fn test_optional_filter() {
        assert_eq!(optional_filter(None), None);
        assert_eq!(optional_filter(Some(String::new())), None);
        assert_eq!(optional_filter(Some("login".into())).as_deref(), Some("login"));
        assert_eq!(optional_filter(Some(" login".into())).as_deref(), Some(" login"));
    }
}
