//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - String representation for client consumption (e.g., "NOT_FOUND")
//! - Integer code for logging and monitoring (e.g., 1005)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.as_str(), "NOT_FOUND");
//! assert_eq!(code.code(), 1005);
//! assert_eq!(code.default_message(), "Resource not found");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Invalid JSON format in request body
    InvalidJson,

    /// Invalid urlencoded form in request body
    InvalidForm,

    /// Requested resource was not found
    NotFound,

    /// Client exceeded the request rate limit
    TooManyRequests,

    // Server errors (1100s)
    /// An unexpected internal server error occurred
    InternalError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier that clients match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidForm => "INVALID_FORM",
            Self::NotFound => "NOT_FOUND",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1099: Client errors
    /// - 1100-1199: Server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidJson => 1002,
            Self::InvalidForm => 1003,
            Self::NotFound => 1005,
            Self::TooManyRequests => 1006,
            Self::InternalError => 1101,
        }
    }

    /// Default user-facing message. Handlers may override it.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidJson => "Invalid JSON format",
            Self::InvalidForm => "Invalid form body",
            Self::NotFound => "Resource not found",
            Self::TooManyRequests => "too many requests from this IP address",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 5] = [
        ErrorCode::InvalidJson,
        ErrorCode::InvalidForm,
        ErrorCode::NotFound,
        ErrorCode::TooManyRequests,
        ErrorCode::InternalError,
    ];

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::TooManyRequests.as_str(), "TOO_MANY_REQUESTS");
        assert_eq!(ErrorCode::InvalidForm.as_str(), "INVALID_FORM");
    }

    #[test]
    fn test_error_codes_are_unique() {
        let codes: HashSet<i32> = ALL.iter().map(ErrorCode::code).collect();
        assert_eq!(codes.len(), ALL.len());

        let names: HashSet<&str> = ALL.iter().map(ErrorCode::as_str).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_error_code_ranges() {
        for code in ALL {
            let n = code.code();
            match code {
                ErrorCode::InternalError => assert!((1100..1200).contains(&n)),
                _ => assert!((1000..1100).contains(&n)),
            }
        }
    }

    #[test]
    fn test_error_code_serialization_matches_as_str() {
        for code in ALL {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::json!(code.as_str()));
        }
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InternalError.to_string(), "INTERNAL_ERROR");
    }
}
