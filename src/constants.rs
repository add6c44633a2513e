// ABOUTME: Application constants organized by domain
// ABOUTME: Limits, defaults, and shared error message strings

//! Constants module
//!
//! Application constants grouped into logical domains rather than scattered
//! magic numbers.

/// Request and session limits
pub mod limits {
    /// Default JWT session expiry in hours
    pub const DEFAULT_SESSION_HOURS: i64 = 24;
    /// Minimum accepted password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Maximum goal name length
    pub const MAX_GOAL_NAME_LENGTH: usize = 100;
    /// Maximum goal description length
    pub const MAX_DESCRIPTION_LENGTH: usize = 500;
    /// Maximum progress-entry note length
    pub const MAX_NOTES_LENGTH: usize = 200;
    /// Maximum schedule entry detail length
    pub const MAX_SCHEDULE_DETAILS_LENGTH: usize = 200;
    /// Default page size for list endpoints
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Maximum page size for list endpoints
    pub const MAX_PAGE_SIZE: u32 = 100;
    /// RPE scale bounds (Borg CR10)
    pub const RPE_MIN: u8 = 1;
    /// RPE scale upper bound
    pub const RPE_MAX: u8 = 10;
}

/// Deployment defaults
pub mod defaults {
    /// Default HTTP port when `HTTP_PORT` is unset
    pub const HTTP_PORT: u16 = 8081;
    /// Default SQLite database path when `DATABASE_URL` is unset
    pub const DATABASE_URL: &str = "sqlite:./data/trainlog.db";
    /// Service name used in logs
    pub const SERVICE_NAME: &str = "trainlog-server";
}

/// Shared error message strings
pub mod error_messages {
    /// Registration attempted with a malformed email
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";
    /// Registration attempted with a weak password
    pub const PASSWORD_TOO_WEAK: &str =
        "Password must be at least 8 characters and contain a letter and a digit";
    /// Registration attempted for an existing account
    pub const USER_ALREADY_EXISTS: &str = "A user with this email already exists";
    /// Login attempted with bad credentials
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
}
