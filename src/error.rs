//! Error codes shared by every fallible stage.
//!
//! DESIGN
//! ======
//! Each stage owns a `thiserror` enum. Callers only ever see the `Display`
//! text. The code and retryable flag go to the logs.

/// Grepable error code and retryable flag for structured error logs.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
