//! Application-wide error types.
//!
//! Only startup paths return [`AppError`]. Per-message failures are
//! [`crate::llm::RequestError`] and never leave the responder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("comms error: {0}")]
    Comms(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("TELEGRAM_BOT_TOKEN is not set".into());
        assert!(e.to_string().starts_with("config error"));
        assert!(e.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn comms_error_display() {
        let e = AppError::Comms("getMe failed: Unauthorized".into());
        assert!(e.to_string().contains("Unauthorized"));
    }

    #[test]
    fn logger_error_display() {
        let e = AppError::Logger("already initialized".into());
        assert!(e.to_string().contains("already initialized"));
    }

    #[test]
    fn is_std_error() {
        let e = AppError::Config("x".into());
        let _: &dyn Error = &e;
    }
}
