//! Error types for media session tracking.

use thiserror::Error;

/// Errors reported by session enumerators and controllers.
///
/// None of these escape [`crate::MediaTracker`]; the tracker logs them and
/// settles in the "no active session" state.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The listener component does not hold the notification-listener grant.
    #[error("notification listener access not granted for {0} - enable it in the system notification access settings")]
    AuthorizationDenied(String),

    /// Querying the active session list failed.
    #[error("failed to enumerate media sessions: {0}")]
    Enumeration(String),

    /// Registering a callback on a controller or enumerator failed.
    #[error("failed to register media callback: {0}")]
    Registration(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;
