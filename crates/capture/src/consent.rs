//! The OS consent prompt for screen/audio capture.

use std::fmt;

use crate::error::Result;

/// Opaque token proving the user consented to capture.
#[derive(Clone, PartialEq, Eq)]
pub struct ProjectionGrant(String);

impl ProjectionGrant {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Grants are credentials; keep them out of logs.
impl fmt::Debug for ProjectionGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProjectionGrant(..)")
    }
}

/// Outcome of a consent prompt, delivered asynchronously by the platform.
///
/// `request_id` echoes the id the prompt was opened with, so an answer to a
/// prompt abandoned by `stop` cannot satisfy a later one.
#[derive(Debug, Clone)]
pub struct ConsentResult {
    pub request_code: i32,
    pub request_id: u64,
    pub granted: bool,
    pub grant: Option<ProjectionGrant>,
}

impl ConsentResult {
    pub fn granted(request_code: i32, request_id: u64, grant: ProjectionGrant) -> Self {
        Self {
            request_code,
            request_id,
            granted: true,
            grant: Some(grant),
        }
    }

    pub fn denied(request_code: i32, request_id: u64) -> Self {
        Self {
            request_code,
            request_id,
            granted: false,
            grant: None,
        }
    }
}

/// Shows the capture consent prompt.
///
/// The answer comes back later through
/// [`crate::CaptureController::on_consent_result`], carrying the same
/// `request_code` and `request_id`.
pub trait ConsentRequester: Send + Sync {
    fn request_consent(&self, request_code: i32, request_id: u64) -> Result<()>;
}
