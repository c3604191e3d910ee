use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// The service was started without a consent grant.
    #[error("missing capture permission grant")]
    MissingGrant,

    /// The OS consent prompt could not be shown.
    #[error("capture consent unavailable: {0}")]
    ConsentUnavailable(String),

    /// Turning the grant into a projection failed.
    #[error("failed to acquire media projection: {0}")]
    Projection(String),

    #[error("capture service error: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
