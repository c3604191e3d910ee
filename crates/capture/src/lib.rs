//! Screen/audio capture consent flow.
//!
//! [`CaptureController`] asks the OS for capture consent and hands the
//! resulting grant, together with the streaming target, to a
//! [`CaptureService`]. [`ProjectionService`] is the stock service: it turns
//! the grant into a projection and holds it until stopped.

mod config;
mod consent;
mod controller;
mod error;
mod service;

pub use config::{
    CaptureConfig, CaptureTarget, ForegroundNotice, StartArgs, CAPTURE_REQUEST_CODE,
    DEFAULT_TARGET_IP, DEFAULT_TARGET_PORT,
};
pub use consent::{ConsentRequester, ConsentResult, ProjectionGrant};
pub use controller::{CaptureController, CaptureState};
pub use error::{CaptureError, Result};
pub use service::{CaptureService, Projection, ProjectionProvider, ProjectionService};
