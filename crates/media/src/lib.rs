//! Now-playing metadata from the active media session.
//!
//! [`MediaTracker`] follows whichever session the OS session manager ranks
//! first, keeps exactly one metadata callback registered on it, and pushes a
//! normalized [`MediaInfo`] to the frontend whenever the session or its
//! metadata changes.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use visualizer_events::InMemoryEventBus;
//! use visualizer_media::{default_enumerator, MediaTracker, TrackerConfig};
//!
//! let bus = Arc::new(InMemoryEventBus::new());
//! let tracker = MediaTracker::new(default_enumerator(), bus.clone(), TrackerConfig::default());
//!
//! tracker.start();
//! // ... onMediaChanged events land on the bus
//! tracker.stop();
//! ```

mod error;
mod info;
mod platform;
mod policy;
mod session;
mod subscription;
mod tracker;

pub use error::{MediaError, Result};
pub use info::{MediaInfo, MediaMetadata};
#[cfg(all(target_os = "linux", feature = "bluez"))]
pub use platform::BluezEnumerator;
pub use platform::{default_enumerator, NoSessionEnumerator};
pub use policy::{FirstActive, SelectionPolicy};
pub use session::{
    controller_callback, sessions_callback, CallbackToken, ControllerCallback, ControllerEvent,
    ControllerRef, ListenerComponent, MediaController, PlaybackState, SessionEnumerator,
    SessionsCallback, DEFAULT_LISTENER_CLASS, DEFAULT_LISTENER_PACKAGE,
};
pub use subscription::{SessionsListener, Subscription};
pub use tracker::{MediaTracker, TrackerConfig, TrackerState};
