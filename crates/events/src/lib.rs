//! Shared event contracts between the bridge plugins and the frontend.
//!
//! Event and channel names live here so producers and the frontend agree on
//! them. Also provides the `EventBus` trait the core crates publish through.

mod bus;

pub use bus::{EventBus, EventBusRef, InMemoryEventBus};

/// Channel names, one per bridge plugin.
pub mod channel_names {
    /// Now-playing metadata channel.
    pub const MEDIA_LISTENER: &str = "visualizer/media_listener";
    /// Capture consent and service channel.
    pub const AUDIO_CAPTURE: &str = "visualizer/audio_capture";
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Now-playing record changed. Payload: `{artist, title, album, coverUrl}`.
    pub const MEDIA_CHANGED: &str = "onMediaChanged";
}
