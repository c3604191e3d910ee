//! Seams to the OS media session service.
//!
//! The platform side implements [`SessionEnumerator`] and [`MediaController`];
//! the tracker only ever talks to these traits.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::info::MediaMetadata;

/// Default package of the notification-listener component.
pub const DEFAULT_LISTENER_PACKAGE: &str = "com.example.visualizer_remote";

/// Default class of the notification-listener component.
pub const DEFAULT_LISTENER_CLASS: &str = "MediaNotificationListener";

/// The caller's notification-listener component.
///
/// Session access is scoped to this component, which must already hold the
/// user-granted notification access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerComponent {
    pub package: String,
    pub class: String,
}

impl Default for ListenerComponent {
    fn default() -> Self {
        Self {
            package: DEFAULT_LISTENER_PACKAGE.to_string(),
            class: DEFAULT_LISTENER_CLASS.to_string(),
        }
    }
}

impl fmt::Display for ListenerComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/.{}", self.package, self.class)
    }
}

/// Playback state reported by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    None,
    Stopped,
    Paused,
    Playing,
    Buffering,
    Error,
    Other(i32),
}

impl From<i32> for PlaybackState {
    /// Maps the Android `PlaybackState.STATE_*` codes.
    fn from(code: i32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Stopped,
            2 => Self::Paused,
            3 => Self::Playing,
            6 => Self::Buffering,
            7 => Self::Error,
            other => Self::Other(other),
        }
    }
}

/// Notification delivered to a controller callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    MetadataChanged(Option<MediaMetadata>),
    PlaybackStateChanged(PlaybackState),
}

/// Handle returned by a callback registration, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackToken(u64);

impl CallbackToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

pub type ControllerRef = Arc<dyn MediaController>;

pub type ControllerCallback = Arc<dyn Fn(ControllerEvent) + Send + Sync + 'static>;

pub type SessionsCallback = Arc<dyn Fn(Vec<ControllerRef>) + Send + Sync + 'static>;

/// One playback session.
///
/// Implementations must deliver callbacks asynchronously, never from inside
/// `register_callback` itself.
pub trait MediaController: Send + Sync {
    /// Package of the app owning the session, for logging.
    fn package_name(&self) -> String;

    /// Current metadata, if the session has published any.
    fn metadata(&self) -> Option<MediaMetadata>;

    fn register_callback(&self, callback: ControllerCallback) -> Result<CallbackToken>;

    fn unregister_callback(&self, token: CallbackToken);
}

/// The OS session manager.
pub trait SessionEnumerator: Send + Sync {
    /// Controllers of the active sessions, in platform priority order.
    ///
    /// # Errors
    ///
    /// `MediaError::AuthorizationDenied` if `component` lacks notification access.
    fn active_sessions(&self, component: &ListenerComponent) -> Result<Vec<ControllerRef>>;

    /// Subscribe to session list changes. The callback receives the full new list.
    fn add_sessions_listener(
        &self,
        component: &ListenerComponent,
        callback: SessionsCallback,
    ) -> Result<CallbackToken>;

    fn remove_sessions_listener(&self, token: CallbackToken);
}

pub fn controller_callback<F>(f: F) -> ControllerCallback
where
    F: Fn(ControllerEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn sessions_callback<F>(f: F) -> SessionsCallback
where
    F: Fn(Vec<ControllerRef>) + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_state_codes() {
        assert_eq!(PlaybackState::from(3), PlaybackState::Playing);
        assert_eq!(PlaybackState::from(2), PlaybackState::Paused);
        assert_eq!(PlaybackState::from(6), PlaybackState::Buffering);
        assert_eq!(PlaybackState::from(42), PlaybackState::Other(42));
    }

    #[test]
    fn test_listener_component_display() {
        let component = ListenerComponent::default();
        assert_eq!(
            component.to_string(),
            "com.example.visualizer_remote/.MediaNotificationListener"
        );
    }
}
