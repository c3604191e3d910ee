//! Platform session enumerators.
//!
//! On Linux with the `bluez` feature, Bluetooth AVRCP players are the
//! sessions. Other hosts inject their own [`SessionEnumerator`]; everywhere
//! else the tracker sees no sessions.

#[cfg(all(target_os = "linux", feature = "bluez"))]
mod bluez;

#[cfg(all(target_os = "linux", feature = "bluez"))]
pub use bluez::BluezEnumerator;

use std::sync::Arc;

use crate::error::Result;
use crate::session::{
    CallbackToken, ControllerRef, ListenerComponent, SessionEnumerator, SessionsCallback,
};

/// Enumerator for hosts without a media session service.
///
/// Reports an empty session list and never notifies.
#[derive(Debug, Default)]
pub struct NoSessionEnumerator;

impl SessionEnumerator for NoSessionEnumerator {
    fn active_sessions(&self, _component: &ListenerComponent) -> Result<Vec<ControllerRef>> {
        Ok(Vec::new())
    }

    fn add_sessions_listener(
        &self,
        _component: &ListenerComponent,
        _callback: SessionsCallback,
    ) -> Result<CallbackToken> {
        Ok(CallbackToken::new(0))
    }

    fn remove_sessions_listener(&self, _token: CallbackToken) {}
}

/// The session enumerator for the current platform.
#[cfg(all(target_os = "linux", feature = "bluez"))]
pub fn default_enumerator() -> Arc<dyn SessionEnumerator> {
    Arc::new(BluezEnumerator::new())
}

/// The session enumerator for the current platform.
#[cfg(not(all(target_os = "linux", feature = "bluez")))]
pub fn default_enumerator() -> Arc<dyn SessionEnumerator> {
    Arc::new(NoSessionEnumerator)
}
