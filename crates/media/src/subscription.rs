//! Scoped callback registrations.
//!
//! Both guards unregister on drop, so every exit path of the tracker,
//! including early returns on errors, releases what it registered.

use std::sync::Arc;

use crate::error::Result;
use crate::session::{
    CallbackToken, ControllerCallback, ControllerRef, ListenerComponent, SessionEnumerator,
    SessionsCallback,
};

/// A callback registered on one media controller.
pub struct Subscription {
    controller: ControllerRef,
    package: String,
    token: CallbackToken,
}

impl Subscription {
    pub fn register(controller: ControllerRef, callback: ControllerCallback) -> Result<Self> {
        let token = controller.register_callback(callback)?;
        let package = controller.package_name();
        tracing::debug!(package = %package, token = token.raw(), "controller_callback_registered");

        Ok(Self {
            controller,
            package,
            token,
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.controller.unregister_callback(self.token);
        tracing::debug!(package = %self.package, token = self.token.raw(), "controller_callback_unregistered");
    }
}

/// A session-list listener registered on the enumerator.
pub struct SessionsListener {
    enumerator: Arc<dyn SessionEnumerator>,
    token: CallbackToken,
}

impl SessionsListener {
    pub fn register(
        enumerator: Arc<dyn SessionEnumerator>,
        component: &ListenerComponent,
        callback: SessionsCallback,
    ) -> Result<Self> {
        let token = enumerator.add_sessions_listener(component, callback)?;
        tracing::debug!(%component, token = token.raw(), "sessions_listener_registered");

        Ok(Self { enumerator, token })
    }
}

impl Drop for SessionsListener {
    fn drop(&mut self) {
        self.enumerator.remove_sessions_listener(self.token);
        tracing::debug!(token = self.token.raw(), "sessions_listener_removed");
    }
}
