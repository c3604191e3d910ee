//! In-memory stand-ins for the OS media session service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use visualizer_media::{
    CallbackToken, ControllerCallback, ControllerEvent, ControllerRef, ListenerComponent,
    MediaController, MediaError, MediaMetadata, PlaybackState, SessionEnumerator,
    SessionsCallback,
};

/// Counts live controller callbacks across every controller sharing it.
#[derive(Default)]
pub struct LiveRegistrations {
    live: AtomicUsize,
    max: AtomicUsize,
}

impl LiveRegistrations {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously live registrations observed.
    pub fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }

    fn inc(&self) {
        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn dec(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct FakeController {
    package: String,
    metadata: Mutex<Option<MediaMetadata>>,
    callbacks: Mutex<HashMap<u64, ControllerCallback>>,
    next_token: AtomicU64,
    registry: Arc<LiveRegistrations>,
    fail_register: AtomicBool,
    /// Callbacks kept after unregistration, for replaying late deliveries.
    retained: Mutex<Vec<ControllerCallback>>,
}

impl FakeController {
    pub fn new(
        package: &str,
        metadata: Option<MediaMetadata>,
        registry: &Arc<LiveRegistrations>,
    ) -> Arc<Self> {
        Arc::new(Self {
            package: package.to_string(),
            metadata: Mutex::new(metadata),
            callbacks: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            registry: Arc::clone(registry),
            fail_register: AtomicBool::new(false),
            retained: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(self: &Arc<Self>) -> ControllerRef {
        Arc::clone(self) as ControllerRef
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }

    /// Update metadata and notify registered callbacks, like the OS would.
    pub fn set_metadata(&self, metadata: Option<MediaMetadata>) {
        *self.metadata.lock().unwrap() = metadata.clone();
        self.notify(ControllerEvent::MetadataChanged(metadata));
    }

    pub fn set_playback_state(&self, state: PlaybackState) {
        self.notify(ControllerEvent::PlaybackStateChanged(state));
    }

    pub fn set_fail_register(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::SeqCst);
    }

    /// Deliver metadata to callbacks that were already unregistered, as an
    /// OS dispatch racing the unregistration would.
    pub fn replay_to_unregistered(&self, metadata: Option<MediaMetadata>) {
        let callbacks: Vec<_> = self.retained.lock().unwrap().clone();
        for callback in callbacks {
            callback(ControllerEvent::MetadataChanged(metadata.clone()));
        }
    }

    fn notify(&self, event: ControllerEvent) {
        let callbacks: Vec<_> = self.callbacks.lock().unwrap().values().cloned().collect();
        for callback in callbacks {
            callback(event.clone());
        }
    }
}

impl MediaController for FakeController {
    fn package_name(&self) -> String {
        self.package.clone()
    }

    fn metadata(&self) -> Option<MediaMetadata> {
        self.metadata.lock().unwrap().clone()
    }

    fn register_callback(
        &self,
        callback: ControllerCallback,
    ) -> Result<CallbackToken, MediaError> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(MediaError::Registration(self.package.clone()));
        }
        let raw = self.next_token.fetch_add(1, Ordering::SeqCst);
        self.callbacks.lock().unwrap().insert(raw, callback);
        self.registry.inc();
        Ok(CallbackToken::new(raw))
    }

    fn unregister_callback(&self, token: CallbackToken) {
        if let Some(callback) = self.callbacks.lock().unwrap().remove(&token.raw()) {
            self.retained.lock().unwrap().push(callback);
            self.registry.dec();
        }
    }
}

#[derive(Default)]
pub struct FakeEnumerator {
    sessions: Mutex<Vec<ControllerRef>>,
    listeners: Mutex<HashMap<u64, SessionsCallback>>,
    next_token: AtomicU64,
    denied: AtomicBool,
    fail_queries: AtomicBool,
    retained: Mutex<Vec<SessionsCallback>>,
}

impl FakeEnumerator {
    pub fn new(sessions: Vec<ControllerRef>) -> Arc<Self> {
        let enumerator = Self::default();
        *enumerator.sessions.lock().unwrap() = sessions;
        Arc::new(enumerator)
    }

    pub fn set_denied(&self, denied: bool) {
        self.denied.store(denied, Ordering::SeqCst);
    }

    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    /// Replace the session list and notify listeners.
    pub fn set_sessions(&self, sessions: Vec<ControllerRef>) {
        *self.sessions.lock().unwrap() = sessions.clone();
        let listeners: Vec<_> = self.listeners.lock().unwrap().values().cloned().collect();
        for listener in listeners {
            listener(sessions.clone());
        }
    }

    /// Deliver a session list to listeners that were already removed.
    pub fn replay_to_removed(&self, sessions: Vec<ControllerRef>) {
        let listeners: Vec<_> = self.retained.lock().unwrap().clone();
        for listener in listeners {
            listener(sessions.clone());
        }
    }

    fn check_access(&self, component: &ListenerComponent) -> Result<(), MediaError> {
        if self.denied.load(Ordering::SeqCst) {
            return Err(MediaError::AuthorizationDenied(component.to_string()));
        }
        Ok(())
    }
}

impl SessionEnumerator for FakeEnumerator {
    fn active_sessions(
        &self,
        component: &ListenerComponent,
    ) -> Result<Vec<ControllerRef>, MediaError> {
        self.check_access(component)?;
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(MediaError::Enumeration("session service died".to_string()));
        }
        Ok(self.sessions.lock().unwrap().clone())
    }

    fn add_sessions_listener(
        &self,
        component: &ListenerComponent,
        callback: SessionsCallback,
    ) -> Result<CallbackToken, MediaError> {
        self.check_access(component)?;
        let raw = self.next_token.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().insert(raw, callback);
        Ok(CallbackToken::new(raw))
    }

    fn remove_sessions_listener(&self, token: CallbackToken) {
        if let Some(listener) = self.listeners.lock().unwrap().remove(&token.raw()) {
            self.retained.lock().unwrap().push(listener);
        }
    }
}

pub fn metadata(artist: &str, title: &str, album: &str) -> MediaMetadata {
    MediaMetadata {
        artist: Some(artist.to_string()),
        title: Some(title.to_string()),
        album: Some(album.to_string()),
    }
}
