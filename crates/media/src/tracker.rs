//! Active media session tracker.
//!
//! Follows the session the enumerator ranks first and republishes its
//! metadata as [`MediaInfo`] on the event bus.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;
use visualizer_events::{event_names, EventBusRef};

use crate::info::MediaInfo;
use crate::policy::{FirstActive, SelectionPolicy};
use crate::session::{
    controller_callback, sessions_callback, ControllerEvent, ControllerRef, ListenerComponent,
    SessionEnumerator,
};
use crate::subscription::{SessionsListener, Subscription};

/// Tracker configuration.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Component holding the notification-listener grant.
    pub listener: ListenerComponent,
}

/// Observable tracker state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TrackerState {
    Stopped,
    NoActiveSession,
    Tracking { package: String },
}

#[derive(Default)]
struct Inner {
    started: bool,
    sessions_listener: Option<SessionsListener>,
    active: Option<Subscription>,
    /// Set when the last session query failed; a repeated `start` queries again.
    query_failed: bool,
    /// Bumped on every start/stop; stale session-list notifications carry an old value.
    epoch: u64,
    /// Bumped on every controller subscription; stale metadata notifications carry an old value.
    subscription_seq: u64,
}

/// Records queued in transition order, emitted outside the state lock.
#[derive(Default)]
struct Outbox {
    pending: VecDeque<MediaInfo>,
    draining: bool,
}

impl Inner {
    fn state(&self) -> TrackerState {
        match (&self.active, self.started) {
            (_, false) => TrackerState::Stopped,
            (None, true) => TrackerState::NoActiveSession,
            (Some(sub), true) => TrackerState::Tracking {
                package: sub.package().to_string(),
            },
        }
    }
}

struct Shared {
    enumerator: Arc<dyn SessionEnumerator>,
    bus: EventBusRef,
    policy: Box<dyn SelectionPolicy>,
    config: TrackerConfig,
    inner: Mutex<Inner>,
    /// Locked under `inner` or on its own; never held while emitting.
    outbox: Mutex<Outbox>,
}

/// Tracks the active media session and publishes `onMediaChanged` events.
///
/// Cloning yields another handle to the same tracker. All transitions are
/// serialized through one lock guarding the held controller and its callback.
///
/// Events are emitted in transition order after that lock is released, so a
/// bus subscriber may call back into the tracker from its handler. Events
/// such a call produces are emitted after the current one returns.
#[derive(Clone)]
pub struct MediaTracker {
    shared: Arc<Shared>,
}

impl MediaTracker {
    pub fn new(
        enumerator: Arc<dyn SessionEnumerator>,
        bus: EventBusRef,
        config: TrackerConfig,
    ) -> Self {
        Self::with_policy(enumerator, bus, config, Box::new(FirstActive))
    }

    pub fn with_policy(
        enumerator: Arc<dyn SessionEnumerator>,
        bus: EventBusRef,
        config: TrackerConfig,
        policy: Box<dyn SelectionPolicy>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                enumerator,
                bus,
                policy,
                config,
                inner: Mutex::new(Inner::default()),
                outbox: Mutex::new(Outbox::default()),
            }),
        }
    }

    /// Start tracking.
    ///
    /// Registers for session list changes, then selects from the current list
    /// and publishes its metadata right away. Failures are logged and leave
    /// the tracker in [`TrackerState::NoActiveSession`] with an empty record
    /// published. Calling this while already listening is a no-op; calling
    /// it after a failed registration or a failed session query retries
    /// whichever step failed.
    pub fn start(&self) -> TrackerState {
        let shared = &self.shared;
        let mut inner = shared.lock();

        if inner.started && inner.sessions_listener.is_some() && !inner.query_failed {
            tracing::debug!("media_tracker_already_started");
            return inner.state();
        }

        if !inner.started {
            inner.started = true;
            inner.epoch += 1;
        }
        tracing::info!(listener = %shared.config.listener, "media_tracker_starting");

        if inner.sessions_listener.is_none() {
            let weak = Arc::downgrade(shared);
            let epoch = inner.epoch;
            let callback = sessions_callback(move |controllers| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_sessions_changed(epoch, controllers);
                }
            });

            match SessionsListener::register(
                Arc::clone(&shared.enumerator),
                &shared.config.listener,
                callback,
            ) {
                Ok(listener) => inner.sessions_listener = Some(listener),
                Err(e) => {
                    tracing::error!(error = %e, "sessions_listener_registration_failed");
                    shared.settle_empty(&mut inner);
                    let state = inner.state();
                    shared.flush(inner);
                    return state;
                }
            }
        }

        match shared.enumerator.active_sessions(&shared.config.listener) {
            Ok(controllers) => shared.apply_selection(&mut inner, controllers),
            Err(e) => {
                tracing::error!(error = %e, "active_sessions_query_failed");
                shared.settle_empty(&mut inner);
                inner.query_failed = true;
            }
        }

        let state = inner.state();
        shared.flush(inner);
        state
    }

    /// Stop tracking. Idempotent.
    ///
    /// The controller callback and the session listener are unregistered
    /// before this returns.
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        if !inner.started {
            return;
        }

        inner.active = None;
        inner.sessions_listener = None;
        inner.started = false;
        inner.query_failed = false;
        inner.epoch += 1;
        tracing::info!("media_tracker_stopped");
    }

    pub fn state(&self) -> TrackerState {
        self.shared.lock().state()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_sessions_changed(self: &Arc<Self>, epoch: u64, controllers: Vec<ControllerRef>) {
        let mut inner = self.lock();
        if !inner.started || inner.epoch != epoch {
            tracing::trace!("stale_sessions_notification_dropped");
            return;
        }

        tracing::debug!(count = controllers.len(), "active_sessions_changed");
        self.apply_selection(&mut inner, controllers);
        self.flush(inner);
    }

    fn on_controller_event(&self, seq: u64, event: ControllerEvent) {
        let mut inner = self.lock();
        if inner.active.is_none() || inner.subscription_seq != seq {
            tracing::trace!("stale_controller_notification_dropped");
            return;
        }

        match event {
            ControllerEvent::MetadataChanged(metadata) => {
                tracing::debug!("metadata_changed");
                self.enqueue(MediaInfo::from_metadata(metadata.as_ref()));
                self.flush(inner);
            }
            ControllerEvent::PlaybackStateChanged(state) => {
                tracing::debug!(?state, "playback_state_changed");
            }
        }
    }

    /// Switch to the policy's pick, always releasing the previous callback first.
    fn apply_selection(self: &Arc<Self>, inner: &mut Inner, controllers: Vec<ControllerRef>) {
        inner.active = None;
        inner.query_failed = false;

        let Some(controller) = self.policy.select(&controllers) else {
            tracing::debug!("no_active_media_controller");
            self.enqueue(MediaInfo::default());
            return;
        };

        inner.subscription_seq += 1;
        let seq = inner.subscription_seq;
        let weak: Weak<Self> = Arc::downgrade(self);
        let callback = controller_callback(move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.on_controller_event(seq, event);
            }
        });

        match Subscription::register(Arc::clone(&controller), callback) {
            Ok(subscription) => {
                tracing::info!(package = %subscription.package(), "active_controller_selected");
                inner.active = Some(subscription);
                self.enqueue(MediaInfo::from_metadata(controller.metadata().as_ref()));
            }
            Err(e) => {
                tracing::error!(error = %e, "controller_callback_registration_failed");
                self.enqueue(MediaInfo::default());
            }
        }
    }

    fn settle_empty(&self, inner: &mut Inner) {
        inner.active = None;
        self.enqueue(MediaInfo::default());
    }

    fn outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a record. Callers hold the state lock, so queue order is
    /// transition order.
    fn enqueue(&self, info: MediaInfo) {
        self.outbox().pending.push_back(info);
    }

    /// Release the state lock, then emit everything queued.
    ///
    /// Whoever finds the outbox idle drains it; a caller arriving while
    /// another thread (or a handler further up this stack) is draining leaves
    /// its records to that drainer.
    fn flush(&self, inner: MutexGuard<'_, Inner>) {
        drop(inner);

        let mut outbox = self.outbox();
        if outbox.draining {
            return;
        }
        outbox.draining = true;

        loop {
            let Some(info) = outbox.pending.pop_front() else {
                break;
            };
            drop(outbox);
            self.publish(&info);
            outbox = self.outbox();
        }
        outbox.draining = false;
    }

    fn publish(&self, info: &MediaInfo) {
        if !info.is_empty() {
            tracing::info!(artist = %info.artist, title = %info.title, album = %info.album, "now_playing");
        }

        match serde_json::to_value(info) {
            Ok(payload) => self.bus.emit(event_names::MEDIA_CHANGED, payload),
            Err(e) => tracing::error!(error = %e, "media_info_serialization_failed"),
        }
    }
}
