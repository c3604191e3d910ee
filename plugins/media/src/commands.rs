use tauri::{command, State};
use visualizer_media::{MediaTracker, TrackerState};

/// Start tracking. Acknowledges once the transition is applied, whether or
/// not a session was found.
#[command]
pub fn start(tracker: State<'_, MediaTracker>) {
    let state = tracker.start();
    tracing::debug!(?state, "media_start_acknowledged");
}

#[command]
pub fn stop(tracker: State<'_, MediaTracker>) {
    tracker.stop();
}

#[command]
pub fn media_state(tracker: State<'_, MediaTracker>) -> TrackerState {
    tracker.state()
}
