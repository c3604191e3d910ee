use tauri::{AppHandle, Emitter, Runtime};
use visualizer_events::EventBus;

/// Publishes bus events as Tauri events to the frontend.
pub struct AppEventBus<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> AppEventBus<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> EventBus for AppEventBus<R> {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        if let Err(e) = self.app.emit(topic, payload) {
            tracing::error!("failed to emit {} event: {:?}", topic, e);
        }
    }
}
