use std::sync::Arc;

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};
use visualizer_media::{MediaTracker, SessionEnumerator, TrackerConfig};

mod bus;
mod commands;

pub use bus::AppEventBus;

const PLUGIN_NAME: &str = "visualizer-media";

/// Plugin backed by the current platform's session enumerator.
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    init_with(visualizer_media::default_enumerator(), TrackerConfig::default())
}

/// Plugin backed by a host-provided session enumerator.
pub fn init_with<R: Runtime>(
    enumerator: Arc<dyn SessionEnumerator>,
    config: TrackerConfig,
) -> TauriPlugin<R> {
    Builder::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::start,
            commands::stop,
            commands::media_state,
        ])
        .setup(move |app, _api| {
            let bus = Arc::new(AppEventBus::new(app.app_handle().clone()));
            let tracker = MediaTracker::new(enumerator, bus, config);
            app.manage(tracker);
            tracing::info!(channel = visualizer_events::channel_names::MEDIA_LISTENER, "media_plugin_ready");
            Ok(())
        })
        .on_drop(|app| {
            if let Some(tracker) = app.try_state::<MediaTracker>() {
                tracker.stop();
            }
        })
        .build()
}
