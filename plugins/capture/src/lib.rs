use std::sync::Arc;

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};
use tokio::sync::Mutex;
use visualizer_capture::{CaptureConfig, CaptureController, ProjectionService};

mod commands;
mod error;
mod platform;

pub use error::{Error, Result};
pub use platform::{DesktopProjectionProvider, ScreenRecordingConsent};

const PLUGIN_NAME: &str = "visualizer-capture";

pub type SharedState = Mutex<CaptureController>;

pub fn init<R: Runtime>() -> TauriPlugin<R> {
    init_with(CaptureConfig::default())
}

pub fn init_with<R: Runtime>(config: CaptureConfig) -> TauriPlugin<R> {
    Builder::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::start,
            commands::stop,
            commands::capture_state,
        ])
        .setup(move |app, _api| {
            let consent = Arc::new(ScreenRecordingConsent::new(app.app_handle().clone()));
            let service = Arc::new(ProjectionService::new(
                Arc::new(DesktopProjectionProvider),
                config.notice.clone(),
            ));
            let controller = CaptureController::new(config, consent, service);
            app.manage(SharedState::new(controller));
            tracing::info!(
                channel = visualizer_events::channel_names::AUDIO_CAPTURE,
                "capture_plugin_ready"
            );
            Ok(())
        })
        .build()
}
