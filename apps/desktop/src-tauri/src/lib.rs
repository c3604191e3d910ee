use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,visualizer=debug")),
        )
        .init();

    tracing::info!("Starting visualizer remote");

    tauri::Builder::default()
        .plugin(tauri_plugin_visualizer_media::init())
        .plugin(tauri_plugin_visualizer_capture::init())
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
