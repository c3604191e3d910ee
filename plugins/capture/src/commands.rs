use tauri::{command, State};
use visualizer_capture::{CaptureState, StartArgs};

use crate::error::Result;
use crate::SharedState;

/// Ask for capture consent. Acknowledges as soon as the prompt is shown;
/// the service starts when consent arrives.
#[command]
pub async fn start(
    state: State<'_, SharedState>,
    ip: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut controller = state.lock().await;
    controller.start(StartArgs { ip, port })?;
    Ok(())
}

#[command]
pub async fn stop(state: State<'_, SharedState>) -> Result<()> {
    state.lock().await.stop();
    Ok(())
}

#[command]
pub async fn capture_state(state: State<'_, SharedState>) -> Result<CaptureState> {
    Ok(state.lock().await.state().clone())
}
