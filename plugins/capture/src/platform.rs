//! Desktop implementations of the consent and projection seams.

use tauri::{AppHandle, Runtime};
use visualizer_capture::{
    CaptureError, ConsentRequester, Projection, ProjectionGrant, ProjectionProvider, Result,
};

#[cfg(target_os = "macos")]
mod macos {
    use core_graphics::access::ScreenCaptureAccess;
    use tauri::{AppHandle, Manager, Runtime};
    use visualizer_capture::{ConsentResult, ProjectionGrant};

    use crate::SharedState;

    /// Requests screen recording permission.
    /// On macOS this opens System Settings if permission hasn't been granted yet.
    fn request_screen_recording() -> bool {
        let access = ScreenCaptureAccess::default();
        access.preflight() || access.request()
    }

    pub fn spawn_consent_prompt<R: Runtime>(app: AppHandle<R>, request_code: i32, request_id: u64) {
        tauri::async_runtime::spawn(async move {
            let granted = tauri::async_runtime::spawn_blocking(request_screen_recording)
                .await
                .unwrap_or(false);

            let result = if granted {
                let token = uuid::Uuid::new_v4().to_string();
                ConsentResult::granted(request_code, request_id, ProjectionGrant::new(token))
            } else {
                ConsentResult::denied(request_code, request_id)
            };

            let state = app.state::<SharedState>();
            let mut controller = state.lock().await;
            controller.on_consent_result(result);
        });
    }
}

/// Shows the OS screen-recording prompt and feeds the answer back into the
/// managed [`visualizer_capture::CaptureController`].
pub struct ScreenRecordingConsent<R: Runtime> {
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    app: AppHandle<R>,
}

impl<R: Runtime> ScreenRecordingConsent<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> ConsentRequester for ScreenRecordingConsent<R> {
    fn request_consent(&self, request_code: i32, request_id: u64) -> Result<()> {
        #[cfg(target_os = "macos")]
        {
            macos::spawn_consent_prompt(self.app.clone(), request_code, request_id);
            Ok(())
        }
        #[cfg(not(target_os = "macos"))]
        {
            tracing::warn!(code = request_code, request = request_id, "capture_consent_unsupported");
            Err(CaptureError::ConsentUnavailable(
                "screen capture consent is not supported on this platform".to_string(),
            ))
        }
    }
}

/// Projection held while consent is in effect. Holds no OS resources until
/// the capture path exists.
struct ConsentedProjection {
    released: bool,
}

impl Projection for ConsentedProjection {
    fn stop(&mut self) -> Result<()> {
        if self.released {
            return Err(CaptureError::Projection(
                "projection already released".to_string(),
            ));
        }
        self.released = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct DesktopProjectionProvider;

impl ProjectionProvider for DesktopProjectionProvider {
    fn acquire(&self, grant: &ProjectionGrant) -> Result<Box<dyn Projection>> {
        if grant.is_empty() {
            return Err(CaptureError::MissingGrant);
        }
        Ok(Box::new(ConsentedProjection { released: false }))
    }
}
