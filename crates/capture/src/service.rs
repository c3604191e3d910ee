//! Background capture service.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{CaptureTarget, ForegroundNotice};
use crate::consent::ProjectionGrant;
use crate::error::{CaptureError, Result};

/// Service the controller hands a consent grant to.
pub trait CaptureService: Send + Sync {
    fn start(&self, grant: ProjectionGrant, target: &CaptureTarget) -> Result<()>;

    /// Stop capturing. Must be safe to call when not running.
    fn stop(&self);
}

/// A live screen/audio projection.
pub trait Projection: Send {
    fn stop(&mut self) -> Result<()>;
}

/// Turns a consent grant into a [`Projection`].
pub trait ProjectionProvider: Send + Sync {
    fn acquire(&self, grant: &ProjectionGrant) -> Result<Box<dyn Projection>>;
}

struct ActiveProjection {
    projection: Box<dyn Projection>,
    target: CaptureTarget,
}

/// Holds the projection acquired from a grant until stopped.
///
/// Capturing and streaming to the target are not implemented yet.
pub struct ProjectionService {
    provider: Arc<dyn ProjectionProvider>,
    notice: ForegroundNotice,
    active: Mutex<Option<ActiveProjection>>,
}

impl ProjectionService {
    pub fn new(provider: Arc<dyn ProjectionProvider>, notice: ForegroundNotice) -> Self {
        Self {
            provider,
            notice,
            active: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }

    pub fn target(&self) -> Option<CaptureTarget> {
        self.lock().as_ref().map(|active| active.target.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveProjection>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(active: Option<ActiveProjection>) {
        let Some(mut active) = active else {
            return;
        };
        if let Err(e) = active.projection.stop() {
            tracing::warn!(error = %e, "projection_release_failed");
        }
        tracing::info!(ip = %active.target.ip, port = active.target.port, "projection_released");
    }
}

impl CaptureService for ProjectionService {
    fn start(&self, grant: ProjectionGrant, target: &CaptureTarget) -> Result<()> {
        let mut active = self.lock();
        Self::release(active.take());

        tracing::info!(
            channel = %self.notice.channel_id,
            id = self.notice.notification_id,
            text = %self.notice.text,
            "foreground_notice"
        );

        if grant.is_empty() {
            tracing::error!("missing_projection_grant_stopping");
            return Err(CaptureError::MissingGrant);
        }

        let projection = self.provider.acquire(&grant)?;
        tracing::info!(ip = %target.ip, port = target.port, "projection_acquired");

        // TODO: record playback audio from the projection and stream PCM to `target` over UDP.
        *active = Some(ActiveProjection {
            projection,
            target: target.clone(),
        });

        Ok(())
    }

    fn stop(&self) {
        let active = self.lock().take();
        Self::release(active);
    }
}

impl Drop for ProjectionService {
    fn drop(&mut self) {
        let active = self.lock().take();
        Self::release(active);
    }
}
