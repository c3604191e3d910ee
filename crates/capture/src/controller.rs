//! Consent state machine in front of the capture service.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{CaptureConfig, CaptureTarget, StartArgs};
use crate::consent::{ConsentRequester, ConsentResult};
use crate::error::Result;
use crate::service::CaptureService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum CaptureState {
    Idle,
    AwaitingConsent { target: CaptureTarget },
    Running { target: CaptureTarget },
}

/// Drives `start`/`stop` commands and consent results.
///
/// `start` only asks for consent; the service starts once a matching,
/// granted result carrying a grant arrives. Each prompt gets a fresh id and
/// only the answer to the latest one is applied.
pub struct CaptureController {
    config: CaptureConfig,
    consent: Arc<dyn ConsentRequester>,
    service: Arc<dyn CaptureService>,
    pending: CaptureTarget,
    state: CaptureState,
    last_request: u64,
    awaiting: Option<u64>,
}

impl CaptureController {
    pub fn new(
        config: CaptureConfig,
        consent: Arc<dyn ConsentRequester>,
        service: Arc<dyn CaptureService>,
    ) -> Self {
        let pending = config.initial_target.clone();
        Self {
            config,
            consent,
            service,
            pending,
            state: CaptureState::Idle,
            last_request: 0,
            awaiting: None,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Target the next consent grant will stream to.
    pub fn pending_target(&self) -> &CaptureTarget {
        &self.pending
    }

    /// Id of the consent prompt whose answer is awaited, if any.
    pub fn pending_request(&self) -> Option<u64> {
        self.awaiting
    }

    /// Merge `args` into the pending target and ask for consent.
    ///
    /// A running capture is stopped first.
    ///
    /// # Errors
    ///
    /// Fails if the consent prompt cannot be shown; the controller is then idle.
    pub fn start(&mut self, args: StartArgs) -> Result<()> {
        self.pending.merge(&args);

        if matches!(self.state, CaptureState::Running { .. }) {
            tracing::info!("capture_restart_requested");
            self.service.stop();
        }

        self.last_request += 1;
        let request_id = self.last_request;
        if let Err(e) = self
            .consent
            .request_consent(self.config.request_code, request_id)
        {
            tracing::error!(error = %e, "capture_consent_request_failed");
            self.awaiting = None;
            self.state = CaptureState::Idle;
            return Err(e);
        }

        tracing::info!(
            ip = %self.pending.ip,
            port = self.pending.port,
            request = request_id,
            "capture_consent_requested"
        );
        self.awaiting = Some(request_id);
        self.state = CaptureState::AwaitingConsent {
            target: self.pending.clone(),
        };
        Ok(())
    }

    /// Apply the platform's answer to a consent prompt.
    pub fn on_consent_result(&mut self, result: ConsentResult) -> &CaptureState {
        if result.request_code != self.config.request_code {
            tracing::debug!(code = result.request_code, "foreign_consent_result_ignored");
            return &self.state;
        }

        if self.awaiting != Some(result.request_id) {
            tracing::debug!(request = result.request_id, "stale_consent_result_ignored");
            return &self.state;
        }

        let CaptureState::AwaitingConsent { target } = &self.state else {
            tracing::debug!("unexpected_consent_result_ignored");
            return &self.state;
        };
        let target = target.clone();
        self.awaiting = None;

        let grant = match result.grant {
            Some(grant) if result.granted => grant,
            _ => {
                tracing::warn!(granted = result.granted, "capture_consent_not_granted");
                self.state = CaptureState::Idle;
                return &self.state;
            }
        };

        match self.service.start(grant, &target) {
            Ok(()) => {
                tracing::info!(ip = %target.ip, port = target.port, "capture_service_started");
                self.state = CaptureState::Running { target };
            }
            Err(e) => {
                tracing::error!(error = %e, "capture_service_start_failed");
                self.service.stop();
                self.state = CaptureState::Idle;
            }
        }

        &self.state
    }

    /// Stop capturing. Idempotent; a consent result arriving later is ignored.
    pub fn stop(&mut self) {
        match self.state {
            CaptureState::Idle => return,
            CaptureState::AwaitingConsent { .. } => {}
            CaptureState::Running { .. } => self.service.stop(),
        }
        self.awaiting = None;
        self.state = CaptureState::Idle;
        tracing::info!("capture_stopped");
    }
}
