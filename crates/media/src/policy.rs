use crate::session::ControllerRef;

/// Picks the active controller out of the enumerator's session list.
pub trait SelectionPolicy: Send + Sync {
    fn select(&self, controllers: &[ControllerRef]) -> Option<ControllerRef>;
}

/// First entry wins.
///
/// Relies on the enumerator listing sessions by priority/recency, which the
/// platform does not document as a guarantee.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstActive;

impl SelectionPolicy for FirstActive {
    fn select(&self, controllers: &[ControllerRef]) -> Option<ControllerRef> {
        controllers.first().cloned()
    }
}
