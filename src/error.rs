//! Adapter-level errors and the kernel error translation.
//!
//! Only the kernel's "no matching route" failure is rewritten; every other
//! kernel error passes through intact inside `AdapterError::Kernel`.

use thiserror::Error;

use crate::kernel::KernelError;
use crate::lifecycle::LifecycleState;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The kernel could not be brought to the ready state. The adapter is
    /// never handed out; `stage` is the last state the kernel reached.
    #[error("Kernel construction failed: {reason}")]
    KernelConstructionFailed {
        reason: String,
        stage: LifecycleState,
        #[source]
        source: Option<KernelError>,
    },

    /// No route matched; carries the kernel's message.
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// Any other kernel failure, unchanged.
    #[error(transparent)]
    Kernel(KernelError),

    /// The adapter is not accepting requests in its current state.
    #[error("Adapter is not ready (state: {0})")]
    NotReady(LifecycleState),
}

impl AdapterError {
    pub fn construction(stage: LifecycleState, reason: impl Into<String>) -> Self {
        AdapterError::KernelConstructionFailed {
            reason: reason.into(),
            stage,
            source: None,
        }
    }

    pub fn construction_from(
        stage: LifecycleState,
        reason: impl Into<String>,
        source: KernelError,
    ) -> Self {
        AdapterError::KernelConstructionFailed {
            reason: reason.into(),
            stage,
            source: Some(source),
        }
    }

    pub fn is_route_not_found(&self) -> bool {
        matches!(self, AdapterError::RouteNotFound(_))
    }
}

impl From<KernelError> for AdapterError {
    fn from(error: KernelError) -> Self {
        match error {
            KernelError::RouteNotFound(message) => AdapterError::RouteNotFound(message),
            other => AdapterError::Kernel(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_route_not_found_is_translated() {
        let error = AdapterError::from(KernelError::RouteNotFound(
            "No route found for \"GET /nope\"".into(),
        ));
        match error {
            AdapterError::RouteNotFound(message) => {
                assert_eq!(message, "No route found for \"GET /nope\"")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_other_errors_pass_through() {
        let error = AdapterError::from(KernelError::application("database is down"));
        assert!(!error.is_route_not_found());
        assert_eq!(error.to_string(), "database is down");
        assert!(matches!(
            error,
            AdapterError::Kernel(KernelError::Application(_))
        ));
    }

    #[test]
    fn test_construction_keeps_source() {
        let error = AdapterError::construction_from(
            LifecycleState::Booted,
            "preload",
            KernelError::Preload("cache".into()),
        );
        assert_eq!(error.to_string(), "Kernel construction failed: preload");
        assert_eq!(
            error.source().unwrap().to_string(),
            "Kernel preload failed: cache"
        );
    }
}
