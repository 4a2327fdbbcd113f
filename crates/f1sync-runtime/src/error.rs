//! Runtime errors.

use f1sync_calculator::CalculatorError;
use f1sync_core::{ActionPlan, MappingError, ReconcileError, SpecError};
use f1sync_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Calculator error: {0}")]
    Calculator(#[from] CalculatorError),

    #[error("Site error: {0}")]
    Site(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Post-apply verification failed, {} action(s) still pending", .remaining.len())]
    VerificationFailed { remaining: ActionPlan },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Box a reader or applier error.
pub fn site_error<E>(e: E) -> SyncError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SyncError::Site(Box::new(e))
}
