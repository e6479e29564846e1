//! Engine error type: the union of domain and persistence failures.

use thiserror::Error;

use kasir_core::CoreError;
use kasir_store::StoreError;

/// Anything a service operation can fail with.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Business rule violation from the core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Payment method turned off in the payment settings.
    #[error("Payment method not enabled: {0}")]
    MethodDisabled(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
