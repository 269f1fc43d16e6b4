use ignis_kernel::KernelError;

/// Errors raised by the fluent modeling layer.
///
/// Everything here is local, synchronous and non-recoverable by retry: the
/// policy is to fail fast with a precise, named diagnostic rather than
/// silently producing degenerate geometry.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Unknown face name, bad selector criteria, unsupported hole size/fit.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A registry lookup missed.
    #[error("no part named '{name}' in the registry")]
    NotFound { name: String },

    /// A dimension or vertex check failed before any kernel call was made.
    #[error("infeasible geometry for {name}: {violations}")]
    InfeasibleGeometry { name: String, violations: String },

    /// A selector operation that mutates the owning entity was invoked on a
    /// detached selector.
    #[error("'{operation}' requires a parent entity")]
    MissingParent { operation: String },

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

impl From<ignis_types::UnknownFaceSide> for ModelError {
    fn from(err: ignis_types::UnknownFaceSide) -> Self {
        ModelError::InvalidArgument {
            reason: err.to_string(),
        }
    }
}
