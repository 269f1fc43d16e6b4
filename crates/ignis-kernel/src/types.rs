use serde::{Deserialize, Serialize};

/// Opaque handle to a shape stored in the kernel.
///
/// A "shape" is always one logical object, but it may contain several
/// disjoint bodies (a compound). Handles are never reused and never
/// persisted; they are valid only for the kernel session that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub(crate) u64);

impl ShapeHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Kernel-internal identifier for a single topological entity (face, edge,
/// vertex or body). Stable for the lifetime of the shape it belongs to, but
/// NOT across derived shapes — every operation re-identifies its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KernelId(pub u64);

// Entity IDs pack the owning handle and a kind-offset index:
// faces 0..999, edges 1000..1999, vertices 2000..2999, bodies 3000..
pub(crate) const ID_STRIDE: u64 = 10_000;
pub(crate) const EDGE_BASE: u64 = 1_000;
pub(crate) const VERTEX_BASE: u64 = 2_000;
pub(crate) const BODY_BASE: u64 = 3_000;

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("chamfer failed: {reason}")]
    ChamferFailed { reason: String },

    #[error("shell failed: {reason}")]
    ShellFailed { reason: String },

    #[error("offset failed: {reason}")]
    OffsetFailed { reason: String },

    #[error("entity not found: {id:?}")]
    EntityNotFound { id: KernelId },

    #[error("shape not found for handle")]
    ShapeNotFound,

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}
