//! Geometry kernel seam for the ignis modeling layer.
//!
//! The fluent layer never talks to a concrete kernel directly; it goes
//! through the [`Kernel`] / [`KernelIntrospect`] traits. Two implementations
//! live here: [`TruckKernel`], backed by the truck B-rep crates, and
//! [`MockKernel`], a deterministic analytic double used by the test suite.

pub mod measure;
pub mod mock_kernel;
pub mod primitives;
pub mod traits;
pub mod truck_kernel;
pub mod types;

pub use mock_kernel::MockKernel;
pub use traits::{Kernel, KernelBundle, KernelIntrospect};
pub use truck_kernel::TruckKernel;
pub use types::{KernelError, KernelId, ShapeHandle};

/// Tolerance handed to truck's boolean operators.
pub const BOOLEAN_TOLERANCE: f64 = 0.05;

/// Tessellation tolerance used for measurement queries.
pub const MEASURE_TOLERANCE: f64 = 0.01;
