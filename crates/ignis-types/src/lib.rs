//! Shared plain-data types for the ignis workspace.
//!
//! Everything here is kernel-agnostic: topological kinds and signatures,
//! axis/face-side vocabulary, and axis-aligned bounding boxes. No geometry
//! is computed in this crate.

pub mod bbox;
pub mod side;
pub mod topo;

pub use bbox::BoundingBox;
pub use side::{Axis, FaceSide, UnknownFaceSide};
pub use topo::{TopoKind, TopoSignature};

/// Smallest dimension considered physically meaningful.
///
/// Dimensions at or below this are rejected by the validators before any
/// kernel call is made.
pub const TOLERANCE: f64 = 1e-6;
