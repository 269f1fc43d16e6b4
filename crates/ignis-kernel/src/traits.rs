use ignis_types::{Axis, TopoKind, TopoSignature};

use crate::types::{KernelError, KernelId, ShapeHandle};

/// Core geometry kernel trait: shape construction and modification.
///
/// All primitives are centered on the origin. Every operation returns a new
/// handle; inputs are never mutated, so the fluent layer can treat handles as
/// immutable values.
pub trait Kernel {
    /// Axis-aligned box with extents `x × y × z`.
    fn make_box(&mut self, x: f64, y: f64, z: f64) -> Result<ShapeHandle, KernelError>;

    /// Cylinder along +Z.
    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<ShapeHandle, KernelError>;

    fn make_sphere(&mut self, radius: f64) -> Result<ShapeHandle, KernelError>;

    /// Torus around the Z axis.
    fn make_torus(&mut self, major: f64, minor: f64) -> Result<ShapeHandle, KernelError>;

    /// Cone (or truncated cone when `top_radius > 0`) along +Z.
    fn make_cone(
        &mut self,
        bottom_radius: f64,
        top_radius: f64,
        height: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Wedge: a box whose top face is shrunk to the given X/Y spans.
    #[allow(clippy::too_many_arguments)]
    fn make_wedge(
        &mut self,
        xsize: f64,
        ysize: f64,
        zsize: f64,
        xmax: f64,
        xmin: f64,
        ymax: f64,
        ymin: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Prism from a closed planar polygon in the XY plane, extruded
    /// symmetrically along Z.
    fn extrude_polygon(
        &mut self,
        points: &[[f64; 2]],
        height: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Boolean union. A result that falls apart into disjoint pieces must
    /// come back as one compound handle (coalescing rule).
    fn boolean_union(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError>;

    /// Boolean intersection.
    fn boolean_intersect(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError>;

    /// Rigid translation.
    fn translate(
        &mut self,
        shape: &ShapeHandle,
        delta: [f64; 3],
    ) -> Result<ShapeHandle, KernelError>;

    /// Rigid rotation about the given world axis through the origin.
    fn rotate(
        &mut self,
        shape: &ShapeHandle,
        axis: Axis,
        degrees: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Fillet (round) the specified edges with the given radius.
    fn fillet_edges(
        &mut self,
        solid: &ShapeHandle,
        edges: &[KernelId],
        radius: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Chamfer (bevel) the specified edges with the given distance.
    fn chamfer_edges(
        &mut self,
        solid: &ShapeHandle,
        edges: &[KernelId],
        distance: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Hollow out a solid, leaving walls of the given thickness.
    fn shell_solid(
        &mut self,
        solid: &ShapeHandle,
        thickness: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Grow (positive) or shrink (negative) a whole shape.
    fn offset_shape(
        &mut self,
        shape: &ShapeHandle,
        distance: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Offset a single face into a standalone shape. Used as the per-face
    /// fallback when `offset_shape` rejects a compound.
    fn offset_face(&mut self, face: KernelId, distance: f64) -> Result<ShapeHandle, KernelError>;

    /// Merge several handles into one compound handle.
    fn coalesce(&mut self, parts: &[ShapeHandle]) -> Result<ShapeHandle, KernelError>;

    /// Normalize a shape into a strictly-solid (single body) representation.
    /// Required before fillet/chamfer.
    fn solidify(&mut self, shape: &ShapeHandle) -> Result<ShapeHandle, KernelError>;

    /// Minimum distance between a face and another shape. Cheap prefilter for
    /// the overlap test.
    fn face_clearance(
        &mut self,
        face: KernelId,
        other: &ShapeHandle,
    ) -> Result<f64, KernelError>;

    /// Area of the overlap between a face and another shape. The expensive,
    /// exact phase of the intersection filter.
    fn face_overlap_area(
        &mut self,
        face: KernelId,
        other: &ShapeHandle,
    ) -> Result<f64, KernelError>;
}

/// Topology introspection trait: read-only queries on kernel geometry.
pub trait KernelIntrospect {
    /// Axis-aligned bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
    /// over every body of the shape. Undefined (all zero) for empty shapes.
    fn bounding_box(&self, shape: &ShapeHandle) -> [f64; 6];

    /// List all faces of a shape, in deterministic order.
    fn list_faces(&self, shape: &ShapeHandle) -> Vec<KernelId>;

    /// List all edges of a shape, deduplicated.
    fn list_edges(&self, shape: &ShapeHandle) -> Vec<KernelId>;

    /// List all vertices of a shape, deduplicated.
    fn list_vertices(&self, shape: &ShapeHandle) -> Vec<KernelId>;

    /// List the bodies of a shape (one entry for a plain solid, several for a
    /// compound).
    fn list_solids(&self, shape: &ShapeHandle) -> Vec<KernelId>;

    /// The edges bounding a face.
    fn face_edges(&self, face: KernelId) -> Vec<KernelId>;

    /// Geometric signature of a single entity.
    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature;

    /// Signatures for every entity of a given kind in a shape.
    fn compute_all_signatures(
        &self,
        shape: &ShapeHandle,
        kind: TopoKind,
    ) -> Vec<(KernelId, TopoSignature)>;
}

/// Combined trait for callers that need both mutable Kernel access and
/// read-only KernelIntrospect access on the same object.
///
/// This avoids the borrow-checker issue of needing `&mut` and `&` on the same
/// value, and is the trait object the fluent layer stores.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}
