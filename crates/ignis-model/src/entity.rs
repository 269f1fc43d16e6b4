//! The Entity value: a shape handle plus name and tag bookkeeping.
//!
//! Entities are immutable with respect to geometry: every operation returns a
//! new Entity wrapping a new kernel handle. The tag map is the one piece of
//! interior mutability — selectors append to their parent's map through a
//! shared cell, and derived entities snapshot the map forward into a fresh
//! cell of their own.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;
use uuid::Uuid;

use ignis_kernel::{KernelBundle, KernelError, KernelId, ShapeHandle};
use ignis_types::{Axis, BoundingBox, FaceSide, TopoKind};

use crate::align::alignment_delta;
use crate::error::ModelError;
use crate::selector::{
    EdgeRef, FaceRef, Selector, SolidRef, TaggedElement, VertexRef,
};

/// The kernel shared by every entity of one modeling session.
pub type SharedKernel = Rc<RefCell<dyn KernelBundle>>;

/// Tag name to ordered elements. Repeated tagging under one name accumulates.
pub type TagMap = BTreeMap<String, Vec<TaggedElement>>;

/// An immutable solid with a name, a tag map and a stable identity.
#[derive(Clone)]
pub struct Entity {
    kernel: SharedKernel,
    shape: ShapeHandle,
    name: Option<String>,
    id: Uuid,
    tags: Rc<RefCell<TagMap>>,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("shape", &self.shape)
            .finish()
    }
}

impl Entity {
    pub(crate) fn new(kernel: SharedKernel, shape: ShapeHandle) -> Self {
        Self {
            kernel,
            shape,
            name: None,
            id: Uuid::new_v4(),
            tags: Rc::new(RefCell::new(TagMap::new())),
        }
    }

    /// A copy of this entity carrying a registry name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Stable identity, carried through every derived entity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn kernel(&self) -> &SharedKernel {
        &self.kernel
    }

    pub(crate) fn shape_handle(&self) -> &ShapeHandle {
        &self.shape
    }

    /// New entity over a derived shape: same kernel, name and identity, with
    /// a snapshot of the current tag map.
    fn derive(&self, shape: ShapeHandle) -> Entity {
        Entity {
            kernel: Rc::clone(&self.kernel),
            shape,
            name: self.name.clone(),
            id: self.id,
            tags: Rc::new(RefCell::new(self.tags.borrow().clone())),
        }
    }

    // --- bounding box and convenience readers ---

    /// Axis-aligned bounding box, freshly computed from the kernel.
    pub fn bbox(&self) -> BoundingBox {
        let extents = self.kernel.borrow().bounding_box(&self.shape);
        BoundingBox::from_extents(extents)
    }

    /// Z of the top face plane.
    pub fn top(&self) -> f64 {
        self.bbox().max_along(Axis::Z)
    }

    /// Maximum X.
    pub fn right(&self) -> f64 {
        self.bbox().max_along(Axis::X)
    }

    /// Estimated radius: half the X extent. Meaningful for spheres and
    /// cylinders standing on Z.
    pub fn radius(&self) -> f64 {
        self.bbox().size()[0] / 2.0
    }

    // --- rigid transforms ---

    /// Rigid translation.
    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Result<Entity, ModelError> {
        let shape = self.kernel.borrow_mut().translate(&self.shape, [dx, dy, dz])?;
        Ok(self.derive(shape))
    }

    /// Alias for [`translate`](Entity::translate).
    pub fn move_by(&self, dx: f64, dy: f64, dz: f64) -> Result<Entity, ModelError> {
        self.translate(dx, dy, dz)
    }

    /// Rotate about the world axes through the origin, X then Y then Z,
    /// skipping zero angles. Rotate before translating.
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Result<Entity, ModelError> {
        let mut shape = self.shape.clone();
        {
            let mut kernel = self.kernel.borrow_mut();
            for (axis, degrees) in [(Axis::X, x_deg), (Axis::Y, y_deg), (Axis::Z, z_deg)] {
                if degrees != 0.0 {
                    shape = kernel.rotate(&shape, axis, degrees)?;
                }
            }
        }
        Ok(self.derive(shape))
    }

    // --- boolean algebra ---

    pub fn union(&self, other: &Entity) -> Result<Entity, ModelError> {
        let shape = self
            .kernel
            .borrow_mut()
            .boolean_union(&self.shape, &other.shape)?;
        Ok(self.derive(shape))
    }

    pub fn subtract(&self, other: &Entity) -> Result<Entity, ModelError> {
        let shape = self
            .kernel
            .borrow_mut()
            .boolean_subtract(&self.shape, &other.shape)?;
        Ok(self.derive(shape))
    }

    pub fn intersect(&self, other: &Entity) -> Result<Entity, ModelError> {
        let shape = self
            .kernel
            .borrow_mut()
            .boolean_intersect(&self.shape, &other.shape)?;
        Ok(self.derive(shape))
    }

    // --- modifications ---

    /// Round edges. `edges` limits the operation to a subset selected on the
    /// current shape; `None` rounds every edge.
    pub fn fillet(&self, radius: f64, edges: Option<&[KernelId]>) -> Result<Entity, ModelError> {
        let shape = {
            let mut kernel = self.kernel.borrow_mut();
            let solid = kernel.solidify(&self.shape)?;
            let edge_ids = match edges {
                None => kernel.as_introspect().list_edges(&solid),
                Some(ids) => remap_edges(kernel.as_introspect(), &self.shape, &solid, ids)?,
            };
            kernel.fillet_edges(&solid, &edge_ids, radius)?
        };
        Ok(self.derive(shape))
    }

    /// Bevel edges; same subset semantics as [`fillet`](Entity::fillet).
    pub fn chamfer(&self, distance: f64, edges: Option<&[KernelId]>) -> Result<Entity, ModelError> {
        let shape = {
            let mut kernel = self.kernel.borrow_mut();
            let solid = kernel.solidify(&self.shape)?;
            let edge_ids = match edges {
                None => kernel.as_introspect().list_edges(&solid),
                Some(ids) => remap_edges(kernel.as_introspect(), &self.shape, &solid, ids)?,
            };
            kernel.chamfer_edges(&solid, &edge_ids, distance)?
        };
        Ok(self.derive(shape))
    }

    /// Hollowed version with walls of the given thickness.
    pub fn shell(&self, thickness: f64) -> Result<Entity, ModelError> {
        let shape = self.kernel.borrow_mut().shell_solid(&self.shape, thickness)?;
        Ok(self.derive(shape))
    }

    /// Grow (positive) or shrink (negative) the shape.
    ///
    /// When the kernel rejects a whole-shape offset (compound input), falls
    /// back to offsetting face by face, silently skipping faces that fail
    /// individually, and fails only when every face fails.
    pub fn offset(&self, distance: f64) -> Result<Entity, ModelError> {
        let mut kernel = self.kernel.borrow_mut();
        match kernel.offset_shape(&self.shape, distance) {
            Ok(shape) => {
                drop(kernel);
                Ok(self.derive(shape))
            }
            Err(KernelError::NotSupported { .. }) => {
                let faces = kernel.as_introspect().list_faces(&self.shape);
                let mut parts = Vec::new();
                for face in faces {
                    match kernel.offset_face(face, distance) {
                        Ok(part) => parts.push(part),
                        Err(err) => {
                            debug!(?face, %err, "skipping face that failed to offset");
                        }
                    }
                }
                if parts.is_empty() {
                    return Err(KernelError::OffsetFailed {
                        reason: format!("offset {distance} failed on every face"),
                    }
                    .into());
                }
                let shape = kernel.coalesce(&parts)?;
                drop(kernel);
                Ok(self.derive(shape))
            }
            Err(err) => Err(err.into()),
        }
    }

    // --- alignment ---

    /// Snap this entity against the named face of `target`, leaving the
    /// other two axes centered on the target. Positive `offset` widens the
    /// gap, negative embeds.
    pub fn align(&self, target: &Entity, side: FaceSide, offset: f64) -> Result<Entity, ModelError> {
        let delta = alignment_delta(&self.bbox(), &target.bbox(), side, offset);
        self.translate(delta[0], delta[1], delta[2])
    }

    /// [`align`](Entity::align) with the face given by name; unknown names
    /// fail with an invalid-argument error listing the six valid values.
    pub fn align_named(
        &self,
        target: &Entity,
        face: &str,
        offset: f64,
    ) -> Result<Entity, ModelError> {
        let side: FaceSide = face.parse()?;
        self.align(target, side, offset)
    }

    pub fn on_top_of(&self, target: &Entity, offset: f64) -> Result<Entity, ModelError> {
        self.align(target, FaceSide::Top, offset)
    }

    pub fn under(&self, target: &Entity, offset: f64) -> Result<Entity, ModelError> {
        self.align(target, FaceSide::Bottom, offset)
    }

    pub fn right_of(&self, target: &Entity, offset: f64) -> Result<Entity, ModelError> {
        self.align(target, FaceSide::Right, offset)
    }

    pub fn left_of(&self, target: &Entity, offset: f64) -> Result<Entity, ModelError> {
        self.align(target, FaceSide::Left, offset)
    }

    pub fn in_front_of(&self, target: &Entity, offset: f64) -> Result<Entity, ModelError> {
        self.align(target, FaceSide::Front, offset)
    }

    pub fn behind(&self, target: &Entity, offset: f64) -> Result<Entity, ModelError> {
        self.align(target, FaceSide::Back, offset)
    }

    // --- selectors ---

    /// All faces of the shape, with signatures captured now.
    pub fn faces(&self) -> Selector<FaceRef> {
        let items = {
            let kernel = self.kernel.borrow();
            kernel
                .compute_all_signatures(&self.shape, TopoKind::Face)
                .into_iter()
                .map(|(id, sig)| FaceRef {
                    id,
                    center: sig.centroid.unwrap_or([0.0; 3]),
                    normal: sig.normal.unwrap_or([0.0; 3]),
                    area: sig.area.unwrap_or(0.0),
                    surface_type: sig.surface_type.unwrap_or_default(),
                })
                .collect()
        };
        Selector::with_parent(items, self.clone())
    }

    pub fn edges(&self) -> Selector<EdgeRef> {
        let items = {
            let kernel = self.kernel.borrow();
            kernel
                .compute_all_signatures(&self.shape, TopoKind::Edge)
                .into_iter()
                .map(|(id, sig)| EdgeRef {
                    id,
                    center: sig.centroid.unwrap_or([0.0; 3]),
                    length: sig.length.unwrap_or(0.0),
                })
                .collect()
        };
        Selector::with_parent(items, self.clone())
    }

    pub fn vertices(&self) -> Selector<VertexRef> {
        let items = {
            let kernel = self.kernel.borrow();
            kernel
                .compute_all_signatures(&self.shape, TopoKind::Vertex)
                .into_iter()
                .map(|(id, sig)| VertexRef {
                    id,
                    position: sig.centroid.unwrap_or([0.0; 3]),
                })
                .collect()
        };
        Selector::with_parent(items, self.clone())
    }

    pub fn solids(&self) -> Selector<SolidRef> {
        let items = {
            let kernel = self.kernel.borrow();
            kernel
                .compute_all_signatures(&self.shape, TopoKind::Solid)
                .into_iter()
                .map(|(id, sig)| SolidRef {
                    id,
                    center: sig.centroid.unwrap_or([0.0; 3]),
                })
                .collect()
        };
        Selector::with_parent(items, self.clone())
    }

    // --- tags ---

    /// Elements previously tagged under `name`; empty if the tag is unknown.
    pub fn get_by_tag(&self, name: &str) -> Vec<TaggedElement> {
        self.tags.borrow().get(name).cloned().unwrap_or_default()
    }

    /// Names of all tags on this entity.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.borrow().keys().cloned().collect()
    }

    pub(crate) fn append_tags(&self, name: &str, elements: Vec<TaggedElement>) {
        self.tags
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .extend(elements);
    }
}

/// Map edge selections from one shape onto its solidified counterpart.
/// Solidify preserves enumeration order, so selections remap by position.
fn remap_edges(
    introspect: &dyn ignis_kernel::KernelIntrospect,
    from: &ShapeHandle,
    to: &ShapeHandle,
    ids: &[KernelId],
) -> Result<Vec<KernelId>, ModelError> {
    let old = introspect.list_edges(from);
    let new = introspect.list_edges(to);
    ids.iter()
        .map(|id| {
            old.iter()
                .position(|e| e == id)
                .and_then(|i| new.get(i).copied())
                .ok_or(ModelError::Kernel(KernelError::EntityNotFound { id: *id }))
        })
        .collect()
}
