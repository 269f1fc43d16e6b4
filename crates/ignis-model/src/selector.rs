//! Typed, ordered selections over the topology of an entity.
//!
//! A selector is a view: it captures each element's identity and geometric
//! signature at enumeration time and never calls back into the kernel for
//! filtering or sorting. Every combinator returns a new selector with the
//! same parent; read-only operations work on detached selectors, while
//! operations that touch the owning entity (tag, fillet, chamfer,
//! face_intersecting) fail with `MissingParent` when there is none.

use ignis_kernel::KernelId;
use ignis_types::Axis;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::ModelError;

/// A face captured with its signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRef {
    pub id: KernelId,
    pub center: [f64; 3],
    pub normal: [f64; 3],
    pub area: f64,
    pub surface_type: String,
}

/// An edge captured with its signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub id: KernelId,
    pub center: [f64; 3],
    pub length: f64,
}

/// A vertex captured with its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRef {
    pub id: KernelId,
    pub position: [f64; 3],
}

/// A body captured with its box center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidRef {
    pub id: KernelId,
    pub center: [f64; 3],
}

/// One tagged topological element, as stored in an entity's tag map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaggedElement {
    Face(FaceRef),
    Edge(EdgeRef),
    Vertex(VertexRef),
    Solid(SolidRef),
}

/// Common view over a captured topological element.
pub trait TopoItem: Clone {
    fn id(&self) -> KernelId;
    fn center(&self) -> [f64; 3];
    fn into_tagged(self) -> TaggedElement;
}

impl TopoItem for FaceRef {
    fn id(&self) -> KernelId {
        self.id
    }
    fn center(&self) -> [f64; 3] {
        self.center
    }
    fn into_tagged(self) -> TaggedElement {
        TaggedElement::Face(self)
    }
}

impl TopoItem for EdgeRef {
    fn id(&self) -> KernelId {
        self.id
    }
    fn center(&self) -> [f64; 3] {
        self.center
    }
    fn into_tagged(self) -> TaggedElement {
        TaggedElement::Edge(self)
    }
}

impl TopoItem for VertexRef {
    fn id(&self) -> KernelId {
        self.id
    }
    fn center(&self) -> [f64; 3] {
        self.position
    }
    fn into_tagged(self) -> TaggedElement {
        TaggedElement::Vertex(self)
    }
}

impl TopoItem for SolidRef {
    fn id(&self) -> KernelId {
        self.id
    }
    fn center(&self) -> [f64; 3] {
        self.center
    }
    fn into_tagged(self) -> TaggedElement {
        TaggedElement::Solid(self)
    }
}

/// Filter criteria, resolved once at the call site.
///
/// The axis shorthand keeps elements whose center is strictly positive along
/// that axis.
pub enum FilterBy<T> {
    Axis(Axis),
    Predicate(Box<dyn Fn(&T) -> bool>),
}

impl<T> FilterBy<T> {
    pub fn predicate(f: impl Fn(&T) -> bool + 'static) -> Self {
        FilterBy::Predicate(Box::new(f))
    }
}

/// Sort criteria: an axis reading the element center, or a numeric key.
pub enum SortBy<T> {
    Axis(Axis),
    Key(Box<dyn Fn(&T) -> f64>),
}

impl<T> SortBy<T> {
    pub fn key(f: impl Fn(&T) -> f64 + 'static) -> Self {
        SortBy::Key(Box::new(f))
    }
}

/// An ordered selection of topological elements of one kind.
#[derive(Clone, Debug)]
pub struct Selector<T> {
    items: Vec<T>,
    parent: Option<Entity>,
}

pub type FaceSelector = Selector<FaceRef>;
pub type EdgeSelector = Selector<EdgeRef>;
pub type VertexSelector = Selector<VertexRef>;
pub type SolidSelector = Selector<SolidRef>;

impl<T: TopoItem> Selector<T> {
    pub(crate) fn with_parent(items: Vec<T>, parent: Entity) -> Self {
        Self {
            items,
            parent: Some(parent),
        }
    }

    /// A selector with no owning entity. Read-only combinators work; tag,
    /// fillet and chamfer will fail.
    pub fn detached(items: Vec<T>) -> Self {
        Self {
            items,
            parent: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn parent(&self) -> Option<&Entity> {
        self.parent.as_ref()
    }

    /// Keep elements matching the criteria. An empty selector stays empty.
    pub fn filter_by(&self, criteria: FilterBy<T>) -> Self {
        let items = self
            .items
            .iter()
            .filter(|item| match &criteria {
                FilterBy::Axis(axis) => axis.component(item.center()) > 0.0,
                FilterBy::Predicate(pred) => pred(item),
            })
            .cloned()
            .collect();
        Self {
            items,
            parent: self.parent.clone(),
        }
    }

    /// Stable sort by the criteria; `reverse` flips to descending order.
    pub fn sort_by(&self, criteria: SortBy<T>, reverse: bool) -> Self {
        let key = |item: &T| match &criteria {
            SortBy::Axis(axis) => axis.component(item.center()),
            SortBy::Key(f) => f(item),
        };
        let mut items = self.items.clone();
        items.sort_by(|a, b| {
            let ord = key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal);
            if reverse {
                ord.reverse()
            } else {
                ord
            }
        });
        Self {
            items,
            parent: self.parent.clone(),
        }
    }

    /// Append every element of this selection to the parent's tag list under
    /// `name`. Repeated calls accumulate rather than overwrite. Returns the
    /// selector back for chaining.
    pub fn tag(self, name: &str) -> Result<Self, ModelError> {
        let parent = self.parent.as_ref().ok_or_else(|| ModelError::MissingParent {
            operation: "tag".to_string(),
        })?;
        let elements: Vec<TaggedElement> = self
            .items
            .iter()
            .cloned()
            .map(TopoItem::into_tagged)
            .collect();
        parent.append_tags(name, elements);
        Ok(self)
    }

    fn require_parent(&self, operation: &str) -> Result<&Entity, ModelError> {
        self.parent.as_ref().ok_or_else(|| ModelError::MissingParent {
            operation: operation.to_string(),
        })
    }

    /// The single element closest to a point, or empty in empty out.
    fn nearest(&self, point: [f64; 3]) -> Self {
        let best = self
            .items
            .iter()
            .min_by(|a, b| {
                let da = dist2(a.center(), point);
                let db = dist2(b.center(), point);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned();
        Self {
            items: best.into_iter().collect(),
            parent: self.parent.clone(),
        }
    }

    /// The single element with the extreme center coordinate along an axis.
    fn extreme_along(&self, axis: Axis, positive: bool) -> Self {
        let best = self
            .items
            .iter()
            .max_by(|a, b| {
                let ka = axis.component(a.center()) * if positive { 1.0 } else { -1.0 };
                let kb = axis.component(b.center()) * if positive { 1.0 } else { -1.0 };
                ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned();
        Self {
            items: best.into_iter().collect(),
            parent: self.parent.clone(),
        }
    }
}

fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

impl Selector<FaceRef> {
    /// The single face whose center is highest along Z; empty in, empty out.
    pub fn top(&self) -> Self {
        self.extreme_along(Axis::Z, true)
    }

    /// The single face whose center is lowest along Z; empty in, empty out.
    pub fn bottom(&self) -> Self {
        self.extreme_along(Axis::Z, false)
    }

    /// Ascending sort by surface area.
    pub fn sort_by_area(&self) -> Self {
        self.sort_by(SortBy::key(|f: &FaceRef| f.area), false)
    }

    /// Keep faces that genuinely overlap `other` (shared area above
    /// `tolerance`), not merely touch it.
    ///
    /// Two phases: a cheap clearance prefilter rejects faces farther than the
    /// tolerance from the other shape, then an exact overlap-area test
    /// confirms the survivors. One tolerance governs both phases.
    pub fn face_intersecting(
        &self,
        other: &Entity,
        tolerance: f64,
    ) -> Result<Self, ModelError> {
        let parent = self.require_parent("face_intersecting")?;
        let mut kept = Vec::new();
        {
            let mut kernel = parent.kernel().borrow_mut();
            for face in &self.items {
                let clearance = kernel.face_clearance(face.id, other.shape_handle())?;
                if clearance > tolerance {
                    continue;
                }
                let overlap = kernel.face_overlap_area(face.id, other.shape_handle())?;
                if overlap > tolerance {
                    kept.push(face.clone());
                }
            }
        }
        Ok(Self {
            items: kept,
            parent: self.parent.clone(),
        })
    }

    /// Round the edges bounding the selected faces.
    pub fn fillet(&self, radius: f64) -> Result<Entity, ModelError> {
        let parent = self.require_parent("fillet")?;
        let edges = self.bounding_edges(parent);
        parent.fillet(radius, Some(&edges))
    }

    /// Bevel the edges bounding the selected faces.
    pub fn chamfer(&self, distance: f64) -> Result<Entity, ModelError> {
        let parent = self.require_parent("chamfer")?;
        let edges = self.bounding_edges(parent);
        parent.chamfer(distance, Some(&edges))
    }

    /// Deduplicated edges bounding the selected faces, in face order.
    fn bounding_edges(&self, parent: &Entity) -> Vec<KernelId> {
        let kernel = parent.kernel().borrow();
        let mut edges: Vec<KernelId> = Vec::new();
        for face in &self.items {
            for edge in kernel.as_introspect().face_edges(face.id) {
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }
        edges
    }
}

impl Selector<EdgeRef> {
    /// The single edge closest to a point.
    pub fn closest_to(&self, point: [f64; 3]) -> Self {
        self.nearest(point)
    }

    /// Round exactly the selected edges.
    pub fn fillet(&self, radius: f64) -> Result<Entity, ModelError> {
        let parent = self.require_parent("fillet")?;
        let ids: Vec<KernelId> = self.items.iter().map(|e| e.id).collect();
        parent.fillet(radius, Some(&ids))
    }

    /// Bevel exactly the selected edges.
    pub fn chamfer(&self, distance: f64) -> Result<Entity, ModelError> {
        let parent = self.require_parent("chamfer")?;
        let ids: Vec<KernelId> = self.items.iter().map(|e| e.id).collect();
        parent.chamfer(distance, Some(&ids))
    }
}

impl Selector<VertexRef> {
    /// The single vertex closest to a point.
    pub fn closest_to(&self, point: [f64; 3]) -> Self {
        self.nearest(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(id: u64, center: [f64; 3], area: f64) -> FaceRef {
        FaceRef {
            id: KernelId(id),
            center,
            normal: [0.0, 0.0, 1.0],
            area,
            surface_type: "planar".to_string(),
        }
    }

    fn detached_faces() -> Selector<FaceRef> {
        Selector::detached(vec![
            face(1, [0.0, 0.0, 5.0], 100.0),
            face(2, [0.0, 0.0, -5.0], 100.0),
            face(3, [2.0, 0.0, 0.0], 40.0),
            face(4, [-2.0, 0.0, 0.0], 60.0),
        ])
    }

    #[test]
    fn axis_filter_keeps_strictly_positive_centers() {
        let sel = detached_faces().filter_by(FilterBy::Axis(Axis::Z));
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.first().map(|f| f.id), Some(KernelId(1)));
    }

    #[test]
    fn filter_then_sort_never_reintroduces_excluded() {
        let source = detached_faces();
        let filtered = source.filter_by(FilterBy::predicate(|f: &FaceRef| f.area < 100.0));
        let sorted = filtered.sort_by(SortBy::key(|f: &FaceRef| f.area), true);
        assert!(sorted.len() <= source.len());
        assert_eq!(sorted.len(), 2);
        assert!(sorted.iter().all(|f| f.area < 100.0));
        assert_eq!(sorted.first().map(|f| f.area), Some(60.0));
    }

    #[test]
    fn empty_selector_is_total() {
        let empty: Selector<FaceRef> = Selector::detached(Vec::new());
        assert!(empty.first().is_none());
        assert!(empty.last().is_none());
        assert!(empty.filter_by(FilterBy::Axis(Axis::X)).is_empty());
        assert!(empty.sort_by(SortBy::Axis(Axis::Z), false).is_empty());
        assert!(empty.top().is_empty());
        assert!(empty.bottom().is_empty());
    }

    #[test]
    fn top_and_bottom_pick_extreme_faces() {
        let sel = detached_faces();
        assert_eq!(sel.top().first().map(|f| f.id), Some(KernelId(1)));
        assert_eq!(sel.bottom().first().map(|f| f.id), Some(KernelId(2)));
    }

    #[test]
    fn sort_by_area_is_ascending() {
        let areas: Vec<f64> = detached_faces()
            .sort_by_area()
            .iter()
            .map(|f| f.area)
            .collect();
        assert_eq!(areas, vec![40.0, 60.0, 100.0, 100.0]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let sorted = detached_faces().sort_by(SortBy::key(|f: &FaceRef| f.area), false);
        // The two area-100 faces keep their original relative order.
        let ids: Vec<KernelId> = sorted.iter().map(|f| f.id).collect();
        let pos1 = ids.iter().position(|&i| i == KernelId(1)).unwrap();
        let pos2 = ids.iter().position(|&i| i == KernelId(2)).unwrap();
        assert!(pos1 < pos2);
    }

    #[test]
    fn detached_tag_fails_with_missing_parent() {
        let err = detached_faces().tag("lid").unwrap_err();
        assert!(matches!(err, ModelError::MissingParent { .. }));
    }

    #[test]
    fn tagged_elements_round_trip_through_json() {
        let tagged = TaggedElement::Face(face(7, [0.0, 0.0, 5.0], 100.0));
        let json = serde_json::to_string(&tagged).unwrap();
        let back: TaggedElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tagged);
    }

    #[test]
    fn closest_vertex_wins() {
        let sel: Selector<VertexRef> = Selector::detached(vec![
            VertexRef {
                id: KernelId(1),
                position: [0.0, 0.0, 0.0],
            },
            VertexRef {
                id: KernelId(2),
                position: [5.0, 5.0, 5.0],
            },
        ]);
        let near = sel.closest_to([4.0, 4.0, 4.0]);
        assert_eq!(near.first().map(|v| v.id), Some(KernelId(2)));
    }
}
