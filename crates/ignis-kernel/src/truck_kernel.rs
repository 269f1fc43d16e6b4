//! TruckKernel — geometry kernel backed by the truck B-rep crates.
//!
//! Shapes are stored as `Vec<Solid>`: one element for a plain solid, several
//! for a compound. Fillet/chamfer/shell/offset are not expressible with
//! truck's current API and report `NotSupported`; the deterministic
//! [`MockKernel`](crate::mock_kernel::MockKernel) covers those paths in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;
use truck_modeling::builder;
use truck_modeling::topology::Solid;
use truck_modeling::{Point3, Rad, Vector3};

use ignis_types::{Axis, TopoKind, TopoSignature};

use crate::measure::{measure_body, BodyMeasure};
use crate::traits::{Kernel, KernelIntrospect};
use crate::types::{
    KernelError, KernelId, ShapeHandle, BODY_BASE, EDGE_BASE, ID_STRIDE, VERTEX_BASE,
};
use crate::{primitives, BOOLEAN_TOLERANCE, MEASURE_TOLERANCE};

/// Real geometry kernel wrapping truck.
pub struct TruckKernel {
    next_handle: u64,
    shapes: HashMap<u64, Vec<Solid>>,
    /// Lazily computed measurement cache, one entry per handle.
    measures: RefCell<HashMap<u64, Rc<Vec<BodyMeasure>>>>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            shapes: HashMap::new(),
            measures: RefCell::new(HashMap::new()),
        }
    }

    fn store(&mut self, bodies: Vec<Solid>) -> ShapeHandle {
        let handle = ShapeHandle(self.next_handle);
        self.next_handle += 1;
        self.shapes.insert(handle.id(), bodies);
        handle
    }

    fn bodies(&self, handle: &ShapeHandle) -> Result<&Vec<Solid>, KernelError> {
        self.shapes
            .get(&handle.id())
            .ok_or(KernelError::ShapeNotFound)
    }

    fn measures_of(&self, handle_id: u64) -> Rc<Vec<BodyMeasure>> {
        if let Some(m) = self.measures.borrow().get(&handle_id) {
            return Rc::clone(m);
        }
        let measured: Vec<BodyMeasure> = self
            .shapes
            .get(&handle_id)
            .map(|bodies| {
                bodies
                    .iter()
                    .map(|b| measure_body(b, MEASURE_TOLERANCE))
                    .collect()
            })
            .unwrap_or_default();
        let rc = Rc::new(measured);
        self.measures
            .borrow_mut()
            .insert(handle_id, Rc::clone(&rc));
        rc
    }

    fn transform_each<F>(&mut self, shape: &ShapeHandle, f: F) -> Result<ShapeHandle, KernelError>
    where
        F: Fn(&Solid) -> Solid,
    {
        let moved: Vec<Solid> = self.bodies(shape)?.iter().map(f).collect();
        Ok(self.store(moved))
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(entity: KernelId) -> (u64, u64) {
    (entity.0 / ID_STRIDE, entity.0 % ID_STRIDE)
}

fn boxes_touch(a: [f64; 6], b: [f64; 6], tol: f64) -> bool {
    (0..3).all(|i| a[i] <= b[i + 3] + tol && b[i] <= a[i + 3] + tol)
}

impl Kernel for TruckKernel {
    fn make_box(&mut self, x: f64, y: f64, z: f64) -> Result<ShapeHandle, KernelError> {
        Ok(self.store(vec![primitives::centered_box(x, y, z)]))
    }

    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<ShapeHandle, KernelError> {
        let solid = primitives::centered_cylinder(radius, height)?;
        Ok(self.store(vec![solid]))
    }

    fn make_sphere(&mut self, radius: f64) -> Result<ShapeHandle, KernelError> {
        let solid = primitives::centered_sphere(radius)?;
        Ok(self.store(vec![solid]))
    }

    fn make_torus(&mut self, major: f64, minor: f64) -> Result<ShapeHandle, KernelError> {
        let solid = primitives::centered_torus(major, minor)?;
        Ok(self.store(vec![solid]))
    }

    fn make_cone(
        &mut self,
        bottom_radius: f64,
        top_radius: f64,
        height: f64,
    ) -> Result<ShapeHandle, KernelError> {
        let solid = primitives::centered_cone(bottom_radius, top_radius, height)?;
        Ok(self.store(vec![solid]))
    }

    fn make_wedge(
        &mut self,
        xsize: f64,
        ysize: f64,
        zsize: f64,
        xmax: f64,
        xmin: f64,
        ymax: f64,
        ymin: f64,
    ) -> Result<ShapeHandle, KernelError> {
        let solid = primitives::centered_wedge(xsize, ysize, zsize, xmax, xmin, ymax, ymin)?;
        Ok(self.store(vec![solid]))
    }

    fn extrude_polygon(
        &mut self,
        points: &[[f64; 2]],
        height: f64,
    ) -> Result<ShapeHandle, KernelError> {
        let solid = primitives::polygon_prism(points, height)?;
        Ok(self.store(vec![solid]))
    }

    fn boolean_union(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError> {
        let bodies_a = self.bodies(a)?.clone();
        let bodies_b = self.bodies(b)?.clone();

        // Bbox-disjoint operands can never merge, and truck's `or` would
        // glue them into one solid of two shells; keep them as a proper
        // compound instead (coalescing rule).
        let overlapping = boxes_touch(self.bounding_box(a), self.bounding_box(b), BOOLEAN_TOLERANCE);

        if overlapping && bodies_a.len() == 1 && bodies_b.len() == 1 {
            if let Some(merged) = truck_shapeops::or(&bodies_a[0], &bodies_b[0], BOOLEAN_TOLERANCE)
            {
                return Ok(self.store(vec![merged]));
            }
            // No intersection curves: the operands merely touch. Coalesce
            // into a compound so the result stays one logical shape.
            debug!("boolean union produced no merge; coalescing into compound");
        }

        let mut all = bodies_a;
        all.extend(bodies_b);
        Ok(self.store(all))
    }

    fn boolean_subtract(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError> {
        let bodies_a = self.bodies(a)?.clone();
        let bodies_b = self.bodies(b)?.clone();

        let mut result: Vec<Solid> = Vec::new();
        for body in bodies_a {
            // Subtraction = A ∩ ¬B, applied body by body. not() mutates in
            // place. A tool body that yields no intersection leaves the
            // target body unchanged.
            let mut current = vec![body];
            for tool in &bodies_b {
                let mut negated = tool.clone();
                negated.not();
                current = current
                    .into_iter()
                    .map(|s| {
                        truck_shapeops::and(&s, &negated, BOOLEAN_TOLERANCE).unwrap_or(s)
                    })
                    .collect();
            }
            result.extend(current);
        }

        if result.is_empty() {
            return Err(KernelError::BooleanFailed {
                reason: "subtraction removed every body".to_string(),
            });
        }
        Ok(self.store(result))
    }

    fn boolean_intersect(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError> {
        let bodies_a = self.bodies(a)?.clone();
        let bodies_b = self.bodies(b)?.clone();

        let mut result: Vec<Solid> = Vec::new();
        for body_a in &bodies_a {
            for body_b in &bodies_b {
                if let Some(common) = truck_shapeops::and(body_a, body_b, BOOLEAN_TOLERANCE) {
                    result.push(common);
                }
            }
        }

        if result.is_empty() {
            return Err(KernelError::BooleanFailed {
                reason: "intersection is empty".to_string(),
            });
        }
        Ok(self.store(result))
    }

    fn translate(
        &mut self,
        shape: &ShapeHandle,
        delta: [f64; 3],
    ) -> Result<ShapeHandle, KernelError> {
        let v = Vector3::new(delta[0], delta[1], delta[2]);
        self.transform_each(shape, |s| builder::translated(s, v))
    }

    fn rotate(
        &mut self,
        shape: &ShapeHandle,
        axis: Axis,
        degrees: f64,
    ) -> Result<ShapeHandle, KernelError> {
        let dir = axis.direction();
        let axis_v = Vector3::new(dir[0], dir[1], dir[2]);
        let angle = Rad(degrees.to_radians());
        self.transform_each(shape, |s| {
            builder::rotated(s, Point3::new(0.0, 0.0, 0.0), axis_v, angle)
        })
    }

    fn fillet_edges(
        &mut self,
        _solid: &ShapeHandle,
        _edges: &[KernelId],
        _radius: f64,
    ) -> Result<ShapeHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "fillet_edges".to_string(),
        })
    }

    fn chamfer_edges(
        &mut self,
        _solid: &ShapeHandle,
        _edges: &[KernelId],
        _distance: f64,
    ) -> Result<ShapeHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "chamfer_edges".to_string(),
        })
    }

    fn shell_solid(
        &mut self,
        _solid: &ShapeHandle,
        _thickness: f64,
    ) -> Result<ShapeHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "shell_solid".to_string(),
        })
    }

    fn offset_shape(
        &mut self,
        _shape: &ShapeHandle,
        _distance: f64,
    ) -> Result<ShapeHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "offset_shape".to_string(),
        })
    }

    fn offset_face(&mut self, _face: KernelId, _distance: f64) -> Result<ShapeHandle, KernelError> {
        Err(KernelError::NotSupported {
            operation: "offset_face".to_string(),
        })
    }

    fn coalesce(&mut self, parts: &[ShapeHandle]) -> Result<ShapeHandle, KernelError> {
        let mut all: Vec<Solid> = Vec::new();
        for part in parts {
            all.extend(self.bodies(part)?.clone());
        }
        if all.is_empty() {
            return Err(KernelError::Other {
                message: "cannot coalesce zero parts".to_string(),
            });
        }
        Ok(self.store(all))
    }

    fn solidify(&mut self, shape: &ShapeHandle) -> Result<ShapeHandle, KernelError> {
        let bodies = self.bodies(shape)?.clone();
        match bodies.len() {
            0 => Err(KernelError::ShapeNotFound),
            1 => Ok(self.store(bodies)),
            _ => {
                let mut iter = bodies.into_iter();
                let Some(mut acc) = iter.next() else {
                    return Err(KernelError::ShapeNotFound);
                };
                for body in iter {
                    acc = truck_shapeops::or(&acc, &body, BOOLEAN_TOLERANCE).ok_or_else(|| {
                        KernelError::BooleanFailed {
                            reason: "cannot merge disjoint bodies into a single solid"
                                .to_string(),
                        }
                    })?;
                }
                Ok(self.store(vec![acc]))
            }
        }
    }

    fn face_clearance(
        &mut self,
        _face: KernelId,
        _other: &ShapeHandle,
    ) -> Result<f64, KernelError> {
        Err(KernelError::NotSupported {
            operation: "face_clearance".to_string(),
        })
    }

    fn face_overlap_area(
        &mut self,
        _face: KernelId,
        _other: &ShapeHandle,
    ) -> Result<f64, KernelError> {
        Err(KernelError::NotSupported {
            operation: "face_overlap_area".to_string(),
        })
    }
}

impl KernelIntrospect for TruckKernel {
    fn bounding_box(&self, shape: &ShapeHandle) -> [f64; 6] {
        let measures = self.measures_of(shape.id());
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for body in measures.iter() {
            for i in 0..3 {
                min[i] = min[i].min(body.bbox[i]);
                max[i] = max[i].max(body.bbox[i + 3]);
            }
        }
        if min[0] > max[0] {
            return [0.0; 6];
        }
        [min[0], min[1], min[2], max[0], max[1], max[2]]
    }

    fn list_faces(&self, shape: &ShapeHandle) -> Vec<KernelId> {
        let measures = self.measures_of(shape.id());
        let total: usize = measures.iter().map(|b| b.faces.len()).sum();
        (0..total as u64)
            .map(|i| KernelId(shape.id() * ID_STRIDE + i))
            .collect()
    }

    fn list_edges(&self, shape: &ShapeHandle) -> Vec<KernelId> {
        let measures = self.measures_of(shape.id());
        let total: usize = measures.iter().map(|b| b.edges.len()).sum();
        (0..total as u64)
            .map(|i| KernelId(shape.id() * ID_STRIDE + EDGE_BASE + i))
            .collect()
    }

    fn list_vertices(&self, shape: &ShapeHandle) -> Vec<KernelId> {
        let measures = self.measures_of(shape.id());
        let total: usize = measures.iter().map(|b| b.vertices.len()).sum();
        (0..total as u64)
            .map(|i| KernelId(shape.id() * ID_STRIDE + VERTEX_BASE + i))
            .collect()
    }

    fn list_solids(&self, shape: &ShapeHandle) -> Vec<KernelId> {
        let measures = self.measures_of(shape.id());
        (0..measures.len() as u64)
            .map(|i| KernelId(shape.id() * ID_STRIDE + BODY_BASE + i))
            .collect()
    }

    fn face_edges(&self, face: KernelId) -> Vec<KernelId> {
        let (handle_id, face_idx) = decode(face);
        let measures = self.measures_of(handle_id);

        let mut face_offset = 0usize;
        let mut edge_offset = 0usize;
        for body in measures.iter() {
            let local = face_idx as usize - face_offset;
            if local < body.faces.len() {
                return body.faces[local]
                    .edge_indices
                    .iter()
                    .map(|&i| {
                        KernelId(handle_id * ID_STRIDE + EDGE_BASE + (edge_offset + i) as u64)
                    })
                    .collect();
            }
            face_offset += body.faces.len();
            edge_offset += body.edges.len();
        }
        Vec::new()
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        let (handle_id, offset) = decode(entity);
        let measures = self.measures_of(handle_id);

        match kind {
            TopoKind::Face => {
                let mut idx = offset as usize;
                for body in measures.iter() {
                    if idx < body.faces.len() {
                        let f = &body.faces[idx];
                        return TopoSignature {
                            surface_type: Some(f.surface_type.clone()),
                            area: Some(f.area),
                            centroid: Some(f.centroid),
                            normal: Some(f.normal),
                            bbox: Some(f.bbox),
                            length: None,
                        };
                    }
                    idx -= body.faces.len();
                }
            }
            TopoKind::Edge => {
                // checked_sub: a mismatched id/kind pair decodes below the
                // kind's offset range and must yield an empty signature.
                let Some(rel) = offset.checked_sub(EDGE_BASE) else {
                    return TopoSignature::empty();
                };
                let mut idx = rel as usize;
                for body in measures.iter() {
                    if idx < body.edges.len() {
                        let e = &body.edges[idx];
                        return TopoSignature {
                            surface_type: Some("line".to_string()),
                            area: None,
                            centroid: Some(e.centroid),
                            normal: None,
                            bbox: None,
                            length: Some(e.length),
                        };
                    }
                    idx -= body.edges.len();
                }
            }
            TopoKind::Vertex => {
                let Some(rel) = offset.checked_sub(VERTEX_BASE) else {
                    return TopoSignature::empty();
                };
                let mut idx = rel as usize;
                for body in measures.iter() {
                    if idx < body.vertices.len() {
                        return TopoSignature {
                            surface_type: Some("point".to_string()),
                            area: None,
                            centroid: Some(body.vertices[idx]),
                            normal: None,
                            bbox: None,
                            length: None,
                        };
                    }
                    idx -= body.vertices.len();
                }
            }
            TopoKind::Solid => {
                let Some(rel) = offset.checked_sub(BODY_BASE) else {
                    return TopoSignature::empty();
                };
                if let Some(body) = measures.get(rel as usize) {
                    let b = body.bbox;
                    return TopoSignature {
                        surface_type: None,
                        area: None,
                        centroid: Some([
                            (b[0] + b[3]) / 2.0,
                            (b[1] + b[4]) / 2.0,
                            (b[2] + b[5]) / 2.0,
                        ]),
                        normal: None,
                        bbox: Some(b),
                        length: None,
                    };
                }
            }
            _ => {}
        }
        TopoSignature::empty()
    }

    fn compute_all_signatures(
        &self,
        shape: &ShapeHandle,
        kind: TopoKind,
    ) -> Vec<(KernelId, TopoSignature)> {
        let ids = match kind {
            TopoKind::Face => self.list_faces(shape),
            TopoKind::Edge => self.list_edges(shape),
            TopoKind::Vertex => self.list_vertices(shape),
            TopoKind::Solid => self.list_solids(shape),
            _ => Vec::new(),
        };
        ids.into_iter()
            .map(|id| {
                let sig = self.compute_signature(id, kind);
                (id, sig)
            })
            .collect()
    }
}
