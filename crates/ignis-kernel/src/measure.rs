//! Measurement of truck solids via tessellation.
//!
//! Selector predicates need face centroids, areas and normals; the alignment
//! engine needs exact-enough bounding boxes for curved solids, which vertex
//! extents alone cannot provide (a sphere built by rotational sweep has all
//! of its topological vertices on one great circle). Both are derived from a
//! coarse triangulation via truck-meshalgo, computed once per shape and
//! cached by the kernel.

use std::collections::{HashMap, HashSet};

use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::MeshableShape;
use truck_modeling::geometry::Surface;
use truck_modeling::topology::Solid;

/// Per-face measurement data.
#[derive(Debug, Clone)]
pub struct FaceMeasure {
    pub surface_type: String,
    pub area: f64,
    pub centroid: [f64; 3],
    pub normal: [f64; 3],
    pub bbox: [f64; 6],
    /// Indices into the body's deduplicated edge list.
    pub edge_indices: Vec<usize>,
}

/// Per-edge measurement data. Centroid and length are taken from the edge
/// endpoints; for closed curves this degenerates to the seam point, which is
/// acceptable for ordering predicates.
#[derive(Debug, Clone)]
pub struct EdgeMeasure {
    pub centroid: [f64; 3],
    pub length: f64,
}

/// Full measurement of one body.
#[derive(Debug, Clone)]
pub struct BodyMeasure {
    pub faces: Vec<FaceMeasure>,
    pub edges: Vec<EdgeMeasure>,
    pub vertices: Vec<[f64; 3]>,
    pub bbox: [f64; 6],
}

/// Measure a single truck solid at the given tessellation tolerance.
pub fn measure_body(solid: &Solid, tolerance: f64) -> BodyMeasure {
    let meshed = solid.triangulation(tolerance);

    let mut bbox_min = [f64::INFINITY; 3];
    let mut bbox_max = [f64::NEG_INFINITY; 3];

    // Deduplicated edge list with stable indices, plus endpoint data.
    let mut edge_index: HashMap<_, usize> = HashMap::new();
    let mut edges: Vec<EdgeMeasure> = Vec::new();
    for shell in solid.boundaries().iter() {
        for edge in shell.edge_iter() {
            let eid = edge.id();
            if edge_index.contains_key(&eid) {
                continue;
            }
            let front = edge.front().point();
            let back = edge.back().point();
            let centroid = [
                (front[0] + back[0]) / 2.0,
                (front[1] + back[1]) / 2.0,
                (front[2] + back[2]) / 2.0,
            ];
            let dx = back[0] - front[0];
            let dy = back[1] - front[1];
            let dz = back[2] - front[2];
            edge_index.insert(eid, edges.len());
            edges.push(EdgeMeasure {
                centroid,
                length: (dx * dx + dy * dy + dz * dz).sqrt(),
            });
        }
    }

    // Deduplicated vertices.
    let mut seen_verts = HashSet::new();
    let mut vertices: Vec<[f64; 3]> = Vec::new();
    for shell in solid.boundaries().iter() {
        for v in shell.vertex_iter() {
            if seen_verts.insert(v.id()) {
                let p = v.point();
                let p = [p[0], p[1], p[2]];
                expand(&mut bbox_min, &mut bbox_max, p);
                vertices.push(p);
            }
        }
    }

    // Faces: walk the original and meshed shells in lockstep. Triangulation
    // preserves shell and face order, so index i in both iterators is the
    // same face.
    let mut faces: Vec<FaceMeasure> = Vec::new();
    for (shell, meshed_shell) in solid.boundaries().iter().zip(meshed.boundaries().iter()) {
        for (face, meshed_face) in shell.face_iter().zip(meshed_shell.face_iter()) {
            let surface_type = classify_surface(&face.oriented_surface());

            let mut edge_indices = Vec::new();
            for wire in face.boundaries() {
                for edge in wire.edge_iter() {
                    if let Some(&i) = edge_index.get(&edge.id()) {
                        if !edge_indices.contains(&i) {
                            edge_indices.push(i);
                        }
                    }
                }
            }

            let mesh: Option<PolygonMesh> = meshed_face.surface();
            let Some(mesh) = mesh else {
                faces.push(FaceMeasure {
                    surface_type,
                    area: 0.0,
                    centroid: [0.0; 3],
                    normal: [0.0, 0.0, 1.0],
                    bbox: [0.0; 6],
                    edge_indices,
                });
                continue;
            };

            let mut measure = measure_mesh(&mesh);
            if !face.orientation() {
                for c in &mut measure.normal {
                    *c = -*c;
                }
            }
            expand(&mut bbox_min, &mut bbox_max, [
                measure.bbox[0],
                measure.bbox[1],
                measure.bbox[2],
            ]);
            expand(&mut bbox_min, &mut bbox_max, [
                measure.bbox[3],
                measure.bbox[4],
                measure.bbox[5],
            ]);
            measure.surface_type = surface_type;
            measure.edge_indices = edge_indices;
            faces.push(measure);
        }
    }

    if bbox_min[0] > bbox_max[0] {
        bbox_min = [0.0; 3];
        bbox_max = [0.0; 3];
    }

    BodyMeasure {
        faces,
        edges,
        vertices,
        bbox: [
            bbox_min[0], bbox_min[1], bbox_min[2], bbox_max[0], bbox_max[1], bbox_max[2],
        ],
    }
}

/// Area, area-weighted centroid, averaged normal and extents of one face mesh.
fn measure_mesh(mesh: &PolygonMesh) -> FaceMeasure {
    let positions = mesh.positions();
    let tri_faces = mesh.tri_faces();

    let mut area = 0.0;
    let mut centroid = [0.0; 3];
    let mut normal = [0.0; 3];
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];

    for p in positions {
        expand(&mut min, &mut max, [p[0], p[1], p[2]]);
    }

    for tri in tri_faces {
        let a = positions[tri[0].pos];
        let b = positions[tri[1].pos];
        let c = positions[tri[2].pos];

        let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let cross = [
            ab[1] * ac[2] - ab[2] * ac[1],
            ab[2] * ac[0] - ab[0] * ac[2],
            ab[0] * ac[1] - ab[1] * ac[0],
        ];
        let tri_area =
            0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();

        area += tri_area;
        for i in 0..3 {
            centroid[i] += tri_area * (a[i] + b[i] + c[i]) / 3.0;
            normal[i] += cross[i];
        }
    }

    if area > 0.0 {
        for c in &mut centroid {
            *c /= area;
        }
    }
    let norm_len =
        (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
    if norm_len > 1e-12 {
        for c in &mut normal {
            *c /= norm_len;
        }
    } else {
        normal = [0.0, 0.0, 1.0];
    }

    if min[0] > max[0] {
        min = [0.0; 3];
        max = [0.0; 3];
    }

    FaceMeasure {
        surface_type: String::new(),
        area,
        centroid,
        normal,
        bbox: [min[0], min[1], min[2], max[0], max[1], max[2]],
        edge_indices: Vec::new(),
    }
}

fn classify_surface(surface: &Surface) -> String {
    match surface {
        Surface::Plane(_) => "planar".to_string(),
        Surface::RevolutedCurve(_) => "revolved".to_string(),
        Surface::BSplineSurface(_) => "nurbs".to_string(),
        Surface::NurbsSurface(_) => "nurbs".to_string(),
    }
}

fn expand(min: &mut [f64; 3], max: &mut [f64; 3], p: [f64; 3]) {
    for i in 0..3 {
        min[i] = min[i].min(p[i]);
        max[i] = max[i].max(p[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;
    use approx::assert_relative_eq;

    #[test]
    fn measured_box_faces_and_areas() {
        let solid = primitives::centered_box(10.0, 10.0, 10.0);
        let m = measure_body(&solid, 0.01);

        assert_eq!(m.faces.len(), 6);
        for face in &m.faces {
            assert_relative_eq!(face.area, 100.0, max_relative = 1e-6);
            assert_eq!(face.surface_type, "planar");
            assert_eq!(face.edge_indices.len(), 4);
        }

        let top_z = m
            .faces
            .iter()
            .map(|f| f.centroid[2])
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(top_z, 5.0, max_relative = 1e-6);
    }

    #[test]
    fn measured_box_bbox_is_centered() {
        let solid = primitives::centered_box(4.0, 6.0, 8.0);
        let m = measure_body(&solid, 0.01);
        assert_relative_eq!(m.bbox[0], -2.0, max_relative = 1e-9);
        assert_relative_eq!(m.bbox[4], 3.0, max_relative = 1e-9);
        assert_relative_eq!(m.bbox[5], 4.0, max_relative = 1e-9);
    }

    #[test]
    fn measured_sphere_bbox_covers_all_axes() {
        let solid = primitives::centered_sphere(2.0).unwrap();
        let m = measure_body(&solid, 0.005);
        // Topological vertices alone would collapse the Y extent to zero;
        // the tessellated extents must not.
        for i in 0..3 {
            assert!(m.bbox[i] < -1.9, "min axis {i} = {}", m.bbox[i]);
            assert!(m.bbox[i + 3] > 1.9, "max axis {i} = {}", m.bbox[i + 3]);
        }
    }
}
