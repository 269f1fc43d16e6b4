//! MockKernel — deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Produces synthetic topology with analytically exact signatures for the
//! primitives (face areas, centroids, normals, bounding boxes), so selector
//! and alignment logic can be tested without real geometry. Operations the
//! truck backend rejects (fillet, chamfer, shell, offset) are modeled here
//! with plausible topology changes: a fillet consumes its edges and adds one
//! cylindrical face per edge, an offset grows or shrinks the bounding box.
//!
//! Boolean results are approximations: union concatenates the operands'
//! topology, subtraction keeps the target unchanged, intersection yields the
//! axis-aligned overlap box.

use std::collections::{HashMap, HashSet};

use ignis_types::{Axis, TopoKind, TopoSignature, TOLERANCE};

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::{
    KernelError, KernelId, ShapeHandle, BODY_BASE, EDGE_BASE, ID_STRIDE, VERTEX_BASE,
};

use std::f64::consts::PI;

#[derive(Debug, Clone)]
struct MockVertex {
    position: [f64; 3],
}

#[derive(Debug, Clone)]
struct MockEdge {
    /// Endpoint indices into the body's vertex list. Closed curves use the
    /// same index twice.
    start: usize,
    end: usize,
    centroid: [f64; 3],
    length: f64,
}

#[derive(Debug, Clone)]
struct MockFace {
    /// Indices into the body's edge list.
    edges: Vec<usize>,
    normal: [f64; 3],
    centroid: [f64; 3],
    area: f64,
    bbox: [f64; 6],
    surface_type: String,
}

/// One body of synthetic topology with analytic signatures.
#[derive(Debug, Clone)]
struct MockBody {
    vertices: Vec<MockVertex>,
    edges: Vec<MockEdge>,
    faces: Vec<MockFace>,
    bbox: [f64; 6],
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_handle: u64,
    shapes: HashMap<u64, Vec<MockBody>>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            shapes: HashMap::new(),
        }
    }

    fn store(&mut self, bodies: Vec<MockBody>) -> ShapeHandle {
        let handle = ShapeHandle(self.next_handle);
        self.next_handle += 1;
        self.shapes.insert(handle.id(), bodies);
        handle
    }

    fn bodies(&self, handle: &ShapeHandle) -> Result<&Vec<MockBody>, KernelError> {
        self.shapes
            .get(&handle.id())
            .ok_or(KernelError::ShapeNotFound)
    }

    /// Resolve a face ID to its body and local face index.
    fn find_face(&self, face: KernelId) -> Option<(&MockBody, usize)> {
        let handle_id = face.0 / ID_STRIDE;
        let mut idx = (face.0 % ID_STRIDE) as usize;
        for body in self.shapes.get(&handle_id)? {
            if idx < body.faces.len() {
                return Some((body, idx));
            }
            idx -= body.faces.len();
        }
        None
    }

    /// Resolve a flattened edge ID to (body index, local edge index) within
    /// the given shape.
    fn locate_edge(bodies: &[MockBody], offset: u64) -> Option<(usize, usize)> {
        let mut idx = offset.checked_sub(EDGE_BASE)? as usize;
        for (bi, body) in bodies.iter().enumerate() {
            if idx < body.edges.len() {
                return Some((bi, idx));
            }
            idx -= body.edges.len();
        }
        None
    }

    fn shape_bbox(bodies: &[MockBody]) -> [f64; 6] {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for body in bodies {
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
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

// --- analytic body constructors -------------------------------------------

/// Exact box topology between two corners: 8 vertices, 12 edges, 6 faces.
fn box_body(min: [f64; 3], max: [f64; 3]) -> MockBody {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    let positions = [
        [x0, y0, z0],
        [x1, y0, z0],
        [x1, y1, z0],
        [x0, y1, z0],
        [x0, y0, z1],
        [x1, y0, z1],
        [x1, y1, z1],
        [x0, y1, z1],
    ];
    let vertices: Vec<MockVertex> = positions
        .iter()
        .map(|&position| MockVertex { position })
        .collect();

    // 4 bottom, 4 top, 4 vertical.
    let edge_pairs = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];
    let edges: Vec<MockEdge> = edge_pairs
        .iter()
        .map(|&(s, e)| edge_between(&positions[s], &positions[e], s, e))
        .collect();

    let cx = (x0 + x1) / 2.0;
    let cy = (y0 + y1) / 2.0;
    let cz = (z0 + z1) / 2.0;
    let dx = x1 - x0;
    let dy = y1 - y0;
    let dz = z1 - z0;

    let faces = vec![
        // bottom / top
        MockFace {
            edges: vec![0, 1, 2, 3],
            normal: [0.0, 0.0, -1.0],
            centroid: [cx, cy, z0],
            area: dx * dy,
            bbox: [x0, y0, z0, x1, y1, z0],
            surface_type: "planar".to_string(),
        },
        MockFace {
            edges: vec![4, 5, 6, 7],
            normal: [0.0, 0.0, 1.0],
            centroid: [cx, cy, z1],
            area: dx * dy,
            bbox: [x0, y0, z1, x1, y1, z1],
            surface_type: "planar".to_string(),
        },
        // front (y min) / back (y max)
        MockFace {
            edges: vec![0, 9, 4, 8],
            normal: [0.0, -1.0, 0.0],
            centroid: [cx, y0, cz],
            area: dx * dz,
            bbox: [x0, y0, z0, x1, y0, z1],
            surface_type: "planar".to_string(),
        },
        MockFace {
            edges: vec![2, 11, 6, 10],
            normal: [0.0, 1.0, 0.0],
            centroid: [cx, y1, cz],
            area: dx * dz,
            bbox: [x0, y1, z0, x1, y1, z1],
            surface_type: "planar".to_string(),
        },
        // left (x min) / right (x max)
        MockFace {
            edges: vec![3, 8, 7, 11],
            normal: [-1.0, 0.0, 0.0],
            centroid: [x0, cy, cz],
            area: dy * dz,
            bbox: [x0, y0, z0, x0, y1, z1],
            surface_type: "planar".to_string(),
        },
        MockFace {
            edges: vec![1, 10, 5, 9],
            normal: [1.0, 0.0, 0.0],
            centroid: [x1, cy, cz],
            area: dy * dz,
            bbox: [x1, y0, z0, x1, y1, z1],
            surface_type: "planar".to_string(),
        },
    ];

    MockBody {
        vertices,
        edges,
        faces,
        bbox: [x0, y0, z0, x1, y1, z1],
    }
}

fn edge_between(a: &[f64; 3], b: &[f64; 3], start: usize, end: usize) -> MockEdge {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    MockEdge {
        start,
        end,
        centroid: [
            (a[0] + b[0]) / 2.0,
            (a[1] + b[1]) / 2.0,
            (a[2] + b[2]) / 2.0,
        ],
        length: (dx * dx + dy * dy + dz * dz).sqrt(),
    }
}

/// Cylinder along Z: two rim circle edges, two planar caps and one lateral
/// face. Curved faces carry a zero normal so axis filters never match them.
fn cylinder_body(radius: f64, height: f64) -> MockBody {
    let hz = height / 2.0;
    let mut vertices = Vec::new();
    for &z in &[-hz, hz] {
        for &(x, y) in &[(radius, 0.0), (0.0, radius), (-radius, 0.0), (0.0, -radius)] {
            vertices.push(MockVertex {
                position: [x, y, z],
            });
        }
    }
    let edges = vec![
        MockEdge {
            start: 0,
            end: 0,
            centroid: [0.0, 0.0, -hz],
            length: 2.0 * PI * radius,
        },
        MockEdge {
            start: 4,
            end: 4,
            centroid: [0.0, 0.0, hz],
            length: 2.0 * PI * radius,
        },
    ];
    let cap_area = PI * radius * radius;
    let faces = vec![
        MockFace {
            edges: vec![0],
            normal: [0.0, 0.0, -1.0],
            centroid: [0.0, 0.0, -hz],
            area: cap_area,
            bbox: [-radius, -radius, -hz, radius, radius, -hz],
            surface_type: "planar".to_string(),
        },
        MockFace {
            edges: vec![1],
            normal: [0.0, 0.0, 1.0],
            centroid: [0.0, 0.0, hz],
            area: cap_area,
            bbox: [-radius, -radius, hz, radius, radius, hz],
            surface_type: "planar".to_string(),
        },
        MockFace {
            edges: vec![0, 1],
            normal: [0.0, 0.0, 0.0],
            centroid: [0.0, 0.0, 0.0],
            area: 2.0 * PI * radius * height,
            bbox: [-radius, -radius, -hz, radius, radius, hz],
            surface_type: "cylindrical".to_string(),
        },
    ];
    MockBody {
        vertices,
        edges,
        faces,
        bbox: [-radius, -radius, -hz, radius, radius, hz],
    }
}

fn sphere_body(radius: f64) -> MockBody {
    let r = radius;
    let vertices = [
        [r, 0.0, 0.0],
        [-r, 0.0, 0.0],
        [0.0, r, 0.0],
        [0.0, -r, 0.0],
        [0.0, 0.0, r],
        [0.0, 0.0, -r],
    ]
    .iter()
    .map(|&position| MockVertex { position })
    .collect();
    let faces = vec![MockFace {
        edges: Vec::new(),
        normal: [0.0, 0.0, 0.0],
        centroid: [0.0, 0.0, 0.0],
        area: 4.0 * PI * r * r,
        bbox: [-r, -r, -r, r, r, r],
        surface_type: "spherical".to_string(),
    }];
    MockBody {
        vertices,
        edges: Vec::new(),
        faces,
        bbox: [-r, -r, -r, r, r, r],
    }
}

fn torus_body(major: f64, minor: f64) -> MockBody {
    let outer = major + minor;
    let vertices = [
        [outer, 0.0, 0.0],
        [-outer, 0.0, 0.0],
        [0.0, outer, 0.0],
        [0.0, -outer, 0.0],
    ]
    .iter()
    .map(|&position| MockVertex { position })
    .collect();
    let bbox = [-outer, -outer, -minor, outer, outer, minor];
    let faces = vec![MockFace {
        edges: Vec::new(),
        normal: [0.0, 0.0, 0.0],
        centroid: [0.0, 0.0, 0.0],
        area: 4.0 * PI * PI * major * minor,
        bbox,
        surface_type: "toroidal".to_string(),
    }];
    MockBody {
        vertices,
        edges: Vec::new(),
        faces,
        bbox,
    }
}

fn cone_body(bottom_radius: f64, top_radius: f64, height: f64) -> MockBody {
    let hz = height / 2.0;
    let truncated = top_radius > TOLERANCE;

    let mut vertices: Vec<MockVertex> = [
        (bottom_radius, 0.0),
        (0.0, bottom_radius),
        (-bottom_radius, 0.0),
        (0.0, -bottom_radius),
    ]
    .iter()
    .map(|&(x, y)| MockVertex {
        position: [x, y, -hz],
    })
    .collect();

    let mut edges = vec![MockEdge {
        start: 0,
        end: 0,
        centroid: [0.0, 0.0, -hz],
        length: 2.0 * PI * bottom_radius,
    }];

    let slant = (height * height + (bottom_radius - top_radius).powi(2)).sqrt();
    let mut faces = vec![
        MockFace {
            edges: vec![0],
            normal: [0.0, 0.0, -1.0],
            centroid: [0.0, 0.0, -hz],
            area: PI * bottom_radius * bottom_radius,
            bbox: [-bottom_radius, -bottom_radius, -hz, bottom_radius, bottom_radius, -hz],
            surface_type: "planar".to_string(),
        },
        MockFace {
            edges: vec![0],
            normal: [0.0, 0.0, 0.0],
            centroid: [0.0, 0.0, 0.0],
            area: PI * (bottom_radius + top_radius) * slant,
            bbox: [-bottom_radius, -bottom_radius, -hz, bottom_radius, bottom_radius, hz],
            surface_type: "conical".to_string(),
        },
    ];

    if truncated {
        let base = vertices.len();
        for &(x, y) in &[
            (top_radius, 0.0),
            (0.0, top_radius),
            (-top_radius, 0.0),
            (0.0, -top_radius),
        ] {
            vertices.push(MockVertex {
                position: [x, y, hz],
            });
        }
        edges.push(MockEdge {
            start: base,
            end: base,
            centroid: [0.0, 0.0, hz],
            length: 2.0 * PI * top_radius,
        });
        faces[1].edges.push(1);
        faces.push(MockFace {
            edges: vec![1],
            normal: [0.0, 0.0, 1.0],
            centroid: [0.0, 0.0, hz],
            area: PI * top_radius * top_radius,
            bbox: [-top_radius, -top_radius, hz, top_radius, top_radius, hz],
            surface_type: "planar".to_string(),
        });
    } else {
        vertices.push(MockVertex {
            position: [0.0, 0.0, hz],
        });
    }

    MockBody {
        vertices,
        edges,
        faces,
        bbox: [-bottom_radius, -bottom_radius, -hz, bottom_radius, bottom_radius, hz],
    }
}

/// Wedge as an adjusted box: the four top vertices move to the tapered span
/// and the top face signature follows. Lateral face areas keep the box values
/// as an approximation.
#[allow(clippy::too_many_arguments)]
fn wedge_body(
    xsize: f64,
    ysize: f64,
    zsize: f64,
    xmax: f64,
    xmin: f64,
    ymax: f64,
    ymin: f64,
) -> MockBody {
    let hx = xsize / 2.0;
    let hy = ysize / 2.0;
    let hz = zsize / 2.0;
    let mut body = box_body([-hx, -hy, -hz], [hx, hy, hz]);

    // Top corners in recentered coordinates.
    let tx0 = xmin - hx;
    let tx1 = xmax - hx;
    let ty0 = ymin - hy;
    let ty1 = ymax - hy;
    body.vertices[4].position = [tx0, ty0, hz];
    body.vertices[5].position = [tx1, ty0, hz];
    body.vertices[6].position = [tx1, ty1, hz];
    body.vertices[7].position = [tx0, ty1, hz];

    body.faces[1] = MockFace {
        edges: body.faces[1].edges.clone(),
        normal: [0.0, 0.0, 1.0],
        centroid: [(tx0 + tx1) / 2.0, (ty0 + ty1) / 2.0, hz],
        area: (tx1 - tx0) * (ty1 - ty0),
        bbox: [tx0, ty0, hz, tx1, ty1, hz],
        surface_type: "planar".to_string(),
    };
    refresh_edges(&mut body);
    body
}

fn polygon_body(points: &[[f64; 2]], height: f64) -> MockBody {
    let n = points.len();
    let hz = height / 2.0;

    // Shoelace: signed area and 2D centroid.
    let mut signed = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        let w = x0 * y1 - x1 * y0;
        signed += w;
        cx += (x0 + x1) * w;
        cy += (y0 + y1) * w;
    }
    signed /= 2.0;
    let area = signed.abs();
    if area > TOLERANCE {
        cx /= 6.0 * signed;
        cy /= 6.0 * signed;
    }

    let mut vertices = Vec::with_capacity(2 * n);
    for &z in &[-hz, hz] {
        for p in points {
            vertices.push(MockVertex {
                position: [p[0], p[1], z],
            });
        }
    }

    let mut min2 = [f64::INFINITY; 2];
    let mut max2 = [f64::NEG_INFINITY; 2];
    for p in points {
        min2[0] = min2[0].min(p[0]);
        min2[1] = min2[1].min(p[1]);
        max2[0] = max2[0].max(p[0]);
        max2[1] = max2[1].max(p[1]);
    }

    // Bottom ring, top ring, then verticals.
    let mut edges = Vec::with_capacity(3 * n);
    for ring in 0..2 {
        for i in 0..n {
            let a = ring * n + i;
            let b = ring * n + (i + 1) % n;
            edges.push(edge_between(
                &vertices[a].position,
                &vertices[b].position,
                a,
                b,
            ));
        }
    }
    for i in 0..n {
        edges.push(edge_between(
            &vertices[i].position,
            &vertices[n + i].position,
            i,
            n + i,
        ));
    }

    let mut faces = vec![
        MockFace {
            edges: (0..n).collect(),
            normal: [0.0, 0.0, -1.0],
            centroid: [cx, cy, -hz],
            area,
            bbox: [min2[0], min2[1], -hz, max2[0], max2[1], -hz],
            surface_type: "planar".to_string(),
        },
        MockFace {
            edges: (n..2 * n).collect(),
            normal: [0.0, 0.0, 1.0],
            centroid: [cx, cy, hz],
            area,
            bbox: [min2[0], min2[1], hz, max2[0], max2[1], hz],
            surface_type: "planar".to_string(),
        },
    ];

    // One lateral face per polygon side, outward normal from the edge
    // direction and winding sign.
    let winding = if signed >= 0.0 { 1.0 } else { -1.0 };
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len = (dx * dx + dy * dy).sqrt();
        let normal = if len > TOLERANCE {
            [winding * dy / len, -winding * dx / len, 0.0]
        } else {
            [0.0, 0.0, 0.0]
        };
        faces.push(MockFace {
            edges: vec![i, n + i, 2 * n + i, 2 * n + (i + 1) % n],
            normal,
            centroid: [(x0 + x1) / 2.0, (y0 + y1) / 2.0, 0.0],
            area: len * height,
            bbox: [
                x0.min(x1),
                y0.min(y1),
                -hz,
                x0.max(x1),
                y0.max(y1),
                hz,
            ],
            surface_type: "planar".to_string(),
        });
    }

    MockBody {
        vertices,
        edges,
        faces,
        bbox: [min2[0], min2[1], -hz, max2[0], max2[1], hz],
    }
}

/// Recompute edge centroids and lengths from current vertex positions.
fn refresh_edges(body: &mut MockBody) {
    let positions: Vec<[f64; 3]> = body.vertices.iter().map(|v| v.position).collect();
    for edge in &mut body.edges {
        *edge = edge_between(&positions[edge.start], &positions[edge.end], edge.start, edge.end);
    }
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for p in &positions {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    body.bbox = [min[0], min[1], min[2], max[0], max[1], max[2]];
}

// --- rigid transforms ------------------------------------------------------

fn translate_point(p: [f64; 3], d: [f64; 3]) -> [f64; 3] {
    [p[0] + d[0], p[1] + d[1], p[2] + d[2]]
}

fn rotate_point(p: [f64; 3], axis: Axis, radians: f64) -> [f64; 3] {
    let (s, c) = radians.sin_cos();
    match axis {
        Axis::X => [p[0], p[1] * c - p[2] * s, p[1] * s + p[2] * c],
        Axis::Y => [p[0] * c + p[2] * s, p[1], -p[0] * s + p[2] * c],
        Axis::Z => [p[0] * c - p[1] * s, p[0] * s + p[1] * c, p[2]],
    }
}

fn transform_bbox(bbox: [f64; 6], f: &dyn Fn([f64; 3]) -> [f64; 3]) -> [f64; 6] {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for xi in 0..2 {
        for yi in 0..2 {
            for zi in 0..2 {
                let corner = f([bbox[xi * 3], bbox[1 + yi * 3], bbox[2 + zi * 3]]);
                for i in 0..3 {
                    min[i] = min[i].min(corner[i]);
                    max[i] = max[i].max(corner[i]);
                }
            }
        }
    }
    [min[0], min[1], min[2], max[0], max[1], max[2]]
}

fn transform_body(body: &MockBody, f: &dyn Fn([f64; 3]) -> [f64; 3]) -> MockBody {
    MockBody {
        vertices: body
            .vertices
            .iter()
            .map(|v| MockVertex {
                position: f(v.position),
            })
            .collect(),
        edges: body
            .edges
            .iter()
            .map(|e| MockEdge {
                start: e.start,
                end: e.end,
                centroid: f(e.centroid),
                length: e.length,
            })
            .collect(),
        faces: body
            .faces
            .iter()
            .map(|face| {
                // Rigid transforms preserve area; normals rotate with the
                // origin-anchored direction map.
                let origin = f([0.0, 0.0, 0.0]);
                let tip = f(face.normal);
                MockFace {
                    edges: face.edges.clone(),
                    normal: [tip[0] - origin[0], tip[1] - origin[1], tip[2] - origin[2]],
                    centroid: f(face.centroid),
                    area: face.area,
                    bbox: transform_bbox(face.bbox, f),
                    surface_type: face.surface_type.clone(),
                }
            })
            .collect(),
        bbox: transform_bbox(body.bbox, f),
    }
}

fn merge_into_one(bodies: &[MockBody]) -> MockBody {
    let mut vertices = Vec::new();
    let mut edges = Vec::new();
    let mut faces = Vec::new();
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for body in bodies {
        let vbase = vertices.len();
        let ebase = edges.len();
        vertices.extend(body.vertices.iter().cloned());
        edges.extend(body.edges.iter().map(|e| MockEdge {
            start: e.start + vbase,
            end: e.end + vbase,
            centroid: e.centroid,
            length: e.length,
        }));
        faces.extend(body.faces.iter().map(|face| MockFace {
            edges: face.edges.iter().map(|&i| i + ebase).collect(),
            ..face.clone()
        }));
        for i in 0..3 {
            min[i] = min[i].min(body.bbox[i]);
            max[i] = max[i].max(body.bbox[i + 3]);
        }
    }
    MockBody {
        vertices,
        edges,
        faces,
        bbox: [min[0], min[1], min[2], max[0], max[1], max[2]],
    }
}

fn bbox_overlap(a: [f64; 6], b: [f64; 6]) -> Option<([f64; 3], [f64; 3])> {
    let mut min = [0.0; 3];
    let mut max = [0.0; 3];
    for i in 0..3 {
        min[i] = a[i].max(b[i]);
        max[i] = a[i + 3].min(b[i + 3]);
        if max[i] - min[i] <= TOLERANCE {
            return None;
        }
    }
    Some((min, max))
}

fn bbox_distance(a: [f64; 6], b: [f64; 6]) -> f64 {
    let mut sum = 0.0;
    for i in 0..3 {
        let gap = (a[i] - b[i + 3]).max(b[i] - a[i + 3]).max(0.0);
        sum += gap * gap;
    }
    sum.sqrt()
}

impl Kernel for MockKernel {
    fn make_box(&mut self, x: f64, y: f64, z: f64) -> Result<ShapeHandle, KernelError> {
        let body = box_body([-x / 2.0, -y / 2.0, -z / 2.0], [x / 2.0, y / 2.0, z / 2.0]);
        Ok(self.store(vec![body]))
    }

    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<ShapeHandle, KernelError> {
        Ok(self.store(vec![cylinder_body(radius, height)]))
    }

    fn make_sphere(&mut self, radius: f64) -> Result<ShapeHandle, KernelError> {
        Ok(self.store(vec![sphere_body(radius)]))
    }

    fn make_torus(&mut self, major: f64, minor: f64) -> Result<ShapeHandle, KernelError> {
        Ok(self.store(vec![torus_body(major, minor)]))
    }

    fn make_cone(
        &mut self,
        bottom_radius: f64,
        top_radius: f64,
        height: f64,
    ) -> Result<ShapeHandle, KernelError> {
        Ok(self.store(vec![cone_body(bottom_radius, top_radius, height)]))
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
        Ok(self.store(vec![wedge_body(xsize, ysize, zsize, xmax, xmin, ymax, ymin)]))
    }

    fn extrude_polygon(
        &mut self,
        points: &[[f64; 2]],
        height: f64,
    ) -> Result<ShapeHandle, KernelError> {
        if points.len() < 3 {
            return Err(KernelError::Other {
                message: "polygon needs at least 3 points".to_string(),
            });
        }
        Ok(self.store(vec![polygon_body(points, height)]))
    }

    fn boolean_union(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError> {
        let bbox_a = Self::shape_bbox(self.bodies(a)?);
        let bbox_b = Self::shape_bbox(self.bodies(b)?);
        let mut all = self.bodies(a)?.clone();
        all.extend(self.bodies(b)?.clone());
        // Overlapping operands fuse into one body; disjoint or merely
        // touching operands stay a compound (coalescing rule). All faces of
        // both operands survive either way.
        if bbox_overlap(bbox_a, bbox_b).is_some() {
            Ok(self.store(vec![merge_into_one(&all)]))
        } else {
            Ok(self.store(all))
        }
    }

    fn boolean_subtract(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError> {
        let bodies = self.bodies(a)?.clone();
        self.bodies(b)?;
        // Approximation: the target's topology is kept unchanged.
        Ok(self.store(bodies))
    }

    fn boolean_intersect(
        &mut self,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError> {
        let bbox_a = Self::shape_bbox(self.bodies(a)?);
        let bbox_b = Self::shape_bbox(self.bodies(b)?);
        let (min, max) = bbox_overlap(bbox_a, bbox_b).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "intersection is empty".to_string(),
            }
        })?;
        Ok(self.store(vec![box_body(min, max)]))
    }

    fn translate(
        &mut self,
        shape: &ShapeHandle,
        delta: [f64; 3],
    ) -> Result<ShapeHandle, KernelError> {
        let moved: Vec<MockBody> = self
            .bodies(shape)?
            .iter()
            .map(|b| transform_body(b, &|p| translate_point(p, delta)))
            .collect();
        Ok(self.store(moved))
    }

    fn rotate(
        &mut self,
        shape: &ShapeHandle,
        axis: Axis,
        degrees: f64,
    ) -> Result<ShapeHandle, KernelError> {
        let radians = degrees.to_radians();
        let rotated: Vec<MockBody> = self
            .bodies(shape)?
            .iter()
            .map(|b| transform_body(b, &|p| rotate_point(p, axis, radians)))
            .collect();
        Ok(self.store(rotated))
    }

    fn fillet_edges(
        &mut self,
        solid: &ShapeHandle,
        edges: &[KernelId],
        radius: f64,
    ) -> Result<ShapeHandle, KernelError> {
        if radius <= 0.0 {
            return Err(KernelError::FilletFailed {
                reason: "radius must be positive".to_string(),
            });
        }
        self.rework_edges(solid, edges, radius, "cylindrical", |length, r| {
            length * r * std::f64::consts::FRAC_PI_2
        })
        .map_err(|e| match e {
            KernelError::EntityNotFound { id } => KernelError::FilletFailed {
                reason: format!("edge {id:?} not found in solid"),
            },
            other => other,
        })
    }

    fn chamfer_edges(
        &mut self,
        solid: &ShapeHandle,
        edges: &[KernelId],
        distance: f64,
    ) -> Result<ShapeHandle, KernelError> {
        if distance <= 0.0 {
            return Err(KernelError::ChamferFailed {
                reason: "distance must be positive".to_string(),
            });
        }
        self.rework_edges(solid, edges, distance, "planar", |length, d| {
            length * d * std::f64::consts::SQRT_2
        })
        .map_err(|e| match e {
            KernelError::EntityNotFound { id } => KernelError::ChamferFailed {
                reason: format!("edge {id:?} not found in solid"),
            },
            other => other,
        })
    }

    fn shell_solid(
        &mut self,
        solid: &ShapeHandle,
        thickness: f64,
    ) -> Result<ShapeHandle, KernelError> {
        if thickness <= 0.0 {
            return Err(KernelError::ShellFailed {
                reason: "thickness must be positive".to_string(),
            });
        }
        let bodies = self.bodies(solid)?.clone();
        let mut out = Vec::with_capacity(bodies.len());
        for body in &bodies {
            let bbox = body.bbox;
            for i in 0..3 {
                if bbox[i + 3] - bbox[i] <= 2.0 * thickness + TOLERANCE {
                    return Err(KernelError::ShellFailed {
                        reason: format!("thickness {thickness} leaves no interior"),
                    });
                }
            }
            // Hollowing keeps the outer topology and adds the cavity walls:
            // an inner box shrunk by the wall thickness, normals flipped
            // inward, indices rebased onto the outer body.
            let inner = box_body(
                [
                    bbox[0] + thickness,
                    bbox[1] + thickness,
                    bbox[2] + thickness,
                ],
                [
                    bbox[3] - thickness,
                    bbox[4] - thickness,
                    bbox[5] - thickness,
                ],
            );
            let mut hollowed = body.clone();
            let v_off = hollowed.vertices.len();
            let e_off = hollowed.edges.len();
            hollowed.vertices.extend(inner.vertices);
            hollowed.edges.extend(inner.edges.into_iter().map(|mut e| {
                e.start += v_off;
                e.end += v_off;
                e
            }));
            hollowed.faces.extend(inner.faces.into_iter().map(|mut f| {
                for idx in f.edges.iter_mut() {
                    *idx += e_off;
                }
                f.normal = [-f.normal[0], -f.normal[1], -f.normal[2]];
                f
            }));
            out.push(hollowed);
        }
        Ok(self.store(out))
    }

    fn offset_shape(
        &mut self,
        shape: &ShapeHandle,
        distance: f64,
    ) -> Result<ShapeHandle, KernelError> {
        let bodies = self.bodies(shape)?;
        if bodies.len() != 1 {
            // Compounds go through the caller's per-face fallback.
            return Err(KernelError::NotSupported {
                operation: "offset_shape on compound".to_string(),
            });
        }
        let bbox = bodies[0].bbox;
        for i in 0..3 {
            if bbox[i + 3] - bbox[i] + 2.0 * distance <= TOLERANCE {
                return Err(KernelError::OffsetFailed {
                    reason: format!("offset {distance} collapses the shape"),
                });
            }
        }
        let body = box_body(
            [bbox[0] - distance, bbox[1] - distance, bbox[2] - distance],
            [bbox[3] + distance, bbox[4] + distance, bbox[5] + distance],
        );
        Ok(self.store(vec![body]))
    }

    fn offset_face(&mut self, face: KernelId, distance: f64) -> Result<ShapeHandle, KernelError> {
        let (bbox, normal) = {
            let (body, idx) = self
                .find_face(face)
                .ok_or(KernelError::EntityNotFound { id: face })?;
            (body.faces[idx].bbox, body.faces[idx].normal)
        };

        // Normal axis: largest normal component, or the degenerate bbox axis
        // for curved faces.
        let normal_axis = dominant_axis(normal, bbox);
        let thickness = distance.abs().max(TOLERANCE * 10.0);
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for i in 0..3 {
            if i == normal_axis {
                min[i] = bbox[i] - thickness / 2.0;
                max[i] = bbox[i + 3] + thickness / 2.0;
            } else {
                min[i] = bbox[i] - distance;
                max[i] = bbox[i + 3] + distance;
                if max[i] - min[i] <= TOLERANCE {
                    return Err(KernelError::OffsetFailed {
                        reason: format!("offset {distance} collapses the face"),
                    });
                }
            }
        }
        Ok(self.store(vec![box_body(min, max)]))
    }

    fn coalesce(&mut self, parts: &[ShapeHandle]) -> Result<ShapeHandle, KernelError> {
        let mut all = Vec::new();
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
        if bodies.is_empty() {
            return Err(KernelError::ShapeNotFound);
        }
        Ok(self.store(vec![merge_into_one(&bodies)]))
    }

    fn face_clearance(
        &mut self,
        face: KernelId,
        other: &ShapeHandle,
    ) -> Result<f64, KernelError> {
        let face_bbox = {
            let (body, idx) = self
                .find_face(face)
                .ok_or(KernelError::EntityNotFound { id: face })?;
            body.faces[idx].bbox
        };
        let other_bbox = Self::shape_bbox(self.bodies(other)?);
        Ok(bbox_distance(face_bbox, other_bbox))
    }

    fn face_overlap_area(
        &mut self,
        face: KernelId,
        other: &ShapeHandle,
    ) -> Result<f64, KernelError> {
        let (face_bbox, normal) = {
            let (body, idx) = self
                .find_face(face)
                .ok_or(KernelError::EntityNotFound { id: face })?;
            (body.faces[idx].bbox, body.faces[idx].normal)
        };
        let other_bbox = Self::shape_bbox(self.bodies(other)?);

        let normal_axis = dominant_axis(normal, face_bbox);
        let mut area = 1.0;
        for i in 0..3 {
            if i == normal_axis {
                continue;
            }
            let overlap = face_bbox[i + 3].min(other_bbox[i + 3])
                - face_bbox[i].max(other_bbox[i]);
            if overlap <= 0.0 {
                return Ok(0.0);
            }
            area *= overlap;
        }
        Ok(area)
    }
}

/// Index of the face's normal axis: the largest normal component, falling
/// back to the flattest bbox axis for curved faces.
fn dominant_axis(normal: [f64; 3], bbox: [f64; 6]) -> usize {
    let mags = [normal[0].abs(), normal[1].abs(), normal[2].abs()];
    let strongest = mags.iter().cloned().fold(0.0, f64::max);
    if strongest > TOLERANCE {
        return mags.iter().position(|&m| m == strongest).unwrap_or(2);
    }
    let extents = [
        bbox[3] - bbox[0],
        bbox[4] - bbox[1],
        bbox[5] - bbox[2],
    ];
    let thinnest = extents.iter().cloned().fold(f64::INFINITY, f64::min);
    extents.iter().position(|&e| e == thinnest).unwrap_or(2)
}

impl MockKernel {
    /// Shared fillet/chamfer rework: consume the named edges and replace each
    /// with one blend face plus two boundary edges and two vertices.
    fn rework_edges(
        &mut self,
        solid: &ShapeHandle,
        edges: &[KernelId],
        size: f64,
        surface_type: &str,
        blend_area: impl Fn(f64, f64) -> f64,
    ) -> Result<ShapeHandle, KernelError> {
        let bodies = self.bodies(solid)?.clone();

        // Resolve the requested edges to per-body local indices.
        let mut per_body: HashMap<usize, HashSet<usize>> = HashMap::new();
        for id in edges {
            if id.0 / ID_STRIDE != solid.id() {
                return Err(KernelError::EntityNotFound { id: *id });
            }
            let (bi, ei) = Self::locate_edge(&bodies, id.0 % ID_STRIDE)
                .ok_or(KernelError::EntityNotFound { id: *id })?;
            per_body.entry(bi).or_default().insert(ei);
        }

        let mut out = Vec::with_capacity(bodies.len());
        for (bi, body) in bodies.iter().enumerate() {
            let Some(consumed) = per_body.get(&bi) else {
                out.push(body.clone());
                continue;
            };

            // Rebuild the edge list without the consumed edges; faces remap
            // their edge indices and drop the consumed ones.
            let mut remap: HashMap<usize, usize> = HashMap::new();
            let mut new_edges = Vec::new();
            for (i, edge) in body.edges.iter().enumerate() {
                if consumed.contains(&i) {
                    continue;
                }
                remap.insert(i, new_edges.len());
                new_edges.push(edge.clone());
            }
            let mut new_faces: Vec<MockFace> = body
                .faces
                .iter()
                .map(|face| MockFace {
                    edges: face
                        .edges
                        .iter()
                        .filter_map(|i| remap.get(i).copied())
                        .collect(),
                    ..face.clone()
                })
                .collect();
            let mut new_vertices = body.vertices.clone();

            // Blend topology is appended in ascending edge order so results
            // are stable regardless of the selection order.
            let mut ordered: Vec<usize> = consumed.iter().copied().collect();
            ordered.sort_unstable();
            for ei in ordered {
                let edge = &body.edges[ei];
                let sp = body.vertices[edge.start].position;
                let ep = body.vertices[edge.end].position;

                // Tangent points just off the original endpoints.
                let v1 = new_vertices.len();
                new_vertices.push(MockVertex {
                    position: [sp[0] + size * 0.01, sp[1] + size * 0.01, sp[2]],
                });
                let v2 = new_vertices.len();
                new_vertices.push(MockVertex {
                    position: [ep[0] + size * 0.01, ep[1] + size * 0.01, ep[2]],
                });

                let e1 = new_edges.len();
                new_edges.push(MockEdge {
                    start: edge.start,
                    end: v1,
                    centroid: sp,
                    length: size,
                });
                let e2 = new_edges.len();
                new_edges.push(MockEdge {
                    start: edge.end,
                    end: v2,
                    centroid: ep,
                    length: size,
                });

                new_faces.push(MockFace {
                    edges: vec![e1, e2],
                    normal: [0.0, 0.0, 0.0],
                    centroid: edge.centroid,
                    area: blend_area(edge.length, size),
                    bbox: [
                        sp[0].min(ep[0]),
                        sp[1].min(ep[1]),
                        sp[2].min(ep[2]),
                        sp[0].max(ep[0]),
                        sp[1].max(ep[1]),
                        sp[2].max(ep[2]),
                    ],
                    surface_type: surface_type.to_string(),
                });
            }

            out.push(MockBody {
                vertices: new_vertices,
                edges: new_edges,
                faces: new_faces,
                bbox: body.bbox,
            });
        }
        Ok(self.store(out))
    }
}

impl KernelIntrospect for MockKernel {
    fn bounding_box(&self, shape: &ShapeHandle) -> [f64; 6] {
        self.shapes
            .get(&shape.id())
            .map(|bodies| Self::shape_bbox(bodies))
            .unwrap_or([0.0; 6])
    }

    fn list_faces(&self, shape: &ShapeHandle) -> Vec<KernelId> {
        let total: usize = self
            .shapes
            .get(&shape.id())
            .map(|bodies| bodies.iter().map(|b| b.faces.len()).sum())
            .unwrap_or(0);
        (0..total as u64)
            .map(|i| KernelId(shape.id() * ID_STRIDE + i))
            .collect()
    }

    fn list_edges(&self, shape: &ShapeHandle) -> Vec<KernelId> {
        let total: usize = self
            .shapes
            .get(&shape.id())
            .map(|bodies| bodies.iter().map(|b| b.edges.len()).sum())
            .unwrap_or(0);
        (0..total as u64)
            .map(|i| KernelId(shape.id() * ID_STRIDE + EDGE_BASE + i))
            .collect()
    }

    fn list_vertices(&self, shape: &ShapeHandle) -> Vec<KernelId> {
        let total: usize = self
            .shapes
            .get(&shape.id())
            .map(|bodies| bodies.iter().map(|b| b.vertices.len()).sum())
            .unwrap_or(0);
        (0..total as u64)
            .map(|i| KernelId(shape.id() * ID_STRIDE + VERTEX_BASE + i))
            .collect()
    }

    fn list_solids(&self, shape: &ShapeHandle) -> Vec<KernelId> {
        let total = self
            .shapes
            .get(&shape.id())
            .map(|bodies| bodies.len())
            .unwrap_or(0);
        (0..total as u64)
            .map(|i| KernelId(shape.id() * ID_STRIDE + BODY_BASE + i))
            .collect()
    }

    fn face_edges(&self, face: KernelId) -> Vec<KernelId> {
        let handle_id = face.0 / ID_STRIDE;
        let Some(bodies) = self.shapes.get(&handle_id) else {
            return Vec::new();
        };
        let mut idx = (face.0 % ID_STRIDE) as usize;
        let mut edge_offset = 0usize;
        for body in bodies {
            if idx < body.faces.len() {
                return body.faces[idx]
                    .edges
                    .iter()
                    .map(|&i| KernelId(handle_id * ID_STRIDE + EDGE_BASE + (edge_offset + i) as u64))
                    .collect();
            }
            idx -= body.faces.len();
            edge_offset += body.edges.len();
        }
        Vec::new()
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        let handle_id = entity.0 / ID_STRIDE;
        let offset = entity.0 % ID_STRIDE;
        let Some(bodies) = self.shapes.get(&handle_id) else {
            return TopoSignature::empty();
        };

        match kind {
            TopoKind::Face => {
                let mut idx = offset as usize;
                for body in bodies {
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
                let Some(mut idx) = offset.checked_sub(EDGE_BASE).map(|i| i as usize) else {
                    return TopoSignature::empty();
                };
                for body in bodies {
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
                let Some(mut idx) = offset.checked_sub(VERTEX_BASE).map(|i| i as usize) else {
                    return TopoSignature::empty();
                };
                for body in bodies {
                    if idx < body.vertices.len() {
                        return TopoSignature {
                            surface_type: Some("point".to_string()),
                            area: None,
                            centroid: Some(body.vertices[idx].position),
                            normal: None,
                            bbox: None,
                            length: None,
                        };
                    }
                    idx -= body.vertices.len();
                }
            }
            TopoKind::Solid => {
                let Some(idx) = offset.checked_sub(BODY_BASE).map(|i| i as usize) else {
                    return TopoSignature::empty();
                };
                if let Some(body) = bodies.get(idx) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn face_sigs(kernel: &MockKernel, shape: &ShapeHandle) -> Vec<TopoSignature> {
        kernel
            .compute_all_signatures(shape, TopoKind::Face)
            .into_iter()
            .map(|(_, sig)| sig)
            .collect()
    }

    #[test]
    fn box_topology_and_signatures() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_box(10.0, 10.0, 10.0).unwrap();

        assert_eq!(kernel.list_faces(&shape).len(), 6);
        assert_eq!(kernel.list_edges(&shape).len(), 12);
        assert_eq!(kernel.list_vertices(&shape).len(), 8);

        let sigs = face_sigs(&kernel, &shape);
        let top = sigs
            .iter()
            .find(|s| s.normal == Some([0.0, 0.0, 1.0]))
            .unwrap();
        assert_relative_eq!(top.area.unwrap(), 100.0);
        assert_relative_eq!(top.centroid.unwrap()[2], 5.0);

        let bottom = sigs
            .iter()
            .find(|s| s.normal == Some([0.0, 0.0, -1.0]))
            .unwrap();
        assert_relative_eq!(bottom.centroid.unwrap()[2], -5.0);
    }

    #[test]
    fn cylinder_faces_and_areas() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_cylinder(2.0, 10.0).unwrap();

        let sigs = face_sigs(&kernel, &shape);
        assert_eq!(sigs.len(), 3);

        let lateral = sigs
            .iter()
            .find(|s| s.surface_type.as_deref() == Some("cylindrical"))
            .unwrap();
        assert_relative_eq!(lateral.area.unwrap(), 2.0 * PI * 2.0 * 10.0);
    }

    #[test]
    fn overlapping_union_fuses_into_one_body() {
        let mut kernel = MockKernel::new();
        let big = kernel.make_box(10.0, 10.0, 10.0).unwrap();
        let small0 = kernel.make_box(5.0, 5.0, 5.0).unwrap();
        let small = kernel.translate(&small0, [0.0, 0.0, 6.0]).unwrap();
        let merged = kernel.boolean_union(&big, &small).unwrap();

        assert_eq!(kernel.list_solids(&merged).len(), 1);
        let areas: Vec<f64> = face_sigs(&kernel, &merged)
            .iter()
            .filter_map(|s| s.area)
            .collect();
        assert_eq!(areas.len(), 12);
        let largest = areas.iter().cloned().fold(0.0, f64::max);
        let smallest = areas.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_relative_eq!(largest, 100.0);
        assert_relative_eq!(smallest, 25.0);
    }

    #[test]
    fn touching_union_stays_a_compound() {
        let mut kernel = MockKernel::new();
        let a = kernel.make_box(4.0, 4.0, 4.0).unwrap();
        let b0 = kernel.make_box(4.0, 4.0, 4.0).unwrap();
        let b = kernel.translate(&b0, [4.0, 0.0, 0.0]).unwrap();
        let merged = kernel.boolean_union(&a, &b).unwrap();

        assert_eq!(kernel.list_solids(&merged).len(), 2);
        assert_eq!(kernel.list_faces(&merged).len(), 12);
    }

    #[test]
    fn intersect_yields_overlap_box() {
        let mut kernel = MockKernel::new();
        let a = kernel.make_box(4.0, 4.0, 4.0).unwrap();
        let b0 = kernel.make_box(4.0, 4.0, 4.0).unwrap();
        let b = kernel.translate(&b0, [2.0, 0.0, 0.0]).unwrap();

        let common = kernel.boolean_intersect(&a, &b).unwrap();
        let bbox = kernel.bounding_box(&common);
        assert_relative_eq!(bbox[0], 0.0);
        assert_relative_eq!(bbox[3], 2.0);
        assert_relative_eq!(bbox[4], 2.0);
    }

    #[test]
    fn disjoint_intersect_fails() {
        let mut kernel = MockKernel::new();
        let a = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        let b0 = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        let b = kernel.translate(&b0, [10.0, 0.0, 0.0]).unwrap();
        assert!(matches!(
            kernel.boolean_intersect(&a, &b),
            Err(KernelError::BooleanFailed { .. })
        ));
    }

    #[test]
    fn fillet_consumes_edges_and_adds_blend_faces() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_box(4.0, 4.0, 4.0).unwrap();
        let edges = kernel.list_edges(&shape);
        let picked = &edges[..2];

        let filleted = kernel.fillet_edges(&shape, picked, 0.5).unwrap();
        assert_eq!(kernel.list_edges(&filleted).len(), 12 - 2 + 4);
        assert_eq!(kernel.list_faces(&filleted).len(), 8);

        let cylindrical = face_sigs(&kernel, &filleted)
            .iter()
            .filter(|s| s.surface_type.as_deref() == Some("cylindrical"))
            .count();
        assert_eq!(cylindrical, 2);
    }

    #[test]
    fn blend_faces_follow_ascending_edge_order() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_box(4.0, 4.0, 4.0).unwrap();
        let edges = kernel.list_edges(&shape);
        // Selection order deliberately scrambled.
        let picked = [edges[7], edges[0], edges[2]];

        let filleted = kernel.fillet_edges(&shape, &picked, 0.5).unwrap();
        let blend_centroids: Vec<[f64; 3]> = face_sigs(&kernel, &filleted)
            .iter()
            .filter(|s| s.surface_type.as_deref() == Some("cylindrical"))
            .filter_map(|s| s.centroid)
            .collect();

        let expected: Vec<[f64; 3]> = [edges[0], edges[2], edges[7]]
            .iter()
            .filter_map(|&e| kernel.compute_signature(e, TopoKind::Edge).centroid)
            .collect();
        assert_eq!(blend_centroids, expected);
    }

    #[test]
    fn shell_adds_cavity_faces_inside_the_outer_walls() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_box(10.0, 10.0, 10.0).unwrap();
        let hollow = kernel.shell_solid(&shape, 1.0).unwrap();

        assert_eq!(kernel.list_faces(&hollow).len(), 12);
        assert_eq!(kernel.bounding_box(&hollow), kernel.bounding_box(&shape));

        // Cavity top face: shrunk by the wall thickness, normal flipped in.
        let inner_top = face_sigs(&kernel, &hollow)
            .into_iter()
            .find(|s| s.centroid.map(|c| (c[2] - 4.0).abs() < 1e-9).unwrap_or(false))
            .unwrap();
        assert_relative_eq!(inner_top.area.unwrap(), 64.0);
        assert_relative_eq!(inner_top.normal.unwrap()[2], -1.0);
    }

    #[test]
    fn shell_rejects_walls_thicker_than_the_solid() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_box(4.0, 4.0, 4.0).unwrap();
        assert!(matches!(
            kernel.shell_solid(&shape, 2.0),
            Err(KernelError::ShellFailed { .. })
        ));
    }

    #[test]
    fn fillet_rejects_foreign_edges() {
        let mut kernel = MockKernel::new();
        let a = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        let b = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        let foreign = kernel.list_edges(&b);
        assert!(matches!(
            kernel.fillet_edges(&a, &foreign[..1], 0.1),
            Err(KernelError::FilletFailed { .. })
        ));
    }

    #[test]
    fn offset_grow_then_shrink_restores_bbox() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_box(6.0, 6.0, 6.0).unwrap();
        let grown = kernel.offset_shape(&shape, 1.0).unwrap();
        assert_relative_eq!(kernel.bounding_box(&grown)[3], 4.0);

        let back = kernel.offset_shape(&grown, -1.0).unwrap();
        let bbox = kernel.bounding_box(&back);
        assert_relative_eq!(bbox[0], -3.0);
        assert_relative_eq!(bbox[5], 3.0);
    }

    #[test]
    fn offset_collapse_fails() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        assert!(matches!(
            kernel.offset_shape(&shape, -0.5),
            Err(KernelError::OffsetFailed { .. })
        ));
    }

    #[test]
    fn compound_offset_not_supported() {
        let mut kernel = MockKernel::new();
        let a = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        let b = kernel.make_box(1.0, 1.0, 1.0).unwrap();
        let compound = kernel.coalesce(&[a, b]).unwrap();
        assert!(matches!(
            kernel.offset_shape(&compound, 0.1),
            Err(KernelError::NotSupported { .. })
        ));
    }

    #[test]
    fn face_overlap_of_stacked_boxes() {
        let mut kernel = MockKernel::new();
        let base = kernel.make_box(10.0, 10.0, 10.0).unwrap();
        let lid0 = kernel.make_box(4.0, 4.0, 2.0).unwrap();
        let lid = kernel.translate(&lid0, [0.0, 0.0, 6.0]).unwrap();

        // Top face of the base is at z = 5, the lid sits right on it.
        let top = kernel
            .compute_all_signatures(&base, TopoKind::Face)
            .into_iter()
            .find(|(_, s)| s.normal == Some([0.0, 0.0, 1.0]))
            .map(|(id, _)| id)
            .unwrap();

        assert_relative_eq!(kernel.face_clearance(top, &lid).unwrap(), 0.0);
        assert_relative_eq!(kernel.face_overlap_area(top, &lid).unwrap(), 16.0);

        let side = kernel
            .compute_all_signatures(&base, TopoKind::Face)
            .into_iter()
            .find(|(_, s)| s.normal == Some([1.0, 0.0, 0.0]))
            .map(|(id, _)| id)
            .unwrap();
        assert!(kernel.face_clearance(side, &lid).unwrap() > 1.0);
    }

    #[test]
    fn rotate_maps_normals_and_bbox() {
        let mut kernel = MockKernel::new();
        let shape = kernel.make_box(2.0, 4.0, 6.0).unwrap();
        let turned = kernel.rotate(&shape, Axis::X, 90.0).unwrap();

        let bbox = kernel.bounding_box(&turned);
        // Y and Z extents swap under a quarter turn about X.
        assert_relative_eq!(bbox[4] - bbox[1], 6.0, max_relative = 1e-9);
        assert_relative_eq!(bbox[5] - bbox[2], 4.0, max_relative = 1e-9);

        let up = face_sigs(&kernel, &turned)
            .into_iter()
            .filter_map(|s| s.normal)
            .find(|n| n[2] > 0.9);
        assert!(up.is_some());
    }
}
