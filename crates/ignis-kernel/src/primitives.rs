//! Primitive solid builders on top of truck's sweep API.
//!
//! truck has no built-in box/cylinder/sphere — everything is successive
//! sweeps. All builders here return solids centered on the origin, matching
//! the fluent layer's "center aligning is defaulted" convention.

use std::f64::consts::PI;

use truck_modeling::builder;
use truck_modeling::geometry::{Curve, Line};
use truck_modeling::topology::{Edge, Solid, Wire};
use truck_modeling::{EuclideanSpace, Point3, Rad, Vector3};

use crate::types::KernelError;

/// Box with extents `x × y × z`, centered on the origin.
pub fn centered_box(x: f64, y: f64, z: f64) -> Solid {
    let v = builder::vertex(Point3::new(-x / 2.0, -y / 2.0, -z / 2.0));
    let edge = builder::tsweep(&v, Vector3::new(x, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, y, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, z))
}

/// Cylinder along Z, centered on the origin: circle wire → face → sweep.
pub fn centered_cylinder(radius: f64, height: f64) -> Result<Solid, KernelError> {
    let v = builder::vertex(Point3::new(radius, 0.0, -height / 2.0));
    let wire = builder::rsweep(
        &v,
        Point3::new(0.0, 0.0, -height / 2.0),
        Vector3::unit_z(),
        Rad(2.0 * PI),
    );
    let face = builder::try_attach_plane(&[wire]).map_err(|e| KernelError::Other {
        message: format!("failed to build circular face: {e}"),
    })?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}

/// Sphere centered on the origin: semicircle face → rotational sweep 2π.
pub fn centered_sphere(radius: f64) -> Result<Solid, KernelError> {
    // Semicircle arc in the XZ plane, from (r,0,0) over the pole to (-r,0,0).
    let v_right = builder::vertex(Point3::new(radius, 0.0, 0.0));
    let arc_wire = builder::rsweep(&v_right, Point3::origin(), Vector3::unit_y(), Rad(PI));

    let mut edges: Vec<Edge> = arc_wire.edge_iter().cloned().collect();
    let (start, end) = match (edges.first(), edges.last()) {
        (Some(first), Some(last)) => (first.front().clone(), last.back().clone()),
        _ => {
            return Err(KernelError::Other {
                message: "semicircle sweep produced no edges".to_string(),
            })
        }
    };

    // Close with a diameter line reusing the arc's own endpoint vertices; a
    // fresh vertex at the same point would leave the wire topologically open.
    edges.push(Edge::new(
        &end,
        &start,
        Curve::Line(Line(end.point(), start.point())),
    ));
    let closed_wire = Wire::from_iter(edges);

    let face = builder::try_attach_plane(&[closed_wire]).map_err(|e| KernelError::Other {
        message: format!("failed to build semicircle face: {e}"),
    })?;

    Ok(builder::rsweep(
        &face,
        Point3::origin(),
        Vector3::unit_z(),
        Rad(2.0 * PI),
    ))
}

/// Torus around Z, centered on the origin: minor circle face revolved a full
/// turn about the Z axis.
pub fn centered_torus(major: f64, minor: f64) -> Result<Solid, KernelError> {
    // Minor circle in the XZ plane, centered at (major, 0, 0).
    let v = builder::vertex(Point3::new(major + minor, 0.0, 0.0));
    let wire = builder::rsweep(
        &v,
        Point3::new(major, 0.0, 0.0),
        Vector3::unit_y(),
        Rad(2.0 * PI),
    );
    let face = builder::try_attach_plane(&[wire]).map_err(|e| KernelError::Other {
        message: format!("failed to build torus profile: {e}"),
    })?;
    Ok(builder::rsweep(
        &face,
        Point3::origin(),
        Vector3::unit_z(),
        Rad(2.0 * PI),
    ))
}

/// Cone (truncated when `top_radius > 0`) along Z, centered on the origin:
/// trapezoid profile in the XZ plane revolved about Z.
pub fn centered_cone(
    bottom_radius: f64,
    top_radius: f64,
    height: f64,
) -> Result<Solid, KernelError> {
    let z0 = -height / 2.0;
    let z1 = height / 2.0;
    let mut pts = vec![
        Point3::new(0.0, 0.0, z0),
        Point3::new(bottom_radius, 0.0, z0),
    ];
    if top_radius > 1e-12 {
        pts.push(Point3::new(top_radius, 0.0, z1));
    }
    pts.push(Point3::new(0.0, 0.0, z1));

    let face = polyline_face(&pts)?;
    Ok(builder::rsweep(
        &face,
        Point3::origin(),
        Vector3::unit_z(),
        Rad(2.0 * PI),
    ))
}

/// Wedge: trapezoid profile in the XZ plane swept along Y, centered on the
/// origin. Only the untapered-depth case (`ymin == 0`, `ymax == ysize`) is
/// expressible with a translational sweep.
#[allow(clippy::too_many_arguments)]
pub fn centered_wedge(
    xsize: f64,
    ysize: f64,
    zsize: f64,
    xmax: f64,
    xmin: f64,
    ymax: f64,
    ymin: f64,
) -> Result<Solid, KernelError> {
    if ymin.abs() > 1e-9 || (ymax - ysize).abs() > 1e-9 {
        return Err(KernelError::NotSupported {
            operation: "wedge with tapered Y span".to_string(),
        });
    }

    let hx = xsize / 2.0;
    let hy = ysize / 2.0;
    let hz = zsize / 2.0;
    // Profile corners in original (corner-origin) coordinates, recentered.
    let pts = [
        Point3::new(-hx, -hy, -hz),
        Point3::new(hx, -hy, -hz),
        Point3::new(xmax - hx, -hy, hz),
        Point3::new(xmin - hx, -hy, hz),
    ];
    let face = polyline_face(&pts)?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, ysize, 0.0)))
}

/// Prism from a closed XY polygon, extruded symmetrically along Z.
pub fn polygon_prism(points: &[[f64; 2]], height: f64) -> Result<Solid, KernelError> {
    let pts: Vec<Point3> = points
        .iter()
        .map(|p| Point3::new(p[0], p[1], -height / 2.0))
        .collect();
    let face = polyline_face(&pts)?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}

/// Build a planar face bounded by straight edges through the given points.
fn polyline_face(pts: &[Point3]) -> Result<truck_modeling::topology::Face, KernelError> {
    if pts.len() < 3 {
        return Err(KernelError::Other {
            message: "polyline face needs at least 3 points".to_string(),
        });
    }

    // Create all vertices first so consecutive edges share endpoints.
    let n = pts.len();
    let vertices: Vec<_> = pts.iter().map(|&p| builder::vertex(p)).collect();
    let mut wire_edges: Vec<Edge> = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        let edge = Edge::new(
            &vertices[i],
            &vertices[j],
            Curve::Line(Line(pts[i], pts[j])),
        );
        wire_edges.push(edge);
    }
    let wire = Wire::from_iter(wire_edges);

    builder::try_attach_plane(&[wire]).map_err(|e| KernelError::Other {
        message: format!("failed to attach plane to polygon: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_box_topology() {
        let solid = centered_box(1.0, 2.0, 3.0);

        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1, "box should have 1 shell");

        let shell = &boundaries[0];
        let faces: Vec<_> = shell.face_iter().collect();

        let mut edge_ids = std::collections::HashSet::new();
        for edge in shell.edge_iter() {
            edge_ids.insert(edge.id());
        }
        let mut vert_ids = std::collections::HashSet::new();
        for v in shell.vertex_iter() {
            vert_ids.insert(v.id());
        }

        assert_eq!(faces.len(), 6, "box should have 6 faces");
        assert_eq!(edge_ids.len(), 12, "box should have 12 edges");
        assert_eq!(vert_ids.len(), 8, "box should have 8 vertices");

        // Euler's formula: V - E + F = 2
        let v = vert_ids.len() as i64;
        let e = edge_ids.len() as i64;
        let f = faces.len() as i64;
        assert_eq!(v - e + f, 2, "Euler formula must hold");
    }

    #[test]
    fn centered_box_extents() {
        let solid = centered_box(2.0, 3.0, 4.0);
        let boundaries = solid.boundaries();
        let shell = &boundaries[0];

        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for v in shell.vertex_iter() {
            let p = v.point();
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        let eps = 1e-10;
        for i in 0..3 {
            assert!(
                (min[i] + max[i]).abs() < eps,
                "box must be centered on axis {i}"
            );
        }
        assert!((max[0] - min[0] - 2.0).abs() < eps);
        assert!((max[1] - min[1] - 3.0).abs() < eps);
        assert!((max[2] - min[2] - 4.0).abs() < eps);
    }

    #[test]
    fn centered_cylinder_topology() {
        let solid = centered_cylinder(1.0, 2.0).unwrap();
        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1, "cylinder should have 1 shell");

        let shell = &boundaries[0];
        let faces: Vec<_> = shell.face_iter().collect();
        // truck may split the lateral surface; at minimum top + bottom + side.
        assert!(faces.len() >= 3, "cylinder should have at least 3 faces");
    }

    #[test]
    fn polygon_prism_topology() {
        let solid = polygon_prism(&[[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]], 2.0).unwrap();
        let boundaries = solid.boundaries();
        let shell = &boundaries[0];
        let faces: Vec<_> = shell.face_iter().collect();
        assert_eq!(faces.len(), 6, "rectangular prism should have 6 faces");
    }

    #[test]
    fn sphere_profile_closes_into_a_solid() {
        let solid = centered_sphere(1.5).unwrap();
        assert_eq!(solid.boundaries().len(), 1, "sphere should have 1 shell");
    }

    #[test]
    fn tapered_wedge_is_rejected() {
        let err = centered_wedge(4.0, 4.0, 2.0, 3.0, 1.0, 3.0, 1.0).unwrap_err();
        assert!(matches!(err, KernelError::NotSupported { .. }));
    }
}
