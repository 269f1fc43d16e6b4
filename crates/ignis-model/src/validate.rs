//! Pre-flight feasibility checks, run before any kernel call.

use ignis_types::TOLERANCE;

use crate::error::ModelError;

/// Reject dimensions at or below the tolerance floor. `ctor` names the
/// constructor for the placeholder identity of a not-yet-built entity.
pub(crate) fn ensure_dimensions(ctor: &str, dims: &[(&str, f64)]) -> Result<(), ModelError> {
    let bad: Vec<String> = dims
        .iter()
        .filter(|(_, v)| *v <= TOLERANCE)
        .map(|(n, v)| format!("{n}={v}"))
        .collect();
    if bad.is_empty() {
        return Ok(());
    }
    Err(ModelError::InfeasibleGeometry {
        name: format!("{ctor}<pending>"),
        violations: format!(
            "dimensions must be positive. Invalid arguments: {}",
            bad.join(", ")
        ),
    })
}

/// Reject polygons with too few points or coincident neighbors.
pub(crate) fn ensure_polygon(
    ctor: &str,
    points: &[[f64; 2]],
    min_points: usize,
) -> Result<(), ModelError> {
    let fail = |violations: String| {
        Err(ModelError::InfeasibleGeometry {
            name: format!("{ctor}<pending>"),
            violations,
        })
    };

    if points.is_empty() {
        return fail("no vertices provided".to_string());
    }
    if points.len() < min_points {
        return fail(format!(
            "at least {min_points} vertices required, got {}",
            points.len()
        ));
    }
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let d = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
        if d <= TOLERANCE {
            return fail(format!(
                "vertices {i} and {} are coincident (distance {d})",
                (i + 1) % points.len()
            ));
        }
    }
    Ok(())
}
