//! Bounding-box alignment arithmetic.
//!
//! Alignment is absolute placement: the destination depends only on the
//! target's box, the moving box's extent and the offset, never on where the
//! moving entity currently sits. The entity translation is then the
//! destination minus the current center.

use ignis_types::{BoundingBox, FaceSide};

/// Translation that snaps a box with bounds `own` against the named face of
/// `target`, leaving the other two axes centered on the target.
///
/// `offset` is signed: positive widens the gap outward from the face,
/// negative embeds the moving box into the target.
pub fn alignment_delta(
    own: &BoundingBox,
    target: &BoundingBox,
    side: FaceSide,
    offset: f64,
) -> [f64; 3] {
    let mut dest = target.center();
    let axis = side.axis();
    let i = axis.index();
    let half = own.size()[i] / 2.0;

    dest[i] = if side.is_positive() {
        target.max_along(axis) + half + offset
    } else {
        target.min_along(axis) - half - offset
    };

    let center = own.center();
    [
        dest[0] - center[0],
        dest[1] - center[1],
        dest[2] - center[2],
    ]
}
