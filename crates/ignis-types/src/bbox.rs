use serde::{Deserialize, Serialize};

use crate::side::{Axis, FaceSide};

/// Axis-aligned bounding box.
///
/// Always computed on demand from the current shape, never cached: shapes are
/// immutable, and a fresh box is cheap relative to the correctness guarantees
/// the alignment engine depends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Build from the flat `[min_x, min_y, min_z, max_x, max_y, max_z]` layout
    /// used at the kernel seam.
    pub fn from_extents(e: [f64; 6]) -> Self {
        Self {
            min: [e[0], e[1], e[2]],
            max: [e[3], e[4], e[5]],
        }
    }

    /// An inverted box that unions to identity.
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn max_along(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }

    pub fn min_along(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }

    /// Coordinate of the named face plane along its axis.
    ///
    /// `face_coordinate(Top)` is `max.z`, `face_coordinate(Front)` is `min.y`,
    /// and so on.
    pub fn face_coordinate(&self, side: FaceSide) -> f64 {
        if side.is_positive() {
            self.max_along(side.axis())
        } else {
            self.min_along(side.axis())
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut min = self.min;
        let mut max = self.max;
        for i in 0..3 {
            min[i] = min[i].min(other.min[i]);
            max[i] = max[i].max(other.max[i]);
        }
        BoundingBox { min, max }
    }

    /// Grow to include a point.
    pub fn expand_to(&mut self, p: [f64; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_size_of_centered_box() {
        let b = BoundingBox::new([-5.0, -5.0, -5.0], [5.0, 5.0, 5.0]);
        assert_eq!(b.center(), [0.0, 0.0, 0.0]);
        assert_eq!(b.size(), [10.0, 10.0, 10.0]);
    }

    #[test]
    fn face_coordinates_follow_side_sign() {
        let b = BoundingBox::new([-1.0, -2.0, -3.0], [4.0, 5.0, 6.0]);
        assert_eq!(b.face_coordinate(FaceSide::Top), 6.0);
        assert_eq!(b.face_coordinate(FaceSide::Bottom), -3.0);
        assert_eq!(b.face_coordinate(FaceSide::Right), 4.0);
        assert_eq!(b.face_coordinate(FaceSide::Left), -1.0);
        assert_eq!(b.face_coordinate(FaceSide::Back), 5.0);
        assert_eq!(b.face_coordinate(FaceSide::Front), -2.0);
    }

    #[test]
    fn union_covers_both() {
        let a = BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = BoundingBox::new([-2.0, 0.5, 0.0], [0.5, 3.0, 0.5]);
        let u = a.union(&b);
        assert_eq!(u.min, [-2.0, 0.0, 0.0]);
        assert_eq!(u.max, [1.0, 3.0, 1.0]);
    }

    #[test]
    fn empty_box_unions_to_identity() {
        let a = BoundingBox::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);
        let e = BoundingBox::empty();
        assert!(e.is_empty());
        assert_eq!(e.union(&a), a);
    }
}
