//! The modeling session: a shared kernel plus primitive constructors.
//!
//! All primitives are centered on the origin. Every dimensioned constructor
//! runs the feasibility validators before touching the kernel.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use ignis_kernel::{MockKernel, TruckKernel};

use crate::entity::{Entity, SharedKernel};
use crate::error::ModelError;
use crate::registry::{Group, Model};
use crate::validate::{ensure_dimensions, ensure_polygon};

/// ISO 273 clearance hole diameters in mm: [Close, Normal, Loose] per size.
const ISO_273_CLEARANCE: &[(&str, [f64; 3])] = &[
    ("M2", [2.2, 2.4, 2.6]),
    ("M3", [3.2, 3.4, 3.6]),
    ("M4", [4.3, 4.5, 4.8]),
    ("M5", [5.3, 5.5, 5.8]),
    ("M6", [6.4, 6.6, 7.0]),
    ("M8", [8.4, 9.0, 10.0]),
    ("M10", [10.5, 11.0, 12.0]),
    ("M12", [13.0, 13.5, 14.5]),
];

/// Clearance fit class for ISO screw holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoFit {
    Close,
    Normal,
    Loose,
}

impl IsoFit {
    fn index(self) -> usize {
        match self {
            IsoFit::Close => 0,
            IsoFit::Normal => 1,
            IsoFit::Loose => 2,
        }
    }
}

impl FromStr for IsoFit {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "close" => Ok(IsoFit::Close),
            "normal" => Ok(IsoFit::Normal),
            "loose" => Ok(IsoFit::Loose),
            _ => Err(ModelError::InvalidArgument {
                reason: format!("unsupported fit: {s}. Supported fits are: Close, Normal, Loose"),
            }),
        }
    }
}

/// A modeling session owning the kernel every entity of the session shares.
pub struct Workbench {
    kernel: SharedKernel,
}

impl Workbench {
    /// Session over the deterministic mock kernel.
    pub fn mock() -> Self {
        Self {
            kernel: Rc::new(RefCell::new(MockKernel::new())),
        }
    }

    /// Session over the truck-backed kernel.
    pub fn truck() -> Self {
        Self {
            kernel: Rc::new(RefCell::new(TruckKernel::new())),
        }
    }

    fn entity(&self, shape: ignis_kernel::ShapeHandle) -> Entity {
        Entity::new(Rc::clone(&self.kernel), shape)
    }

    /// Box with extents `x × y × z`.
    pub fn cuboid(&self, x: f64, y: f64, z: f64) -> Result<Entity, ModelError> {
        ensure_dimensions("cuboid", &[("x", x), ("y", y), ("z", z)])?;
        let shape = self.kernel.borrow_mut().make_box(x, y, z)?;
        Ok(self.entity(shape))
    }

    /// Cylinder standing on Z.
    pub fn cylinder(&self, r: f64, h: f64) -> Result<Entity, ModelError> {
        ensure_dimensions("cylinder", &[("r", r), ("h", h)])?;
        let shape = self.kernel.borrow_mut().make_cylinder(r, h)?;
        Ok(self.entity(shape))
    }

    pub fn sphere(&self, r: f64) -> Result<Entity, ModelError> {
        ensure_dimensions("sphere", &[("r", r)])?;
        let shape = self.kernel.borrow_mut().make_sphere(r)?;
        Ok(self.entity(shape))
    }

    /// Torus around Z.
    pub fn torus(&self, major: f64, minor: f64) -> Result<Entity, ModelError> {
        ensure_dimensions("torus", &[("major", major), ("minor", minor)])?;
        let shape = self.kernel.borrow_mut().make_torus(major, minor)?;
        Ok(self.entity(shape))
    }

    /// Cone, truncated when `top_radius > 0`.
    pub fn cone(
        &self,
        bottom_radius: f64,
        top_radius: f64,
        h: f64,
    ) -> Result<Entity, ModelError> {
        ensure_dimensions(
            "cone",
            &[
                ("bottom_radius", bottom_radius),
                ("top_radius", top_radius),
                ("h", h),
            ],
        )?;
        let shape = self
            .kernel
            .borrow_mut()
            .make_cone(bottom_radius, top_radius, h)?;
        Ok(self.entity(shape))
    }

    /// Wedge: a box whose top face is shrunk to the `[xmin, xmax] × [ymin,
    /// ymax]` span.
    #[allow(clippy::too_many_arguments)]
    pub fn wedge(
        &self,
        xsize: f64,
        ysize: f64,
        zsize: f64,
        xmax: f64,
        xmin: f64,
        ymax: f64,
        ymin: f64,
    ) -> Result<Entity, ModelError> {
        ensure_dimensions(
            "wedge",
            &[
                ("xsize", xsize),
                ("ysize", ysize),
                ("zsize", zsize),
                ("xmax", xmax),
                ("xmin", xmin),
                ("ymax", ymax),
                ("ymin", ymin),
            ],
        )?;
        let shape = self
            .kernel
            .borrow_mut()
            .make_wedge(xsize, ysize, zsize, xmax, xmin, ymax, ymin)?;
        Ok(self.entity(shape))
    }

    /// Prism from a closed XY polygon, extruded symmetrically along Z.
    pub fn polygon_prism(&self, points: &[[f64; 2]], height: f64) -> Result<Entity, ModelError> {
        ensure_dimensions("polygon_prism", &[("height", height)])?;
        ensure_polygon("polygon_prism", points, 3)?;
        let shape = self.kernel.borrow_mut().extrude_polygon(points, height)?;
        Ok(self.entity(shape))
    }

    /// Slot: a stadium prism extruded along Z — a box capped with
    /// semicylindrical ends on X. `width` is the overall span including the
    /// round ends, `height` their diameter.
    pub fn slot(&self, width: f64, height: f64, depth: f64) -> Result<Entity, ModelError> {
        ensure_dimensions(
            "slot",
            &[("width", width), ("height", height), ("depth", depth)],
        )?;
        if width <= height {
            return Err(ModelError::InfeasibleGeometry {
                name: "slot<pending>".to_string(),
                violations: format!("width ({width}) must exceed height ({height})"),
            });
        }
        let half_span = (width - height) / 2.0;
        let body = self.cuboid(width - height, height, depth)?;
        let left = self
            .cylinder(height / 2.0, depth)?
            .translate(-half_span, 0.0, 0.0)?;
        let right = self
            .cylinder(height / 2.0, depth)?
            .translate(half_span, 0.0, 0.0)?;
        body.union(&left)?.union(&right)
    }

    /// Hole for a socket head cap screw: a through-shaft with a wider bore
    /// at the top, intended for boolean subtraction.
    pub fn counter_bore_hole(
        &self,
        radius: f64,
        cb_radius: f64,
        cb_depth: f64,
        height: f64,
    ) -> Result<Entity, ModelError> {
        ensure_dimensions(
            "counter_bore_hole",
            &[
                ("radius", radius),
                ("cb_radius", cb_radius),
                ("cb_depth", cb_depth),
                ("height", height),
            ],
        )?;
        let shaft = self.cylinder(radius, height)?;
        let head = self
            .cylinder(cb_radius, cb_depth)?
            .translate(0.0, 0.0, height / 2.0 - cb_depth / 2.0)?;
        shaft.union(&head)
    }

    /// Hole for a countersunk screw: a through-shaft with a conical top.
    /// `csk_angle` is the full cone angle in degrees (e.g. 82, 90).
    pub fn countersink_hole(
        &self,
        radius: f64,
        csk_radius: f64,
        csk_angle: f64,
        height: f64,
    ) -> Result<Entity, ModelError> {
        ensure_dimensions(
            "countersink_hole",
            &[
                ("radius", radius),
                ("csk_radius", csk_radius),
                ("csk_angle", csk_angle),
                ("height", height),
            ],
        )?;
        if csk_radius <= radius {
            return Err(ModelError::InfeasibleGeometry {
                name: "countersink_hole<pending>".to_string(),
                violations: format!(
                    "csk_radius ({csk_radius}) must exceed radius ({radius})"
                ),
            });
        }
        let csk_depth = (csk_radius - radius) / (csk_angle / 2.0).to_radians().tan();
        let shaft = self.cylinder(radius, height)?;
        let head = self
            .cone(radius, csk_radius, csk_depth)?
            .translate(0.0, 0.0, height / 2.0 - csk_depth / 2.0)?;
        shaft.union(&head)
    }

    /// Standard ISO metric screw clearance hole (ISO 273 diameters).
    pub fn iso_hole(&self, size: &str, depth: f64, fit: IsoFit) -> Result<Entity, ModelError> {
        let upper = size.to_ascii_uppercase();
        let spec = ISO_273_CLEARANCE
            .iter()
            .find(|(s, _)| *s == upper)
            .ok_or_else(|| {
                let supported: Vec<&str> =
                    ISO_273_CLEARANCE.iter().map(|(s, _)| *s).collect();
                ModelError::InvalidArgument {
                    reason: format!(
                        "unsupported ISO hole size: {size}. Supported sizes are: {}",
                        supported.join(", ")
                    ),
                }
            })?;
        let diameter = spec.1[fit.index()];
        self.cylinder(diameter / 2.0, depth)
    }

    /// Start a named model context over this session.
    pub fn model(&self, name: impl Into<String>) -> Model {
        Model::new(name)
    }

    /// Start an anonymous group context over this session.
    pub fn group(&self) -> Group {
        Group::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn negative_dimension_fails_naming_the_argument() {
        let wb = Workbench::mock();
        let err = wb.cuboid(-1.0, 5.0, 5.0).unwrap_err();
        match err {
            ModelError::InfeasibleGeometry { violations, .. } => {
                assert!(violations.contains("x=-1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(wb.cuboid(5.0, 5.0, 5.0).is_ok());
    }

    #[test]
    fn iso_hole_uses_the_clearance_table() {
        let wb = Workbench::mock();
        let hole = wb.iso_hole("M6", 12.0, IsoFit::Normal).unwrap();
        // M6 Normal clearance diameter is 6.6.
        assert_relative_eq!(hole.bbox().size()[0], 6.6);
        assert_relative_eq!(hole.bbox().size()[2], 12.0);

        let close = wb.iso_hole("m3", 5.0, IsoFit::Close).unwrap();
        assert_relative_eq!(close.radius(), 1.6);
    }

    #[test]
    fn unknown_iso_size_is_invalid_argument() {
        let wb = Workbench::mock();
        let err = wb.iso_hole("M7", 10.0, IsoFit::Normal).unwrap_err();
        match err {
            ModelError::InvalidArgument { reason } => {
                assert!(reason.contains("M7"));
                assert!(reason.contains("M12"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn iso_fit_parses_and_rejects() {
        assert_eq!("Loose".parse::<IsoFit>().unwrap(), IsoFit::Loose);
        assert!("snug".parse::<IsoFit>().is_err());
    }

    #[test]
    fn counter_bore_head_sits_at_the_top() {
        let wb = Workbench::mock();
        let hole = wb.counter_bore_hole(2.0, 4.0, 3.0, 20.0).unwrap();
        let bbox = hole.bbox();
        assert_relative_eq!(bbox.size()[2], 20.0);
        assert_relative_eq!(bbox.size()[0], 8.0);
    }

    #[test]
    fn countersink_requires_wider_top() {
        let wb = Workbench::mock();
        assert!(wb.countersink_hole(3.0, 2.0, 90.0, 10.0).is_err());
        assert!(wb.countersink_hole(2.0, 4.0, 90.0, 10.0).is_ok());
    }

    #[test]
    fn slot_spans_width_and_rounds_to_height() {
        let wb = Workbench::mock();
        let slot = wb.slot(10.0, 4.0, 2.0).unwrap();
        let size = slot.bbox().size();
        assert_relative_eq!(size[0], 10.0);
        assert_relative_eq!(size[1], 4.0);
        assert_relative_eq!(size[2], 2.0);
    }

    #[test]
    fn slot_narrower_than_its_ends_is_infeasible() {
        let wb = Workbench::mock();
        assert!(wb.slot(3.0, 4.0, 2.0).is_err());
        assert!(wb.slot(10.0, -1.0, 2.0).is_err());
    }

    #[test]
    fn polygon_prism_validates_points() {
        let wb = Workbench::mock();
        assert!(wb
            .polygon_prism(&[[0.0, 0.0], [1.0, 0.0]], 2.0)
            .is_err());
        let prism = wb
            .polygon_prism(&[[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]], 2.0)
            .unwrap();
        assert_relative_eq!(prism.bbox().size()[2], 2.0);
    }
}
