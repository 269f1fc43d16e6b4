use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A world coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index of this axis into an `[x, y, z]` triple.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Read this axis' component out of a point or vector.
    pub fn component(self, p: [f64; 3]) -> f64 {
        p[self.index()]
    }

    /// Unit direction vector for this axis.
    pub fn direction(self) -> [f64; 3] {
        match self {
            Axis::X => [1.0, 0.0, 0.0],
            Axis::Y => [0.0, 1.0, 0.0],
            Axis::Z => [0.0, 0.0, 1.0],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// One of the six named faces of an axis-aligned bounding box.
///
/// Convention (matching the alignment engine): `Back` is the positive-depth
/// (+Y) direction, `Front` is negative-depth. `Top`/`Bottom` are ±Z,
/// `Right`/`Left` are ±X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSide {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

/// Error returned when parsing an unknown face name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown face: {name}. Use top/bottom/left/right/front/back")]
pub struct UnknownFaceSide {
    pub name: String,
}

impl FaceSide {
    pub const ALL: [FaceSide; 6] = [
        FaceSide::Top,
        FaceSide::Bottom,
        FaceSide::Left,
        FaceSide::Right,
        FaceSide::Front,
        FaceSide::Back,
    ];

    /// The axis this side lies on.
    pub fn axis(self) -> Axis {
        match self {
            FaceSide::Top | FaceSide::Bottom => Axis::Z,
            FaceSide::Left | FaceSide::Right => Axis::X,
            FaceSide::Front | FaceSide::Back => Axis::Y,
        }
    }

    /// Whether this side is the positive extreme of its axis.
    pub fn is_positive(self) -> bool {
        matches!(self, FaceSide::Top | FaceSide::Right | FaceSide::Back)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FaceSide::Top => "top",
            FaceSide::Bottom => "bottom",
            FaceSide::Left => "left",
            FaceSide::Right => "right",
            FaceSide::Front => "front",
            FaceSide::Back => "back",
        }
    }
}

impl fmt::Display for FaceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaceSide {
    type Err = UnknownFaceSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(FaceSide::Top),
            "bottom" => Ok(FaceSide::Bottom),
            "left" => Ok(FaceSide::Left),
            "right" => Ok(FaceSide::Right),
            "front" => Ok(FaceSide::Front),
            "back" => Ok(FaceSide::Back),
            _ => Err(UnknownFaceSide {
                name: s.to_string(),
            }),
        }
    }
}
