//! Fluent semantic-modeling layer over a pluggable B-rep kernel.
//!
//! The layer adds no geometry of its own. It implements the query, selection,
//! tagging and relative-placement protocol on top of kernel primitives: typed
//! selectors over faces/edges/vertices with filter/sort/tag combinators,
//! bounding-box alignment with face and offset semantics ("on top of",
//! "left of"), and named registries that accumulate parts into composites
//! while keeping pre-union sub-parts retrievable.
//!
//! A session starts from a [`Workbench`], which owns the kernel and hands out
//! [`Entity`] values; everything else chains from there:
//!
//! ```
//! use ignis_model::Workbench;
//!
//! let wb = Workbench::mock();
//! let base = wb.cuboid(10.0, 10.0, 10.0)?.named("base");
//! let lid = wb.cuboid(10.0, 10.0, 2.0)?.named("lid").on_top_of(&base, 0.0)?;
//!
//! let model = wb.model("case").push(base)?.push(lid)?;
//! let part = model.find("lid")?;
//! assert_eq!(part.bbox().min[2], 5.0);
//! # Ok::<(), ignis_model::ModelError>(())
//! ```

pub mod align;
pub mod entity;
pub mod error;
pub mod registry;
pub mod selector;
pub mod workbench;

mod validate;

pub use align::alignment_delta;
pub use entity::{Entity, SharedKernel, TagMap};
pub use error::ModelError;
pub use registry::{Group, Model};
pub use selector::{
    EdgeRef, EdgeSelector, FaceRef, FaceSelector, FilterBy, Selector, SolidRef, SolidSelector,
    SortBy, TaggedElement, TopoItem, VertexRef, VertexSelector,
};
pub use workbench::{IsoFit, Workbench};

pub use ignis_types::{Axis, BoundingBox, FaceSide, TOLERANCE};
