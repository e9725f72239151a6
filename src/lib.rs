//! Polygonal confinement for fiber simulations.
//!
//! [`math::polygon_2d`] holds the point-location and projection queries on a
//! closed outline. [`space::PolygonSpace`] extrudes the outline into a prism
//! and turns boundary contact into stiffness terms for a
//! [`meca::StiffnessSystem`].

pub mod error;
pub mod math;
pub mod meca;
pub mod space;

pub use error::{ConfineError, GeometryError, ParameterError, Result};
pub use space::{Dim, PolygonSpace, PolygonSpaceConfig, Space};
