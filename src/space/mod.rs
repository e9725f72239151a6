mod config;
mod polygon;

pub use config::PolygonSpaceConfig;
pub use polygon::PolygonSpace;

use crate::error::{GeometryError, ParameterError, Result};
use crate::math::{Point3, Vector3};
use crate::meca::{PointIndex, StiffnessSystem};

/// Number of spatial dimensions a space is simulated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    One,
    Two,
    Three,
}

impl Dim {
    /// Returns the number of coordinates per point.
    #[must_use]
    pub fn count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<usize> for Dim {
    type Error = ParameterError;

    fn try_from(value: usize) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(ParameterError::UnsupportedDimension(other)),
        }
    }
}

/// A region of space that confines simulated points.
///
/// Coordinates beyond [`Space::dim`] are carried through unchanged.
pub trait Space {
    /// Returns the dimensionality of the simulation.
    fn dim(&self) -> Dim;

    /// Returns the enclosed volume (area in 2D).
    fn volume(&self) -> f64;

    /// Returns the half-extent of the space along each axis.
    fn extension(&self) -> Vector3;

    /// Returns `true` if the point is inside. Points on the edge count as inside.
    fn inside(&self, point: &Point3) -> bool;

    /// Returns the closest point on the edge of the space.
    fn project(&self, point: &Point3) -> Point3;

    /// Adds a Hookean force pulling `pos` back onto the edge of the space.
    fn set_interaction(
        &self,
        pos: &Point3,
        point: PointIndex,
        system: &mut dyn StiffnessSystem,
        stiffness: f64,
    );

    /// Same as [`Space::set_interaction`], for a point of radius `radius`.
    fn set_interaction_with_radius(
        &self,
        pos: &Point3,
        point: PointIndex,
        radius: f64,
        system: &mut dyn StiffnessSystem,
        stiffness: f64,
    );

    /// Returns `true` if the point is strictly outside.
    fn outside(&self, point: &Point3) -> bool {
        !self.inside(point)
    }

    /// Squared distance from the point to the edge of the space.
    fn distance_to_edge_sqr(&self, point: &Point3) -> f64 {
        (point - self.project(point)).norm_squared()
    }

    /// Distance from the point to the edge of the space.
    fn distance_to_edge(&self, point: &Point3) -> f64 {
        self.distance_to_edge_sqr(point).sqrt()
    }

    /// Distance to the edge, negative inside and positive outside.
    fn signed_distance_to_edge(&self, point: &Point3) -> f64 {
        if self.inside(point) {
            -self.distance_to_edge(point)
        } else {
            self.distance_to_edge(point)
        }
    }

    /// Returns `true` if a ball of the given radius lies entirely inside.
    fn all_inside(&self, center: &Point3, radius: f64) -> bool {
        debug_assert!(radius > 0.0);
        self.inside(center) && self.distance_to_edge_sqr(center) >= radius * radius
    }

    /// Returns `true` if a ball of the given radius lies entirely outside.
    ///
    /// This is not the complement of [`Space::all_inside`]: a ball straddling
    /// the edge is neither.
    fn all_outside(&self, center: &Point3, radius: f64) -> bool {
        debug_assert!(radius > 0.0);
        !self.inside(center) && self.distance_to_edge_sqr(center) >= radius * radius
    }

    /// Projects onto the surface obtained by shrinking the space by `radius`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidRadius`] for a negative radius and
    /// [`GeometryError::PointOnEdge`] if the point is exactly on the edge.
    fn project_with_radius(&self, point: &Point3, radius: f64) -> Result<Point3> {
        if radius < 0.0 {
            return Err(ParameterError::InvalidRadius(radius).into());
        }
        let proj = self.project(point);
        let offset = point - proj;
        let n = offset.norm_squared();
        if n <= 0.0 {
            return Err(GeometryError::PointOnEdge.into());
        }
        let signed = if self.inside(point) { radius } else { -radius };
        let scale = signed / n.sqrt();
        Ok(proj + offset * scale)
    }

    /// Reflects a point through the edge until it falls inside.
    ///
    /// Gives up after 50 reflections and returns the projection instead.
    fn bounce(&self, point: &Point3) -> Point3 {
        let mut w = *point;
        for _ in 0..50 {
            let proj = self.project(&w);
            w = proj + (proj - w);
            if self.inside(&w) {
                return w;
            }
        }
        self.project(&w)
    }
}
