use std::fs::File;
use std::io::{BufReader, Seek, Write};

use super::{Dim, PolygonSpaceConfig, Space};
use crate::error::{ParameterError, Result};
use crate::math::polygon_2d::{self, PreparedPolygon, Projection};
use crate::math::polygon_io;
use crate::math::{Point2, Point3, Vector3};
use crate::meca::{PointIndex, StiffnessSystem};

/// A polygonal region read from a file.
///
/// In 3D the polygon is the cross-section of a generalized cylinder of axis Z
/// that spans `[-height, height]`. Works best for convex polygons: fibers can
/// still cut through re-entrant corners, since only their points are tested.
#[derive(Debug, Clone)]
pub struct PolygonSpace {
    polygon: PreparedPolygon,
    dim: Dim,
    height: f64,
    extension: Vector3,
    volume: f64,
}

/// Nearest boundary feature of the extruded polygon.
enum Contact {
    /// A cap at height `z`. `wall` is set when the point is also outside in XY.
    Cap { z: f64, wall: Option<Projection> },
    Wall(Projection),
}

impl PolygonSpace {
    /// Builds the space from the vertex file named in `config`.
    ///
    /// The file is read twice: once to count the points, then to fill a
    /// buffer of exactly that size.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if the dimension is below 2, the file
    /// cannot be opened, fewer than 3 points are found, the height is invalid,
    /// or consecutive points overlap.
    pub fn new(config: &PolygonSpaceConfig) -> Result<Self> {
        check_dim(config.dim)?;

        let file = File::open(&config.file).map_err(|source| ParameterError::FileNotFound {
            path: config.file.clone(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let count = polygon_io::read_into(&mut reader, &mut [])?.points;
        if count < 3 {
            return Err(ParameterError::TooFewPoints {
                origin: format!("`{}'", config.file.display()),
                count,
            }
            .into());
        }

        let mut points = vec![Point2::origin(); count];
        reader.rewind()?;
        polygon_io::read_into(&mut reader, &mut points)?;

        Self::build(points, config.height, config.dim)
    }

    /// Builds the space from an in-memory vertex list.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PolygonSpace::new`], minus the file access.
    pub fn from_points(points: Vec<Point2>, height: f64, dim: Dim) -> Result<Self> {
        check_dim(dim)?;
        if points.len() < 3 {
            return Err(ParameterError::TooFewPoints {
                origin: "point list".into(),
                count: points.len(),
            }
            .into());
        }
        Self::build(points, height, dim)
    }

    fn build(points: Vec<Point2>, height: f64, dim: Dim) -> Result<Self> {
        check_height(height, dim)?;
        let polygon = polygon_2d::prepare(points).map_err(ParameterError::UnfitPolygon)?;
        let mut space = Self {
            polygon,
            dim,
            height,
            extension: Vector3::zeros(),
            volume: 0.0,
        };
        space.update_cache();
        Ok(space)
    }

    /// Recomputes edge geometry, bounding box and volume.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::UnfitPolygon`] if consecutive points overlap.
    /// The space must not be used after a failure.
    pub fn resize(&mut self) -> Result<()> {
        self.polygon
            .reprepare()
            .map_err(ParameterError::UnfitPolygon)?;
        self.update_cache();
        Ok(())
    }

    /// Changes the half-height of the extrusion and resizes.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidHeight`] for a height the dimension
    /// cannot use, or any error of [`PolygonSpace::resize`].
    pub fn set_height(&mut self, height: f64) -> Result<()> {
        check_height(height, self.dim)?;
        self.height = height;
        self.resize()
    }

    fn update_cache(&mut self) {
        let points = self.polygon.points();
        if let Some(bounds) = polygon_2d::bounding_box(points) {
            let x = (-bounds.min.x).max(bounds.max.x);
            let y = (-bounds.min.y).max(bounds.max.y);
            self.extension = Vector3::new(x, y, self.height);
        }

        let surface = polygon_2d::signed_area(points).abs();
        self.volume = match self.dim {
            Dim::Three => surface * 2.0 * self.height,
            Dim::One | Dim::Two => surface,
        };
        tracing::debug!(surface, volume = self.volume, "polygon resized");
    }

    /// Returns the vertices of the polygon.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        self.polygon.points()
    }

    /// Returns the prepared polygon.
    #[must_use]
    pub fn polygon(&self) -> &PreparedPolygon {
        &self.polygon
    }

    /// Returns half of the extrusion length along Z.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Writes the polygon vertices, one per line.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the writer.
    pub fn write_outline<W: Write>(&self, writer: W) -> std::io::Result<()> {
        polygon_io::write(writer, self.polygon.points())
    }

    fn inside_xy(&self, xy: &Point2) -> bool {
        polygon_2d::inside(self.polygon.points(), xy, true)
    }

    /// Finds the nearest boundary feature: a side wall, a cap, or both when
    /// the point is beyond a cap and outside the polygon.
    fn contact(&self, pos: &Point3) -> Contact {
        let xy = Point2::new(pos.x, pos.y);
        let proj = polygon_2d::project(&self.polygon, &xy);
        if self.dim != Dim::Three {
            return Contact::Wall(proj);
        }

        let h = self.height;
        if pos.z >= h || pos.z <= -h {
            let z = if pos.z > 0.0 { h } else { -h };
            let wall = (!self.inside_xy(&xy)).then_some(proj);
            return Contact::Cap { z, wall };
        }

        // inside along Z: compare the distance to the caps and to the sides
        let vdis = h - pos.z.abs();
        let hdis = (xy - proj.point()).norm_squared();
        if vdis * vdis < hdis && self.inside_xy(&xy) {
            let z = if pos.z >= 0.0 { h } else { -h };
            return Contact::Cap { z, wall: None };
        }
        Contact::Wall(proj)
    }
}

fn check_dim(dim: Dim) -> std::result::Result<(), ParameterError> {
    match dim {
        Dim::One => Err(ParameterError::UnsupportedDimension(1)),
        Dim::Two | Dim::Three => Ok(()),
    }
}

fn check_height(height: f64, dim: Dim) -> std::result::Result<(), ParameterError> {
    let valid = match dim {
        Dim::Three => height.is_finite() && height > 0.0,
        Dim::One | Dim::Two => height.is_finite() && height >= 0.0,
    };
    if valid {
        Ok(())
    } else {
        Err(ParameterError::InvalidHeight(height))
    }
}

impl Space for PolygonSpace {
    fn dim(&self) -> Dim {
        self.dim
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn extension(&self) -> Vector3 {
        self.extension
    }

    fn inside(&self, point: &Point3) -> bool {
        if self.dim == Dim::Three && (point.z < -self.height || point.z > self.height) {
            return false;
        }
        self.inside_xy(&Point2::new(point.x, point.y))
    }

    fn project(&self, point: &Point3) -> Point3 {
        if self.dim == Dim::One {
            return *point;
        }
        match self.contact(point) {
            Contact::Cap { z, wall: None } => Point3::new(point.x, point.y, z),
            Contact::Cap { z, wall: Some(wall) } => {
                let q = wall.point();
                Point3::new(q.x, q.y, z)
            }
            Contact::Wall(wall) => {
                let q = wall.point();
                Point3::new(q.x, q.y, point.z)
            }
        }
    }

    /// Tests the points of fibers against the edges of the polygon. On a
    /// non-convex polygon the re-entrant corners can still cross a fiber
    /// between two of its points.
    fn set_interaction(
        &self,
        pos: &Point3,
        point: PointIndex,
        system: &mut dyn StiffnessSystem,
        stiffness: f64,
    ) {
        let stride = self.dim.count();
        if stride < 2 {
            return;
        }
        let ix = point.axis(stride, 0);
        let iy = point.axis(stride, 1);

        let wall = match self.contact(pos) {
            Contact::Cap { z, wall } => {
                let iz = point.axis(stride, 2);
                system.add_diagonal(iz, -stiffness);
                system.add_bias(iz, stiffness * z);
                match wall {
                    Some(wall) => wall,
                    None => return,
                }
            }
            Contact::Wall(wall) => wall,
        };

        match wall {
            Projection::Edge {
                point: proj,
                normal: n,
                ..
            } => {
                // confine along the normal only, free to slide along the edge
                let pr = proj.coords.dot(&n) * stiffness;
                system.add_diagonal(ix, -n.x * n.x * stiffness);
                system.add_off_diagonal(ix, iy, -n.x * n.y * stiffness);
                system.add_diagonal(iy, -n.y * n.y * stiffness);
                system.add_bias(ix, n.x * pr);
                system.add_bias(iy, n.y * pr);
            }
            Projection::Vertex { point: proj, .. } => {
                system.add_diagonal(ix, -stiffness);
                system.add_diagonal(iy, -stiffness);
                system.add_bias(ix, stiffness * proj.x);
                system.add_bias(iy, stiffness * proj.y);
            }
        }
    }

    fn set_interaction_with_radius(
        &self,
        pos: &Point3,
        point: PointIndex,
        radius: f64,
        system: &mut dyn StiffnessSystem,
        stiffness: f64,
    ) {
        // TODO: offset the contact by `radius` along the wall normal
        tracing::warn!(radius, "polygon interaction ignores the radius");
        self.set_interaction(pos, point, system, stiffness);
    }
}
