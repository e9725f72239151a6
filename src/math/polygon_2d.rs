use super::{Point2, Vector2, TOLERANCE};
use crate::error::GeometryError;

/// Axis-aligned bounds of a vertex list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    /// Smallest x and y over all vertices.
    pub min: Point2,
    /// Largest x and y over all vertices.
    pub max: Point2,
}

/// Unit tangent and length of the edge that starts at a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFrame {
    /// Unit direction toward the next vertex. Zero for a degenerate edge.
    pub dir: Vector2,
    /// Euclidean length of the edge.
    pub len: f64,
}

/// A closed polygon whose per-edge geometry has been precomputed.
///
/// Edge `i` runs from vertex `i` to vertex `(i + 1) % n`, so the last edge
/// closes the loop back to vertex 0.
#[derive(Debug, Clone)]
pub struct PreparedPolygon {
    points: Vec<Point2>,
    frames: Vec<EdgeFrame>,
    counter_clockwise: bool,
}

/// Where a query point lies relative to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Outside,
    Inside,
    Boundary,
}

/// Closest feature of a polygon to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// The closest point lies strictly inside edge `edge`.
    Edge {
        point: Point2,
        /// Outward unit normal of the edge.
        normal: Vector2,
        edge: usize,
    },
    /// The closest point is vertex `vertex`; no normal is defined there.
    Vertex { point: Point2, vertex: usize },
}

impl Projection {
    /// Returns the projected point.
    #[must_use]
    pub fn point(&self) -> Point2 {
        match *self {
            Self::Edge { point, .. } | Self::Vertex { point, .. } => point,
        }
    }

    /// Returns the outward normal, if the projection landed on an edge.
    #[must_use]
    pub fn normal(&self) -> Option<Vector2> {
        match *self {
            Self::Edge { normal, .. } => Some(normal),
            Self::Vertex { .. } => None,
        }
    }

    /// Returns `true` if the projection landed on a vertex.
    #[must_use]
    pub fn is_vertex(&self) -> bool {
        matches!(self, Self::Vertex { .. })
    }
}

/// Iterates over the closing pairs `(items[i], items[(i + 1) % n])`.
pub fn edges<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> + '_ {
    items.iter().zip(items.iter().cycle().skip(1))
}

/// Precomputes edge directions and lengths for a closed polygon.
///
/// # Errors
///
/// Returns [`GeometryError::TooFewVertices`] if fewer than 2 points are given,
/// or [`GeometryError::DegenerateEdge`] if two consecutive points coincide
/// within [`TOLERANCE`].
pub fn prepare(points: Vec<Point2>) -> Result<PreparedPolygon, GeometryError> {
    let mut polygon = PreparedPolygon {
        frames: vec![
            EdgeFrame {
                dir: Vector2::zeros(),
                len: 0.0,
            };
            points.len()
        ],
        points,
        counter_clockwise: true,
    };
    polygon.reprepare()?;
    Ok(polygon)
}

impl PreparedPolygon {
    /// Recomputes the edge frames in place.
    ///
    /// Every frame is refreshed, including degenerate ones, before a failure
    /// is reported. A polygon that failed must not be queried.
    ///
    /// # Errors
    ///
    /// Same conditions as [`prepare`].
    pub fn reprepare(&mut self) -> Result<(), GeometryError> {
        let count = self.points.len();
        if count < 2 {
            return Err(GeometryError::TooFewVertices { count });
        }

        let mut degenerate = None;
        for (index, ((a, b), frame)) in edges(&self.points)
            .zip(self.frames.iter_mut())
            .enumerate()
        {
            let d = b - a;
            let len = d.norm();
            if len < TOLERANCE {
                degenerate.get_or_insert(GeometryError::DegenerateEdge { index, length: len });
                frame.dir = Vector2::zeros();
            } else {
                frame.dir = d / len;
            }
            frame.len = len;
        }

        self.counter_clockwise = signed_area(&self.points) >= 0.0;
        degenerate.map_or(Ok(()), Err)
    }

    /// Returns the vertices in winding order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Returns the frame of every edge, indexed by its start vertex.
    #[must_use]
    pub fn frames(&self) -> &[EdgeFrame] {
        &self.frames
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the vertices wind counter-clockwise.
    #[must_use]
    pub fn is_counter_clockwise(&self) -> bool {
        self.counter_clockwise
    }

    /// Consumes the polygon, returning its vertices.
    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }

    /// Outward normal of an edge with the given unit direction.
    fn outward_normal(&self, dir: &Vector2) -> Vector2 {
        if self.counter_clockwise {
            Vector2::new(dir.y, -dir.x)
        } else {
            Vector2::new(-dir.y, dir.x)
        }
    }
}

/// Computes the axis-aligned bounds of a vertex list.
///
/// Returns `None` for an empty list.
#[must_use]
pub fn bounding_box(points: &[Point2]) -> Option<Bounds2> {
    let (first, rest) = points.split_first()?;
    let mut bounds = Bounds2 {
        min: *first,
        max: *first,
    };
    for p in rest {
        bounds.min.x = bounds.min.x.min(p.x);
        bounds.max.x = bounds.max.x.max(p.x);
        bounds.min.y = bounds.min.y.min(p.y);
        bounds.max.y = bounds.max.y.max(p.y);
    }
    Some(bounds)
}

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise, 0 below 3 vertices.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let sum: f64 = edges(points).map(|(a, b)| a.x * b.y - b.x * a.y).sum();
    sum * 0.5
}

/// Classifies a point by casting a horizontal ray toward `+x` and counting
/// the edges it crosses.
///
/// Works on raw vertices and does not need [`prepare`].
#[must_use]
#[allow(clippy::float_cmp)]
pub fn locate(points: &[Point2], q: &Point2) -> PointLocation {
    let n = points.len();
    let mut crossings = 0usize;

    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];

        // edge entirely above or below the ray
        if (q.y <= p1.y && q.y < p2.y) || (q.y >= p1.y && q.y > p2.y) {
            continue;
        }

        // ray passes through p2
        if q.y == p2.y {
            if p1.y == p2.y {
                if (q.x > p1.x && q.x > p2.x) || (q.x < p1.x && q.x < p2.x) {
                    continue;
                }
                return PointLocation::Boundary;
            }

            if p2.x < q.x {
                continue;
            }
            if q.x == p2.x {
                return PointLocation::Boundary;
            }

            // count p2 only if the outline passes through it vertically.
            // When p3 is on the ray, the run from p2 is horizontal and adds no
            // crossing, so an interior point level with such a run (beside the
            // step of an L) reads as outside.
            let p3 = points[(i + 2) % n];
            if (p1.y < q.y && q.y < p3.y) || (p3.y < q.y && q.y < p1.y) {
                crossings += 1;
            }
            continue;
        }

        if q.x <= p1.x || q.x <= p2.x {
            let xi = (q.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
            if (q.x - xi).abs() < f64::EPSILON {
                return PointLocation::Boundary;
            }
            if q.x < xi {
                crossings += 1;
            }
        }
    }

    if crossings % 2 == 0 {
        PointLocation::Outside
    } else {
        PointLocation::Inside
    }
}

/// Returns `true` if the point is inside, `boundary` if it lies on the outline.
#[must_use]
pub fn inside(points: &[Point2], q: &Point2, boundary: bool) -> bool {
    match locate(points, q) {
        PointLocation::Inside => true,
        PointLocation::Outside => false,
        PointLocation::Boundary => boundary,
    }
}

/// Finds the point of the outline closest to `q`.
///
/// All edges are visited: on a non-convex polygon the nearest feature cannot
/// be decided locally.
#[must_use]
pub fn project(polygon: &PreparedPolygon, q: &Point2) -> Projection {
    let origin = polygon.points[0];
    let mut best = Projection::Vertex {
        point: origin,
        vertex: 0,
    };
    let mut best_dist = (q - origin).norm_squared();

    for (index, (p, frame)) in polygon.points.iter().zip(&polygon.frames).enumerate() {
        let offset = q - p;
        let d = offset.norm_squared();
        // abscissa of q along the edge
        let a = frame.dir.dot(&offset);

        if a > 0.0 {
            if a < frame.len {
                let da = d - a * a;
                if da < best_dist {
                    best_dist = da;
                    best = Projection::Edge {
                        point: p + frame.dir * a,
                        normal: polygon.outward_normal(&frame.dir),
                        edge: index,
                    };
                }
            }
        } else if d < best_dist {
            best_dist = d;
            best = Projection::Vertex {
                point: *p,
                vertex: index,
            };
        }
    }

    best
}
