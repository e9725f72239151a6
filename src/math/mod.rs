pub mod polygon_2d;
pub mod polygon_io;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Shortest edge length accepted by [`polygon_2d::prepare`].
pub const TOLERANCE: f64 = 1e-10;
