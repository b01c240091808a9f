//! Tangent Frame - Local Cartesian Geometry over a Geographic Datum
//!
//! This library provides the geometric primitives used by field-boundary tooling:
//! a small set of shapes expressed in a flat East-North-Up (ENU) frame, plus the
//! conversions between WGS84 geographic coordinates and that frame.
//!
//! # Architecture
//!
//! - **[`Datum`]**: the geographic reference point anchoring the local frame
//! - **[`Wgs`] / [`Enu`]**: coordinate value types with bidirectional conversion
//! - **[`Point`], [`Line`], [`Path`], [`Polygon`]**: the four supported shapes,
//!   always stored in local (ENU) coordinates
//!
//! The projection is a local tangent-plane approximation scaled by the WGS84
//! ellipsoid radii of curvature at the datum. It is accurate for field-scale
//! extents (a few kilometers) and is an exact algebraic inverse of itself, so
//! converting a point to geographic coordinates and back does not drift.

mod frame;
mod shapes;

pub use frame::{Datum, Enu, Euler, Wgs};
pub use shapes::{Line, Path, Point, Polygon};
