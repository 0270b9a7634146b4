//! Geographic coordinate type and conversions to `geo-types`.
//!
//! Node positions are stored as `GeoPoint` (longitude/latitude, `f64`).  Road
//! and route geometries use `geo_types::LineString` / `MultiLineString` so
//! they can be written as WKT without an intermediate representation.

use geo_types::{Coord, LineString};

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Straight two-point segment from `self` to `other`.
    ///
    /// Used as the route geometry of a road that carries no geometry of its
    /// own.
    pub fn segment_to(self, other: GeoPoint) -> LineString<f64> {
        LineString::new(vec![self.into(), other.into()])
    }
}

impl From<GeoPoint> for Coord<f64> {
    #[inline]
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}

impl From<Coord<f64>> for GeoPoint {
    #[inline]
    fn from(c: Coord<f64>) -> Self {
        GeoPoint::new(c.x, c.y)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}
