//! The concrete host geometry model.
//!
//! This crate does not expose a pluggable geometry trait hierarchy. Every
//! repository in the reference corpus settles on one closed, owned
//! `Geometry` enum, and this crate follows that idiom rather than inventing
//! a generic `Geometry<S>` abstraction the format itself does not need.

use std::fmt;

/// Which ordinates a coordinate carries. `Xy` is the floor every other
/// variant extends; SpatiaLite never encodes Z or M alone without X/Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Xy,
    Xyz,
    Xym,
    Xyzm,
}

impl Dimension {
    pub fn has_z(self) -> bool {
        matches!(self, Dimension::Xyz | Dimension::Xyzm)
    }

    pub fn has_m(self) -> bool {
        matches!(self, Dimension::Xym | Dimension::Xyzm)
    }

    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Dimension::Xy,
            (true, false) => Dimension::Xyz,
            (false, true) => Dimension::Xym,
            (true, true) => Dimension::Xyzm,
        }
    }

    /// Number of f64/f32 ordinates a single vertex occupies on the wire.
    pub fn width(self) -> usize {
        match self {
            Dimension::Xy => 2,
            Dimension::Xyz | Dimension::Xym => 3,
            Dimension::Xyzm => 4,
        }
    }
}

/// A single vertex. `z`/`m` are `None` when `Dimension` doesn't carry them,
/// including when a reader's [`crate::ordinates::Ordinates`] mask discarded
/// an ordinate that was present on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coordinate {
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }
}

/// An ordered list of vertices: a LineString body or a single ring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinateSequence(pub Vec<Coordinate>);

impl CoordinateSequence {
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self(coordinates)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.0.iter()
    }

    /// Closes an unclosed ring by appending a copy of the first vertex.
    /// A no-op if the sequence is empty or already closed. Mirrors the
    /// ring-closing helper every polygon constructor in the corpus carries.
    pub fn close_ring(&mut self) {
        let (Some(&first), Some(&last)) = (self.0.first(), self.0.last()) else {
            return;
        };
        if first.x != last.x || first.y != last.y || first.z != last.z || first.m != last.m {
            self.0.push(first);
        }
    }

    pub fn bounds(&self) -> Option<Mbr> {
        let mut iter = self.0.iter();
        let first = iter.next()?;
        let mut mbr = Mbr {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for c in iter {
            mbr.min_x = mbr.min_x.min(c.x);
            mbr.min_y = mbr.min_y.min(c.y);
            mbr.max_x = mbr.max_x.max(c.x);
            mbr.max_y = mbr.max_y.max(c.y);
        }
        Some(mbr)
    }
}

/// Axis-aligned minimum bounding rectangle, as stored in the BLOB header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mbr {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Mbr {
    fn merge(self, other: Mbr) -> Mbr {
        Mbr {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// A polygon ring set: one shell followed by zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Rings {
    pub shell: CoordinateSequence,
    pub holes: Vec<CoordinateSequence>,
}

impl Rings {
    fn bounds(&self) -> Option<Mbr> {
        self.shell.bounds()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point {
        srid: i32,
        dimension: Dimension,
        coordinate: Coordinate,
    },
    LineString {
        srid: i32,
        dimension: Dimension,
        coordinates: CoordinateSequence,
    },
    Polygon {
        srid: i32,
        dimension: Dimension,
        rings: Rings,
    },
    MultiPoint {
        srid: i32,
        dimension: Dimension,
        points: Vec<Coordinate>,
    },
    MultiLineString {
        srid: i32,
        dimension: Dimension,
        lines: Vec<CoordinateSequence>,
    },
    MultiPolygon {
        srid: i32,
        dimension: Dimension,
        polygons: Vec<Rings>,
    },
    GeometryCollection {
        srid: i32,
        dimension: Dimension,
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    pub fn srid(&self) -> i32 {
        match self {
            Geometry::Point { srid, .. }
            | Geometry::LineString { srid, .. }
            | Geometry::Polygon { srid, .. }
            | Geometry::MultiPoint { srid, .. }
            | Geometry::MultiLineString { srid, .. }
            | Geometry::MultiPolygon { srid, .. }
            | Geometry::GeometryCollection { srid, .. } => *srid,
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Geometry::Point { dimension, .. }
            | Geometry::LineString { dimension, .. }
            | Geometry::Polygon { dimension, .. }
            | Geometry::MultiPoint { dimension, .. }
            | Geometry::MultiLineString { dimension, .. }
            | Geometry::MultiPolygon { dimension, .. }
            | Geometry::GeometryCollection { dimension, .. } => *dimension,
        }
    }

    pub fn base_kind(&self) -> u32 {
        match self {
            Geometry::Point { .. } => crate::flags::BASE_POINT,
            Geometry::LineString { .. } => crate::flags::BASE_LINE_STRING,
            Geometry::Polygon { .. } => crate::flags::BASE_POLYGON,
            Geometry::MultiPoint { .. } => crate::flags::BASE_MULTI_POINT,
            Geometry::MultiLineString { .. } => crate::flags::BASE_MULTI_LINE_STRING,
            Geometry::MultiPolygon { .. } => crate::flags::BASE_MULTI_POLYGON,
            Geometry::GeometryCollection { .. } => crate::flags::BASE_GEOMETRY_COLLECTION,
        }
    }

    /// Recomputes the envelope from the geometry's own coordinates. The
    /// reader never trusts the wire's stored MBR; the writer always calls
    /// this rather than carrying forward a caller-supplied value.
    pub fn bounds(&self) -> Option<Mbr> {
        match self {
            Geometry::Point { coordinate, .. } => Some(Mbr {
                min_x: coordinate.x,
                min_y: coordinate.y,
                max_x: coordinate.x,
                max_y: coordinate.y,
            }),
            Geometry::LineString { coordinates, .. } => coordinates.bounds(),
            Geometry::Polygon { rings, .. } => rings.bounds(),
            Geometry::MultiPoint { points, .. } => {
                let mut iter = points.iter();
                let first = iter.next()?;
                let mut mbr = Mbr {
                    min_x: first.x,
                    min_y: first.y,
                    max_x: first.x,
                    max_y: first.y,
                };
                for c in iter {
                    mbr.min_x = mbr.min_x.min(c.x);
                    mbr.min_y = mbr.min_y.min(c.y);
                    mbr.max_x = mbr.max_x.max(c.x);
                    mbr.max_y = mbr.max_y.max(c.y);
                }
                Some(mbr)
            }
            Geometry::MultiLineString { lines, .. } => {
                lines.iter().filter_map(|l| l.bounds()).reduce(Mbr::merge)
            }
            Geometry::MultiPolygon { polygons, .. } => polygons
                .iter()
                .filter_map(Rings::bounds)
                .reduce(Mbr::merge),
            Geometry::GeometryCollection { geometries, .. } => geometries
                .iter()
                .filter_map(Geometry::bounds)
                .reduce(Mbr::merge),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dimension::Xy => "XY",
            Dimension::Xyz => "XYZ",
            Dimension::Xym => "XYM",
            Dimension::Xyzm => "XYZM",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_round_trips_through_flags() {
        for (z, m) in [(false, false), (true, false), (false, true), (true, true)] {
            let d = Dimension::from_flags(z, m);
            assert_eq!(d.has_z(), z);
            assert_eq!(d.has_m(), m);
        }
    }

    #[test]
    fn close_ring_appends_first_when_open() {
        let mut seq = CoordinateSequence::new(vec![
            Coordinate::xy(0.0, 0.0),
            Coordinate::xy(1.0, 0.0),
            Coordinate::xy(1.0, 1.0),
        ]);
        seq.close_ring();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.0.first(), seq.0.last());
    }

    #[test]
    fn close_ring_is_noop_when_already_closed() {
        let mut seq = CoordinateSequence::new(vec![
            Coordinate::xy(0.0, 0.0),
            Coordinate::xy(1.0, 0.0),
            Coordinate::xy(0.0, 0.0),
        ]);
        seq.close_ring();
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn point_bounds_is_degenerate() {
        let g = Geometry::Point {
            srid: 4326,
            dimension: Dimension::Xy,
            coordinate: Coordinate::xy(1.0, 2.0),
        };
        let mbr = g.bounds().unwrap();
        assert_eq!(mbr.min_x, 1.0);
        assert_eq!(mbr.max_x, 1.0);
    }
}
