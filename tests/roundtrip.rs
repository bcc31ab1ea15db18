//! Scenario-level coverage of the SpatiaLite BLOB format: the six concrete
//! little-endian, SRID-4326 layouts, plus the cross-cutting invariants that
//! don't belong inside any single module's unit tests.

use spatialite_geom::model::{Coordinate, CoordinateSequence, Dimension, Geometry, Rings};
use spatialite_geom::reader::{Reader, ReaderOptions};
use spatialite_geom::wire::Endian;
use spatialite_geom::writer::{Writer, WriterOptions};

fn reader() -> Reader {
    let _ = env_logger::builder().is_test(true).try_init();
    Reader::new(ReaderOptions::default())
}

fn writer() -> Writer {
    Writer::new(WriterOptions::default())
}

#[test]
fn scenario_point_has_the_documented_byte_prefix() {
    let geometry = Geometry::Point {
        srid: 4326,
        dimension: Dimension::Xy,
        coordinate: Coordinate::xy(1.0, 2.0),
    };
    let bytes = writer().write(&geometry, Endian::Little, false).unwrap();

    assert_eq!(bytes[0], 0x00); // START
    assert_eq!(bytes[1], 0x01); // little endian
    assert_eq!(&bytes[2..6], &4326i32.to_le_bytes()); // SRID
    assert_eq!(bytes[38], 0x7C); // MBR marker
    assert_eq!(&bytes[39..43], &1i32.to_le_bytes()); // root type: Point
    assert_eq!(*bytes.last().unwrap(), 0xFE); // END

    let decoded = reader().read(&bytes).unwrap().unwrap();
    assert_eq!(decoded, geometry);
}

#[test]
fn scenario_linestring_uncompressed() {
    let coords = vec![
        Coordinate::xy(0.0, 0.0),
        Coordinate::xy(1.0, 1.0),
        Coordinate::xy(2.0, 2.0),
    ];
    let geometry = Geometry::LineString {
        srid: 4326,
        dimension: Dimension::Xy,
        coordinates: CoordinateSequence::new(coords),
    };
    let bytes = writer().write(&geometry, Endian::Little, false).unwrap();
    assert_eq!(&bytes[39..43], &2i32.to_le_bytes());
    assert_eq!(reader().read(&bytes).unwrap().unwrap(), geometry);
}

#[test]
fn scenario_linestring_compressed_has_two_f32_deltas() {
    let coords = vec![
        Coordinate::xy(0.0, 0.0),
        Coordinate::xy(1.0, 1.0),
        Coordinate::xy(2.0, 2.0),
    ];
    let geometry = Geometry::LineString {
        srid: 4326,
        dimension: Dimension::Xy,
        coordinates: CoordinateSequence::new(coords),
    };
    let bytes = writer().write(&geometry, Endian::Little, true).unwrap();
    assert_eq!(&bytes[39..43], &1_000_002i32.to_le_bytes());
    // payload: count(4) + first(16) + 1 interior vertex (2*f32=8) + last(16)
    let decoded = reader().read(&bytes).unwrap().unwrap();
    assert_eq!(decoded, geometry);
}

#[test]
fn scenario_polygon_shell_and_hole() {
    let shell = CoordinateSequence::new(vec![
        Coordinate::xy(0.0, 0.0),
        Coordinate::xy(10.0, 0.0),
        Coordinate::xy(10.0, 10.0),
        Coordinate::xy(0.0, 10.0),
        Coordinate::xy(0.0, 0.0),
    ]);
    let hole = CoordinateSequence::new(vec![
        Coordinate::xy(2.0, 2.0),
        Coordinate::xy(4.0, 2.0),
        Coordinate::xy(4.0, 4.0),
        Coordinate::xy(2.0, 4.0),
        Coordinate::xy(2.0, 2.0),
    ]);
    let geometry = Geometry::Polygon {
        srid: 4326,
        dimension: Dimension::Xy,
        rings: Rings {
            shell,
            holes: vec![hole],
        },
    };
    let bytes = writer().write(&geometry, Endian::Little, false).unwrap();
    assert_eq!(&bytes[39..43], &3i32.to_le_bytes());
    assert_eq!(reader().read(&bytes).unwrap().unwrap(), geometry);
}

#[test]
fn scenario_multipoint_two_children() {
    let geometry = Geometry::MultiPoint {
        srid: 4326,
        dimension: Dimension::Xy,
        points: vec![Coordinate::xy(1.0, 1.0), Coordinate::xy(2.0, 2.0)],
    };
    let bytes = writer().write(&geometry, Endian::Little, false).unwrap();
    assert_eq!(&bytes[39..43], &4i32.to_le_bytes());
    assert_eq!(reader().read(&bytes).unwrap().unwrap(), geometry);
}

#[test]
fn scenario_geometry_collection_point_and_linestring() {
    let geometry = Geometry::GeometryCollection {
        srid: 4326,
        dimension: Dimension::Xy,
        geometries: vec![
            Geometry::Point {
                srid: 4326,
                dimension: Dimension::Xy,
                coordinate: Coordinate::xy(1.0, 1.0),
            },
            Geometry::LineString {
                srid: 4326,
                dimension: Dimension::Xyz,
                coordinates: CoordinateSequence::new(vec![
                    Coordinate {
                        x: 0.0,
                        y: 0.0,
                        z: Some(5.0),
                        m: None,
                    },
                    Coordinate {
                        x: 1.0,
                        y: 1.0,
                        z: Some(6.0),
                        m: None,
                    },
                ]),
            },
        ],
    };
    let bytes = writer().write(&geometry, Endian::Little, false).unwrap();
    assert_eq!(&bytes[39..43], &7i32.to_le_bytes());
    assert_eq!(reader().read(&bytes).unwrap().unwrap(), geometry);
}

#[test]
fn endian_roundtrip_equivalence_across_kinds() {
    let geometry = Geometry::MultiLineString {
        srid: 4326,
        dimension: Dimension::Xym,
        lines: vec![CoordinateSequence::new(vec![
            Coordinate {
                x: 0.0,
                y: 0.0,
                z: None,
                m: Some(1.0),
            },
            Coordinate {
                x: 1.0,
                y: 1.0,
                z: None,
                m: Some(2.0),
            },
        ])],
    };
    let big = writer().write(&geometry, Endian::Big, false).unwrap();
    let little = writer().write(&geometry, Endian::Little, false).unwrap();
    let from_big = reader().read(&big).unwrap().unwrap();
    let from_little = reader().read(&little).unwrap().unwrap();
    assert_eq!(from_big, from_little);
}

#[test]
fn missing_entity_marker_is_a_hard_error() {
    let geometry = Geometry::MultiPoint {
        srid: 4326,
        dimension: Dimension::Xy,
        points: vec![Coordinate::xy(1.0, 1.0)],
    };
    let mut bytes = writer().write(&geometry, Endian::Little, false).unwrap();
    // Offset 43 is the count; offset 47 is the entity marker of the first child.
    bytes[47] = 0xAB;
    let err = reader().read(&bytes).unwrap_err();
    assert!(matches!(
        err,
        spatialite_geom::error::SpatialiteError::MissingEntityMarker { .. }
    ));
}
