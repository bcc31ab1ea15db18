//! The Writer: mirrors the Reader, emitting framing, header, and recursive
//! geometry payloads for a requested endianness and compression preference.
//!
//! Shape grounded on `spatialite.rs::encode_to_stream[_with_endianess]`.

use std::io::Write as IoWrite;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::byteops;
use crate::error::SpatialiteError;
use crate::flags;
use crate::model::{Coordinate, Dimension, Geometry, Mbr, Rings};
use crate::ordinates::Ordinates;
use crate::wire::{self, Endian};

#[derive(Debug, Clone, Copy, Default)]
pub struct WriterOptions {
    /// Trims Z and/or M regardless of the input geometry's dimensionality.
    pub ordinates: Ordinates,
}

#[derive(Debug, Clone, Default)]
pub struct Writer {
    options: WriterOptions,
}

impl Writer {
    pub fn new(options: WriterOptions) -> Self {
        Self { options }
    }

    pub fn write(
        &self,
        geometry: &Geometry,
        endian: Endian,
        compressed: bool,
    ) -> Result<Vec<u8>, SpatialiteError> {
        match endian {
            Endian::Big => self.write_with_endian::<BigEndian>(geometry, endian, compressed),
            Endian::Little => {
                self.write_with_endian::<LittleEndian>(geometry, endian, compressed)
            }
        }
    }

    pub fn write_to_stream<W: IoWrite>(
        &self,
        geometry: &Geometry,
        endian: Endian,
        compressed: bool,
        out: &mut W,
    ) -> Result<(), SpatialiteError> {
        let bytes = self.write(geometry, endian, compressed)?;
        out.write_all(&bytes)?;
        Ok(())
    }

    fn write_with_endian<E: ByteOrder>(
        &self,
        geometry: &Geometry,
        endian: Endian,
        compressed: bool,
    ) -> Result<Vec<u8>, SpatialiteError> {
        let mut out = Vec::with_capacity(64);
        out.push(wire::START);
        out.push(endian.marker());

        byteops::write_i32::<E, _>(&mut out, geometry.srid())?;

        // The writer always recomputes the envelope from the geometry
        // itself (§9) rather than accepting a caller-supplied one.
        let bounds = geometry.bounds().unwrap_or(Mbr {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        });
        byteops::write_f64::<E, _>(&mut out, bounds.min_x)?;
        byteops::write_f64::<E, _>(&mut out, bounds.min_y)?;
        byteops::write_f64::<E, _>(&mut out, bounds.max_x)?;
        byteops::write_f64::<E, _>(&mut out, bounds.max_y)?;
        out.push(wire::MBR);

        self.encode_geometry::<E>(&mut out, geometry, compressed)?;
        out.push(wire::END);
        Ok(out)
    }

    fn effective_dimension(&self, original: Dimension) -> Dimension {
        Dimension::from_flags(
            original.has_z() && self.options.ordinates.z,
            original.has_m() && self.options.ordinates.m,
        )
    }

    /// Writes a child/root's own type code, then its payload. Compression is
    /// silently downgraded to false for base kinds that don't support it
    /// (Point, Multi*, GeometryCollection); `requested_compressed` still
    /// flows down to descendants that might.
    fn encode_geometry<E: ByteOrder>(
        &self,
        out: &mut Vec<u8>,
        geometry: &Geometry,
        requested_compressed: bool,
    ) -> Result<(), SpatialiteError> {
        let dimension = self.effective_dimension(geometry.dimension());
        let base_kind = geometry.base_kind();
        let own_compressed = requested_compressed && flags::supports_compression(base_kind);
        let type_code = flags::encode(base_kind, dimension, own_compressed);
        byteops::write_i32::<E, _>(out, type_code)?;
        self.encode_payload::<E>(out, geometry, dimension, requested_compressed)
    }

    fn encode_payload<E: ByteOrder>(
        &self,
        out: &mut Vec<u8>,
        geometry: &Geometry,
        dimension: Dimension,
        requested_compressed: bool,
    ) -> Result<(), SpatialiteError> {
        match geometry {
            Geometry::Point { coordinate, .. } => {
                self.write_coordinates::<E>(out, std::slice::from_ref(coordinate), dimension, false)
            }
            Geometry::LineString { coordinates, .. } => {
                byteops::write_i32::<E, _>(out, coordinates.len() as i32)?;
                self.write_coordinates::<E>(out, &coordinates.0, dimension, requested_compressed)
            }
            Geometry::Polygon { rings, .. } => {
                self.encode_rings::<E>(out, rings, dimension, requested_compressed)
            }
            Geometry::MultiPoint { points, .. } => {
                byteops::write_i32::<E, _>(out, points.len() as i32)?;
                for point in points {
                    out.push(wire::ENTITY);
                    let type_code = flags::encode(flags::BASE_POINT, dimension, false);
                    byteops::write_i32::<E, _>(out, type_code)?;
                    self.write_coordinates::<E>(out, std::slice::from_ref(point), dimension, false)?;
                }
                Ok(())
            }
            Geometry::MultiLineString { lines, .. } => {
                byteops::write_i32::<E, _>(out, lines.len() as i32)?;
                for line in lines {
                    out.push(wire::ENTITY);
                    let type_code =
                        flags::encode(flags::BASE_LINE_STRING, dimension, requested_compressed);
                    byteops::write_i32::<E, _>(out, type_code)?;
                    byteops::write_i32::<E, _>(out, line.len() as i32)?;
                    self.write_coordinates::<E>(out, &line.0, dimension, requested_compressed)?;
                }
                Ok(())
            }
            Geometry::MultiPolygon { polygons, .. } => {
                byteops::write_i32::<E, _>(out, polygons.len() as i32)?;
                for rings in polygons {
                    out.push(wire::ENTITY);
                    let type_code =
                        flags::encode(flags::BASE_POLYGON, dimension, requested_compressed);
                    byteops::write_i32::<E, _>(out, type_code)?;
                    self.encode_rings::<E>(out, rings, dimension, requested_compressed)?;
                }
                Ok(())
            }
            Geometry::GeometryCollection { geometries, .. } => {
                byteops::write_i32::<E, _>(out, geometries.len() as i32)?;
                for child in geometries {
                    out.push(wire::ENTITY);
                    self.encode_geometry::<E>(out, child, requested_compressed)?;
                }
                Ok(())
            }
        }
    }

    fn encode_rings<E: ByteOrder>(
        &self,
        out: &mut Vec<u8>,
        rings: &Rings,
        dimension: Dimension,
        compressed: bool,
    ) -> Result<(), SpatialiteError> {
        byteops::write_i32::<E, _>(out, (1 + rings.holes.len()) as i32)?;
        byteops::write_i32::<E, _>(out, rings.shell.len() as i32)?;
        self.write_coordinates::<E>(out, &rings.shell.0, dimension, compressed)?;
        for hole in &rings.holes {
            byteops::write_i32::<E, _>(out, hole.len() as i32)?;
            self.write_coordinates::<E>(out, &hole.0, dimension, compressed)?;
        }
        Ok(())
    }

    /// Mirror of the reader's single parameterized coordinate-sequence
    /// decoder: one function covering all six (dimension × compressed)
    /// combinations rather than six near-duplicate bodies.
    fn write_coordinates<E: ByteOrder>(
        &self,
        out: &mut Vec<u8>,
        coords: &[Coordinate],
        dimension: Dimension,
        compressed: bool,
    ) -> Result<(), SpatialiteError> {
        if !compressed {
            for c in coords {
                for ordinate in ordinate_slots(c, dimension) {
                    byteops::write_f64::<E, _>(out, ordinate)?;
                }
            }
            return Ok(());
        }

        match coords.len() {
            0 => Ok(()),
            1 => {
                for ordinate in ordinate_slots(&coords[0], dimension) {
                    byteops::write_f64::<E, _>(out, ordinate)?;
                }
                Ok(())
            }
            n => {
                for ordinate in ordinate_slots(&coords[0], dimension) {
                    byteops::write_f64::<E, _>(out, ordinate)?;
                }
                for i in 1..n - 1 {
                    let prev = ordinate_slots(&coords[i - 1], dimension);
                    let curr = ordinate_slots(&coords[i], dimension);
                    for (p, c) in prev.iter().zip(curr.iter()) {
                        byteops::write_f32::<E, _>(out, (*c - *p) as f32)?;
                    }
                }
                for ordinate in ordinate_slots(&coords[n - 1], dimension) {
                    byteops::write_f64::<E, _>(out, ordinate)?;
                }
                Ok(())
            }
        }
    }
}

/// Flattens a coordinate's ordinates into wire order (x, y, [z], [m]),
/// limited to the slots `dimension` actually carries.
fn ordinate_slots(c: &Coordinate, dimension: Dimension) -> Vec<f64> {
    let mut out = Vec::with_capacity(dimension.width());
    out.push(c.x);
    out.push(c.y);
    if dimension.has_z() {
        out.push(c.z.unwrap_or(0.0));
    }
    if dimension.has_m() {
        out.push(c.m.unwrap_or(0.0));
    }
    out
}
