//! Endian-adaptive primitive reads/writes over a running byte cursor.
//!
//! Built directly on `byteorder`'s `ReadBytesExt`/`WriteBytesExt`, exactly as
//! the teacher's `spatialite.rs` does inside its `encode_spatialite`/
//! `decode_spatialite` associated functions, generalized into standalone
//! functions. `byteorder` swaps per element by construction, so a
//! slab-reverse bug (§9) cannot arise from routing every multi-value read
//! through it.

use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

pub fn read_i32<E: ByteOrder, R: Read>(r: &mut R) -> io::Result<i32> {
    r.read_i32::<E>()
}

pub fn read_f32<E: ByteOrder, R: Read>(r: &mut R) -> io::Result<f32> {
    r.read_f32::<E>()
}

pub fn read_f64<E: ByteOrder, R: Read>(r: &mut R) -> io::Result<f64> {
    r.read_f64::<E>()
}

pub fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    r.read_u8()
}

/// Reads `count` contiguous f64 values. Each value is byte-swapped
/// independently, never the whole run at once.
pub fn read_f64_vec<E: ByteOrder, R: Read>(r: &mut R, count: usize) -> io::Result<Vec<f64>> {
    let mut out = vec![0.0f64; count];
    r.read_f64_into::<E>(&mut out)?;
    Ok(out)
}

/// Reads `count` contiguous f32 values, per-element swapped.
pub fn read_f32_vec<E: ByteOrder, R: Read>(r: &mut R, count: usize) -> io::Result<Vec<f32>> {
    let mut out = vec![0.0f32; count];
    r.read_f32_into::<E>(&mut out)?;
    Ok(out)
}

pub fn write_u8<W: Write>(w: &mut W, value: u8) -> io::Result<()> {
    w.write_u8(value)
}

pub fn write_i32<E: ByteOrder, W: Write>(w: &mut W, value: i32) -> io::Result<()> {
    w.write_i32::<E>(value)
}

pub fn write_f32<E: ByteOrder, W: Write>(w: &mut W, value: f32) -> io::Result<()> {
    w.write_f32::<E>(value)
}

pub fn write_f64<E: ByteOrder, W: Write>(w: &mut W, value: f64) -> io::Result<()> {
    w.write_f64::<E>(value)
}

pub fn write_f64_vec<E: ByteOrder, W: Write>(w: &mut W, values: &[f64]) -> io::Result<()> {
    for &v in values {
        w.write_f64::<E>(v)?;
    }
    Ok(())
}

pub fn write_f32_vec<E: ByteOrder, W: Write>(w: &mut W, values: &[f32]) -> io::Result<()> {
    for &v in values {
        w.write_f32::<E>(v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};
    use std::io::Cursor;

    #[test]
    fn vector_reads_are_per_element_not_slab_reversed() {
        let mut buf = Vec::new();
        write_f64_vec::<LittleEndian, _>(&mut buf, &[1.0, 2.0, 3.0]).unwrap();
        let mut cur = Cursor::new(buf);
        let values = read_f64_vec::<LittleEndian, _>(&mut cur, 3).unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn endian_write_read_roundtrip() {
        let mut buf = Vec::new();
        write_i32::<BigEndian, _>(&mut buf, -42).unwrap();
        let mut cur = Cursor::new(buf);
        assert_eq!(read_i32::<BigEndian, _>(&mut cur).unwrap(), -42);
    }
}
