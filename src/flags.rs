//! Type-tag algebra: the additive encoding of dimension and compression onto
//! a SpatiaLite geometry kind.
//!
//! ```text
//! type = base_kind + (1000 | 2000 | 3000 for Z/M/ZM) + (1_000_000 if compressed)
//! ```

use crate::error::SpatialiteError;
use crate::model::Dimension;

pub const BASE_POINT: u32 = 1;
pub const BASE_LINE_STRING: u32 = 2;
pub const BASE_POLYGON: u32 = 3;
pub const BASE_MULTI_POINT: u32 = 4;
pub const BASE_MULTI_LINE_STRING: u32 = 5;
pub const BASE_MULTI_POLYGON: u32 = 6;
pub const BASE_GEOMETRY_COLLECTION: u32 = 7;

const COMPRESSED_OFFSET: i32 = 1_000_000;
const Z_OFFSET: i32 = 1000;
const M_OFFSET: i32 = 2000;
const ZM_OFFSET: i32 = 3000;

/// The decomposed form of a wire type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTag {
    pub base_kind: u32,
    pub dimension: Dimension,
    pub compressed: bool,
}

/// Splits a wire type code into base kind, dimension, and compression.
///
/// Compression is only a legal decoration on LineString and Polygon, but
/// `classify` itself does not enforce that; it is a pure decomposition.
/// Callers that need the constraint enforced (the writer) check it
/// explicitly; the reader is deliberately permissive on this axis because
/// childless kinds that happen to carry the compressed bit off the wire
/// should still be rejected with a precise error at the call site, not
/// inside this arithmetic.
pub fn classify(type_code: i32, offset: usize) -> Result<TypeTag, SpatialiteError> {
    let mut remaining = type_code;
    let compressed = remaining >= COMPRESSED_OFFSET;
    if compressed {
        remaining -= COMPRESSED_OFFSET;
    }

    let (dimension, remaining) = if remaining >= ZM_OFFSET {
        (Dimension::Xyzm, remaining - ZM_OFFSET)
    } else if remaining >= M_OFFSET {
        (Dimension::Xym, remaining - M_OFFSET)
    } else if remaining >= Z_OFFSET {
        (Dimension::Xyz, remaining - Z_OFFSET)
    } else {
        (Dimension::Xy, remaining)
    };

    let base_kind = remaining;
    if !(BASE_POINT as i32..=BASE_GEOMETRY_COLLECTION as i32).contains(&base_kind) {
        return Err(SpatialiteError::MalformedType {
            offset,
            value: type_code,
        });
    }

    Ok(TypeTag {
        base_kind: base_kind as u32,
        dimension,
        compressed,
    })
}

/// Inverse of [`classify`]: folds a base kind, dimension, and compression
/// flag back into a wire type code.
pub fn encode(base_kind: u32, dimension: Dimension, compressed: bool) -> i32 {
    let mut code = base_kind as i32;
    code += match dimension {
        Dimension::Xy => 0,
        Dimension::Xyz => Z_OFFSET,
        Dimension::Xym => M_OFFSET,
        Dimension::Xyzm => ZM_OFFSET,
    };
    if compressed {
        code += COMPRESSED_OFFSET;
    }
    code
}

/// Strips dimension and compression decoration, yielding the bare base kind.
pub fn base_of(type_code: i32) -> i32 {
    let mut remaining = type_code;
    if remaining >= COMPRESSED_OFFSET {
        remaining -= COMPRESSED_OFFSET;
    }
    if remaining >= ZM_OFFSET {
        remaining -= ZM_OFFSET;
    } else if remaining >= M_OFFSET {
        remaining -= M_OFFSET;
    } else if remaining >= Z_OFFSET {
        remaining -= Z_OFFSET;
    }
    remaining
}

/// Whether compression is a legal decoration for this base kind. Only
/// LineString and Polygon support the delta-compressed coordinate layout.
pub fn supports_compression(base_kind: u32) -> bool {
    matches!(base_kind, BASE_LINE_STRING | BASE_POLYGON)
}
