//! The "accepted ordinates" mask from the Reader/Writer configuration
//! surface (§6). Shape grounded on `georust-wkb::common`'s EWKB flag bits
//! (`EWKB_FLAG_Z` / `EWKB_FLAG_M`), the nearest corpus precedent for an
//! ordinate bitmask, generalized here to also gate X/Y (always on in
//! practice, but kept explicit for symmetry).

/// Which ordinates a `Reader`/`Writer` materializes. X and Y are always
/// implied; `z`/`m` gate whether the Z/M slot is copied into a
/// [`crate::model::Coordinate`] once decoded. The wire bytes for an ordinate
/// the mask rejects are still consumed; this mask only controls what ends
/// up in memory, never where the cursor lands (§9, ordinate-filtering note).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordinates {
    pub z: bool,
    pub m: bool,
}

impl Ordinates {
    pub const XY: Ordinates = Ordinates { z: false, m: false };
    pub const XYZ: Ordinates = Ordinates { z: true, m: false };
    pub const XYM: Ordinates = Ordinates { z: false, m: true };
    pub const XYZM: Ordinates = Ordinates { z: true, m: true };
}

impl Default for Ordinates {
    fn default() -> Self {
        Self::XYZM
    }
}
