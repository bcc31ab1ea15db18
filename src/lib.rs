//! Codec for the SpatiaLite internal geometry BLOB format.
//!
//! Two symmetric halves, [`reader::Reader`] and [`writer::Writer`], share a
//! header/flag vocabulary ([`flags`], [`wire`]) and a small owned geometry
//! model ([`model`]). Converting to/from WKB, WKT, or GeoJSON, spatial
//! predicates, and database driver plumbing are all out of scope: this
//! crate only speaks the one wire format.

pub mod byteops;
pub mod error;
pub mod flags;
pub mod io;
pub mod model;
pub mod ordinates;
pub mod precision;
pub mod reader;
pub mod wire;
pub mod writer;

pub const DEFAULT_SRID: i32 = 4326;
