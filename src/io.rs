use std::io::{Read, Write};

use crate::error::SpatialiteError;

pub trait Encodable {
    fn encode<W: Write>(&self, stream: &mut W) -> Result<(), SpatialiteError>;

    /// Encode into a vector of bytes.
    fn encode_to_vec(&self) -> Result<Vec<u8>, SpatialiteError> {
        let mut bytes = Vec::<u8>::default();
        self.encode(&mut bytes)?;
        Ok(bytes)
    }
}

pub trait Decodable: Sized {
    fn decode<R: Read>(stream: &mut R) -> Result<Self, SpatialiteError>;

    /// Decode from a slice of bytes.
    fn decode_from_slice(mut slice: &[u8]) -> Result<Self, SpatialiteError> {
        Self::decode(&mut slice)
    }
}