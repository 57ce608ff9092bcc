//! The calldata codec for the commit scanner.
//!
//! Calldata is decoded against a [`CalldataSchema`] built from ABI parameter descriptions, and the
//! commitment bytes are located inside the decoded values with a [`FieldPath`].

pub use commitment::{extract_commitment, COMMITMENT_PREFIX_LEN};
mod commitment;

pub use decoder::CalldataDecoder;
mod decoder;

pub use error::{DecodingError, SchemaError};
mod error;

pub use path::{FieldPath, PathSegment};
mod path;

pub use schema::CalldataSchema;
mod schema;

#[cfg(test)]
mod test_utils;
