use std::{path::PathBuf, str::Utf8Error};

/// An error occurring while building a calldata schema or resolving a field path against it.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The requested function is not part of the ABI.
    #[error("function {0} not found in abi")]
    MissingFunction(String),
    /// The ABI file could not be read.
    #[error("failed to read abi file {path}: {source}")]
    Io {
        /// The path of the ABI file.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
    /// The ABI file is not valid ABI JSON.
    #[error("invalid abi json: {0}")]
    Json(#[from] serde_json::Error),
    /// A parameter type could not be parsed.
    #[error("invalid parameter type: {0}")]
    InvalidType(#[from] alloy_dyn_abi::Error),
    /// The field path could not be parsed.
    #[error("invalid field path {0:?}")]
    InvalidPath(String),
    /// The field path is empty.
    #[error("empty field path")]
    EmptyPath,
    /// The field path names a field absent from the schema.
    #[error("unknown field {field} in {path}")]
    UnknownField {
        /// The missing field.
        field: String,
        /// The full path.
        path: String,
    },
    /// The field path indexes into a value which is not an array.
    #[error("{path}: cannot index into {ty}")]
    NotIndexable {
        /// The full path.
        path: String,
        /// The type of the value.
        ty: String,
    },
    /// The field path selects a field of a value which is not a tuple.
    #[error("{path}: {ty} has no fields")]
    NotATuple {
        /// The full path.
        path: String,
        /// The type of the value.
        ty: String,
    },
    /// The field path does not end on a `bytes` value.
    #[error("{path}: expected bytes, found {ty}")]
    NotBytes {
        /// The full path.
        path: String,
        /// The type of the value.
        ty: String,
    },
}

/// An error occurring during the decoding of calldata.
#[derive(Debug, thiserror::Error)]
pub enum DecodingError {
    /// The calldata does not decode against the schema.
    #[error("malformed calldata: {0}")]
    MalformedCalldata(#[from] alloy_dyn_abi::Error),
    /// An array is shorter than the index requested by the field path.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the decoded array.
        len: usize,
    },
    /// The decoded value does not have the shape expected by the field path.
    #[error("unexpected value shape: {0}")]
    UnexpectedShape(String),
    /// The commitment is not valid UTF-8.
    #[error("invalid commitment encoding: {0}")]
    InvalidEncoding(#[from] Utf8Error),
}

impl DecodingError {
    /// Returns true if the error originates from the structure of the calldata rather than the
    /// encoding of the commitment.
    pub const fn is_malformed(&self) -> bool {
        !matches!(self, Self::InvalidEncoding(_))
    }
}
