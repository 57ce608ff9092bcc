use crate::{
    extract_commitment,
    path::{FieldPath, Step},
    CalldataSchema, DecodingError, SchemaError,
};

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Bytes, Selector};

/// Decodes calldata arguments against a [`CalldataSchema`] and returns the `bytes` value found at
/// a [`FieldPath`].
#[derive(Debug, Clone)]
pub struct CalldataDecoder {
    schema: CalldataSchema,
    path: FieldPath,
    ty: DynSolType,
    steps: Vec<Step>,
}

impl CalldataDecoder {
    /// Returns a new decoder, validating the path against the schema.
    pub fn new(schema: CalldataSchema, path: FieldPath) -> Result<Self, SchemaError> {
        let ty = schema.resolve()?;
        let steps = path.resolve(&schema)?;
        Ok(Self { schema, path, ty, steps })
    }

    /// Returns the decoder for the first batch's pubdata commitments in
    /// `commitBatchesSharedBridge` calldata.
    pub fn commit_batches_shared_bridge() -> Result<Self, SchemaError> {
        Self::new(CalldataSchema::commit_batches_shared_bridge(), FieldPath::pubdata_commitments())
    }

    /// Returns the selector derived from the schema.
    pub fn selector(&self) -> Selector {
        self.schema.selector()
    }

    /// Returns the schema of the decoder.
    pub const fn schema(&self) -> &CalldataSchema {
        &self.schema
    }

    /// Returns the path of the decoded value.
    pub const fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Decodes the calldata arguments, without the selector, and returns the bytes at the path.
    pub fn decode(&self, args: &[u8]) -> Result<Bytes, DecodingError> {
        let mut value = self.ty.abi_decode_params(args)?;

        for step in &self.steps {
            value = match (*step, value) {
                (Step::Member(position), DynSolValue::Tuple(mut members))
                    if position < members.len() =>
                {
                    members.swap_remove(position)
                }
                (
                    Step::Element(index),
                    DynSolValue::Array(mut elements) | DynSolValue::FixedArray(mut elements),
                ) => {
                    if index >= elements.len() {
                        return Err(DecodingError::IndexOutOfBounds { index, len: elements.len() });
                    }
                    elements.swap_remove(index)
                }
                (step, value) => {
                    return Err(DecodingError::UnexpectedShape(format!(
                        "cannot apply {step:?} to {:?}",
                        value.sol_type_name()
                    )))
                }
            };
        }

        match value {
            DynSolValue::Bytes(bytes) => Ok(bytes.into()),
            value => Err(DecodingError::UnexpectedShape(format!(
                "expected bytes at {}, found {:?}",
                self.path,
                value.sol_type_name()
            ))),
        }
    }

    /// Decodes the calldata arguments and extracts the commitment from the bytes at the path.
    pub fn decode_commitment(&self, args: &[u8]) -> Result<String, DecodingError> {
        let bytes = self.decode(args)?;
        Ok(extract_commitment(&bytes)?)
    }
}
