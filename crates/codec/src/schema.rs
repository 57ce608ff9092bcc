use crate::SchemaError;

use std::path::Path;

use alloy_dyn_abi::{DynSolType, Specifier};
use alloy_json_abi::{Function, JsonAbi, Param, StateMutability};
use alloy_primitives::Selector;
use commit_scanner_l1::{COMMIT_BATCHES_SHARED_BRIDGE, NEW_BATCHES_DATA_PARAM};

/// A declarative description of the parameters of a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalldataSchema {
    function: Function,
}

impl CalldataSchema {
    /// Returns a schema for the function `name` with the provided parameters.
    pub fn new(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            function: Function {
                name: name.into(),
                inputs: params,
                outputs: vec![],
                state_mutability: StateMutability::NonPayable,
            },
        }
    }

    /// Returns the schema of `commitBatchesSharedBridge(uint256,StoredBatchInfo,CommitBatchInfo[])`.
    pub fn commit_batches_shared_bridge() -> Self {
        let stored_batch_info = vec![
            param("batchNumber", "uint64"),
            param("batchHash", "bytes32"),
            param("indexRepeatedStorageChanges", "uint64"),
            param("numberOfLayer1Txs", "uint256"),
            param("priorityOperationsHash", "bytes32"),
            param("l2LogsTreeRoot", "bytes32"),
            param("timestamp", "uint256"),
            param("commitment", "bytes32"),
        ];
        let commit_batch_info = vec![
            param("batchNumber", "uint64"),
            param("timestamp", "uint64"),
            param("indexRepeatedStorageChanges", "uint64"),
            param("newStateRoot", "bytes32"),
            param("numberOfLayer1Txs", "uint256"),
            param("priorityOperationsHash", "bytes32"),
            param("bootloaderHeapInitialContentsHash", "bytes32"),
            param("eventsQueueStateHash", "bytes32"),
            param("systemLogs", "bytes"),
            param("pubdataCommitments", "bytes"),
        ];

        Self::new(
            COMMIT_BATCHES_SHARED_BRIDGE,
            vec![
                param("_chainId", "uint256"),
                tuple("_lastCommittedBatchData", "tuple", stored_batch_info),
                tuple(NEW_BATCHES_DATA_PARAM, "tuple[]", commit_batch_info),
            ],
        )
    }

    /// Returns the schema of the function `name` from the provided ABI. When the function is
    /// overloaded, the first definition is used.
    pub fn from_json_abi(abi: &JsonAbi, name: &str) -> Result<Self, SchemaError> {
        let function = abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| SchemaError::MissingFunction(name.to_owned()))?;
        Ok(Self { function: function.clone() })
    }

    /// Loads the ABI JSON file at `path` and returns the schema of the function `name`.
    pub fn from_abi_file(path: impl AsRef<Path>, name: &str) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| SchemaError::Io { path: path.to_path_buf(), source })?;
        let abi: JsonAbi = serde_json::from_str(&raw)?;
        let schema = Self::from_json_abi(&abi, name)?;
        tracing::debug!(target: "commit_scanner::codec", path = %path.display(), signature = %schema.signature(), "loaded calldata schema");
        Ok(schema)
    }

    /// Returns the name of the function.
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Returns the parameters of the function.
    pub fn params(&self) -> &[Param] {
        &self.function.inputs
    }

    /// Returns the canonical signature of the function.
    pub fn signature(&self) -> String {
        self.function.signature()
    }

    /// Returns the selector derived from the signature.
    pub fn selector(&self) -> Selector {
        self.function.selector()
    }

    /// Resolves the parameters into the tuple type the calldata is decoded against.
    pub fn resolve(&self) -> Result<DynSolType, SchemaError> {
        let types = self
            .function
            .inputs
            .iter()
            .map(Specifier::<DynSolType>::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DynSolType::Tuple(types))
    }
}

fn param(name: &str, ty: &str) -> Param {
    tuple(name, ty, vec![])
}

fn tuple(name: &str, ty: &str, components: Vec<Param>) -> Param {
    Param { ty: ty.to_owned(), name: name.to_owned(), components, internal_type: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TEST_ABI;

    use commit_scanner_l1::COMMIT_BATCHES_SHARED_BRIDGE_SELECTOR;

    #[test]
    fn test_builtin_schema_selector() {
        let schema = CalldataSchema::commit_batches_shared_bridge();
        assert_eq!(schema.selector(), COMMIT_BATCHES_SHARED_BRIDGE_SELECTOR);
        assert_eq!(schema.params().len(), 3);
    }

    #[test]
    fn test_builtin_schema_resolves() -> eyre::Result<()> {
        let ty = CalldataSchema::commit_batches_shared_bridge().resolve()?;
        let DynSolType::Tuple(params) = ty else { eyre::bail!("expected a tuple") };
        assert_eq!(params.len(), 3);
        assert_eq!(params[0], DynSolType::Uint(256));
        let DynSolType::Array(batch) = &params[2] else { eyre::bail!("expected an array") };
        let DynSolType::Tuple(fields) = batch.as_ref() else { eyre::bail!("expected a tuple") };
        assert_eq!(fields.len(), 10);
        assert_eq!(fields[9], DynSolType::Bytes);
        Ok(())
    }

    #[test]
    fn test_load_schema_from_abi_file() -> eyre::Result<()> {
        // Given
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("abi.json");
        std::fs::write(&path, TEST_ABI)?;

        // When
        let schema = CalldataSchema::from_abi_file(&path, "submit")?;

        // Then
        assert_eq!(schema.name(), "submit");
        assert_eq!(schema.signature(), "submit(uint256,(uint64,bytes)[])");
        Ok(())
    }

    #[test]
    fn test_missing_function_in_abi() -> eyre::Result<()> {
        let abi: JsonAbi = serde_json::from_str(TEST_ABI)?;
        let err = CalldataSchema::from_json_abi(&abi, "commitBatches").unwrap_err();
        assert!(matches!(err, SchemaError::MissingFunction(name) if name == "commitBatches"));
        Ok(())
    }

    #[test]
    fn test_missing_abi_file() {
        let err = CalldataSchema::from_abi_file("./does/not/exist.json", "submit").unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }

    #[test]
    fn test_invalid_parameter_type() {
        let schema = CalldataSchema::new("broken", vec![param("value", "uint7")]);
        assert!(matches!(schema.resolve(), Err(SchemaError::InvalidType(_))));
    }
}
