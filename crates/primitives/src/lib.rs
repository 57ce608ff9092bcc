//! Primitive types for the batch commitment scanner.

pub use block::{BlockRange, TxLocation};
mod block;

pub use commitment::ExtractedCommitment;
mod commitment;

pub use error::InvalidConfiguration;
mod error;

pub use selector::{FunctionSelector, SELECTOR_LEN};
mod selector;

pub use target::ScanTarget;
mod target;
