//! Bindings for the settlement layer contracts targeted by commit transactions.

pub mod abi;

mod constants;
pub use constants::*;
