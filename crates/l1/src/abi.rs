/// Calls to the executor facet, as received by the validator timelock.
pub mod calls;
