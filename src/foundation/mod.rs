/// Shared value types.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Alpha premultiplication helpers.
pub mod math;
