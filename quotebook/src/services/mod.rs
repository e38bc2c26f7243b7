//! Service implementations
//!
//! This module contains real implementations of all service traits.
//! These are the production implementations that handle actual I/O operations.

pub mod clock;
pub mod file_storage;
pub mod http_source;
pub mod memory_storage;
pub mod simulated_source;
pub mod source;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use clock::{ManualClock, SystemClock};
pub use file_storage::RealFileStorage;
pub use http_source::HttpQuoteSource;
pub use memory_storage::MemoryStorage;
pub use simulated_source::SimulatedSource;
pub use source::ConfiguredSource;
