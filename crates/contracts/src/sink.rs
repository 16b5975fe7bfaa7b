//! DataSink trait - Delivery worker output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{ContractError, ConvertedRecord};

/// Data output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(DataSink: Send)]
pub trait LocalDataSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist one converted record
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, record: &ConvertedRecord) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
