//! # Ingestion Pipeline
//!
//! Line-oriented sensor ingestion.
//!
//! Responsibilities:
//! - Decode one JSON line into a `RawReading`, skipping malformed lines
//! - Admit at most one reading per configured interval
//! - Convert imperial units to metric
//! - Hand the `ConvertedRecord` to the delivery worker, waiting until it is idle
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{DriverConfig, PipelineDriver};
//! use tokio::io::BufReader;
//!
//! let (tx, rx) = contracts::handoff();
//! let driver = PipelineDriver::new(DriverConfig::default(), tx);
//! let stats = driver.run(BufReader::new(tokio::io::stdin())).await?;
//! ```

mod admission;
mod clock;
mod config;
mod convert;
mod decoder;
mod driver;
mod error;

// Re-exports
pub use admission::AdmissionFilter;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DriverConfig, DriverStats, IngestionMetrics, MetricsSnapshot};
pub use contracts::{ConvertedRecord, RawReading};
pub use convert::{convert, fahrenheit_to_celsius, mph_to_kmh, KM_PER_MILE};
pub use decoder::{decode_bytes, decode_line};
pub use driver::PipelineDriver;
pub use error::{DecodeError, IngestionError, Result};
