//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Admission decisions use a monotonic clock owned by the driver
//! - `ConvertedRecord::capture_time` is UTC wall time, stamped at handoff
//! - The handoff is a rendezvous: the driver waits until the worker is idle

mod blueprint;
mod error;
mod handoff;
mod reading;
mod sink;

pub use blueprint::*;
pub use error::*;
pub use handoff::*;
pub use reading::*;
pub use sink::*;
