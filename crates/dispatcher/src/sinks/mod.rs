//! Sink implementations
//!
//! Contains LogSink, FileSink, NetworkSink, and HttpSink.

mod file;
mod http;
mod log;
mod network;

pub use self::file::{FileSink, FileSinkConfig};
pub use self::http::{HttpSink, HttpSinkConfig, AUTH_TOKEN_ENV};
pub use self::log::LogSink;
pub use self::network::{NetworkFormat, NetworkSink, NetworkSinkConfig};
