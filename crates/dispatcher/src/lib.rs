//! # Dispatcher
//!
//! 投递模块。
//!
//! 负责：
//! - 持有交接点的接收端，空闲时才接收下一条记录
//! - 对每条记录调用一次 sink，失败只记录不重试
//! - 关闭时排空已交接的记录

pub mod error;
pub mod factory;
pub mod metrics;
pub mod sinks;
pub mod worker;

pub use contracts::{ConvertedRecord, DataSink, HandoffSender};
pub use error::DispatcherError;
pub use factory::spawn_worker;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{FileSink, HttpSink, LogSink, NetworkSink};
pub use worker::DeliveryWorker;
