//! LogSink - logs each record via tracing

use contracts::{ContractError, ConvertedRecord, DataSink};
use tracing::{info, instrument};

/// Sink that logs records for debugging and dry deployments
pub struct LogSink {
    name: String,
    written: u64,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            written: 0,
        }
    }

    fn log_record(&self, record: &ConvertedRecord) {
        info!(
            sink = %self.name,
            seq = self.written,
            capture_time = %record.capture_time,
            temperature_c = record.temperature_c,
            wind_speed_kmh = record.wind_speed_kmh,
            humidity = record.humidity,
            "ConvertedRecord received"
        );
    }
}

impl DataSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_sink_write", skip(self, record), fields(sink = %self.name))]
    async fn write(&mut self, record: &ConvertedRecord) -> Result<(), ContractError> {
        self.log_record(record);
        self.written += 1;
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, records = self.written, "LogSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log");
        let record = ConvertedRecord {
            capture_time: Utc::now(),
            temperature_c: 10.56,
            wind_speed_kmh: 4.27,
            humidity: 70.0,
        };

        assert!(sink.write(&record).await.is_ok());
        assert_eq!(sink.written, 1);
    }

    #[tokio::test]
    async fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }
}
