//! FileSink - appends records to a JSON Lines file

use contracts::{ContractError, ConvertedRecord, DataSink};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output file, created if missing and appended to otherwise
    pub path: PathBuf,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let path = params
            .get("path")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| "missing 'path' parameter".to_string())?;

        Ok(Self { path })
    }
}

/// Sink that writes one JSON object per line
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
    file: Option<File>,
}

impl FileSink {
    /// Create a new FileSink
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)?;

        Ok(Self {
            name: name.into(),
            config,
            file: Some(File::from_std(file)),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileSinkConfig::from_params(params)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Self::new(name, config)
    }

    fn encode_line(&self, record: &ConvertedRecord) -> Result<Vec<u8>, ContractError> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| ContractError::sink_write(&self.name, format!("json error: {e}")))?;
        line.push(b'\n');
        Ok(line)
    }
}

impl DataSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "file_sink_write", skip(self, record), fields(sink = %self.name))]
    async fn write(&mut self, record: &ConvertedRecord) -> Result<(), ContractError> {
        let line = self.encode_line(record)?;
        let name = self.name.clone();
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| ContractError::sink_write(&name, "file already closed"))?;

        file.write_all(&line)
            .await
            .map_err(|e| ContractError::sink_write(&name, e.to_string()))?;
        // Low-rate stream, so every record is pushed to the OS immediately
        file.flush()
            .await
            .map_err(|e| ContractError::sink_write(&name, e.to_string()))?;
        Ok(())
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        if let Some(file) = self.file.as_mut() {
            file.sync_all().await?;
        }
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.file = None;
        debug!(sink = %self.name, path = %self.config.path.display(), "FileSink closed");
        Ok(())
    }
}
