//! HttpSink - streaming insert into a remote analytical store
//!
//! Each record is POSTed as a single-row insert request:
//!
//! ```text
//! {"rows": [{"insertId": "...", "json": {"Time": ..., "Temperature": ..., ...}}]}
//! ```
//!
//! A non-2xx status, or a 2xx response listing `insertErrors`, is a failed delivery.

use contracts::{ContractError, ConvertedRecord, DataSink};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable consulted when no `auth_token` param is set
pub const AUTH_TOKEN_ENV: &str = "WEATHER_RELAY_AUTH_TOKEN";

/// Configuration for HttpSink
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Insert endpoint
    pub endpoint: Url,
    /// Bearer token
    pub auth_token: Option<String>,
    /// Per-request timeout (None = wait indefinitely)
    pub timeout: Option<Duration>,
}

impl HttpSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let endpoint_str = params
            .get("endpoint")
            .ok_or_else(|| "missing 'endpoint' parameter".to_string())?;

        let endpoint = Url::parse(endpoint_str)
            .map_err(|e| format!("invalid endpoint '{}': {}", endpoint_str, e))?;

        let auth_token = params
            .get("auth_token")
            .cloned()
            .or_else(|| std::env::var(AUTH_TOKEN_ENV).ok())
            .filter(|t| !t.is_empty());

        let timeout = match params.get("timeout_secs") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|e| format!("invalid timeout_secs '{}': {}", raw, e))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            endpoint,
            auth_token,
            timeout,
        })
    }
}

#[derive(Serialize)]
struct InsertRequest<'a> {
    rows: [InsertRow<'a>; 1],
}

#[derive(Serialize)]
struct InsertRow<'a> {
    #[serde(rename = "insertId")]
    insert_id: String,
    json: &'a ConvertedRecord,
}

#[derive(Debug, Default, Deserialize)]
struct InsertResponse {
    #[serde(default, rename = "insertErrors")]
    insert_errors: Vec<serde_json::Value>,
}

/// Sink that streams records to an HTTP insert endpoint
pub struct HttpSink {
    name: String,
    config: HttpSinkConfig,
    client: Client,
    sequence: u64,
}

impl HttpSink {
    /// Create a new HttpSink
    ///
    /// Only builds the client; the endpoint is not contacted until the first write.
    pub fn new(name: impl Into<String>, config: HttpSinkConfig) -> Result<Self, ContractError> {
        let name = name.into();
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ContractError::sink_connection(&name, e.to_string()))?;

        debug!(sink = %name, endpoint = %config.endpoint, "HttpSink created");

        Ok(Self {
            name,
            config,
            client,
            sequence: 0,
        })
    }

    /// Create from params (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config = HttpSinkConfig::from_params(params)
            .map_err(|e| ContractError::sink_connection(&name, e))?;
        Self::new(name, config)
    }

    fn next_insert_id(&mut self, record: &ConvertedRecord) -> String {
        self.sequence += 1;
        format!(
            "{}-{}",
            record.capture_time.timestamp_micros(),
            self.sequence
        )
    }

    async fn post(&self, body: &InsertRequest<'_>) -> Result<(), ContractError> {
        let mut request = self.client.post(self.config.endpoint.clone()).json(body);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ContractError::sink_connection(&self.name, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;

        if !status.is_success() {
            return Err(ContractError::sink_write(
                &self.name,
                format!("HTTP {}: {}", status, text.trim()),
            ));
        }

        let parsed: InsertResponse = if text.trim().is_empty() {
            InsertResponse::default()
        } else {
            serde_json::from_str(&text).unwrap_or_default()
        };
        if !parsed.insert_errors.is_empty() {
            return Err(ContractError::sink_write(
                &self.name,
                format!("rejected rows: {}", serde_json::Value::from(parsed.insert_errors)),
            ));
        }

        Ok(())
    }
}

impl DataSink for HttpSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "http_sink_write", skip(self, record), fields(sink = %self.name))]
    async fn write(&mut self, record: &ConvertedRecord) -> Result<(), ContractError> {
        let insert_id = self.next_insert_id(record);
        let body = InsertRequest {
            rows: [InsertRow {
                insert_id,
                json: record,
            }],
        };
        self.post(&body).await
    }

    #[instrument(name = "http_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Every write is its own request
        Ok(())
    }

    #[instrument(name = "http_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, rows = self.sequence, "HttpSink closed");
        Ok(())
    }
}
