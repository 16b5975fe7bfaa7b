//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 → driver → worker → sink 全链路
//! - 限流时序（暂停时钟）
//! - sink 失败隔离

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{PipelineBlueprint, SinkType};

    #[test]
    fn test_default_blueprint_survives_toml() {
        let toml = ConfigLoader::to_toml(&PipelineBlueprint::default()).unwrap();
        let bp = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.pipeline.interval_secs, 30);
        assert_eq!(bp.sink.sink_type, SinkType::Log);
    }

    #[test]
    fn test_json_config_drives_driver_interval() {
        let bp = ConfigLoader::load_from_str(
            r#"{"pipeline": {"interval_secs": 45}, "sink": {"name": "log", "sink_type": "log"}}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let config = ingestion::DriverConfig::from(&bp.pipeline);
        assert_eq!(config.interval, std::time::Duration::from_secs(45));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use contracts::{ContractError, ConvertedRecord, DataSink};
    use dispatcher::DeliveryWorker;
    use ingestion::{DriverConfig, PipelineDriver};
    use tokio::io::{AsyncWriteExt, BufReader};

    /// In-memory sink recording every delivered record
    #[derive(Clone, Default)]
    struct RecordingSink {
        delivered: Arc<Mutex<Vec<ConvertedRecord>>>,
        attempts: Arc<AtomicU64>,
        fail_on_attempt: Option<u64>,
        write_delay: Option<Duration>,
    }

    impl RecordingSink {
        fn delivered(&self) -> Vec<ConvertedRecord> {
            self.delivered.lock().unwrap().clone()
        }
    }

    impl DataSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn write(&mut self, record: &ConvertedRecord) -> Result<(), ContractError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(delay) = self.write_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_on_attempt == Some(attempt) {
                return Err(ContractError::sink_write("recording", "store unavailable"));
            }
            self.delivered.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    fn lines(readings: &[&str]) -> BufReader<std::io::Cursor<Vec<u8>>> {
        let mut data = readings.join("\n");
        data.push('\n');
        BufReader::new(std::io::Cursor::new(data.into_bytes()))
    }

    /// Lines arrive at t=0, t=10 and t=35 with a 30s interval: the middle one is dropped.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_throttled_relay() {
        let sink = RecordingSink::default();
        let (worker, handoff) = DeliveryWorker::spawn(sink.clone());
        let driver = PipelineDriver::new(DriverConfig::new(Duration::from_secs(30)), handoff);

        let (reader, mut writer) = tokio::io::duplex(1024);
        let feeder = tokio::spawn(async move {
            let schedule = [
                (0u64, r#"{"time": "2024-05-01 12:00:00", "model": "Acurite-5n1", "sensor_id": 1234, "channel": "A", "sequence_num": 0, "battery": "OK", "message_type": 56, "wind_speed_mph": 2.654, "temperature_F": 51.0, "humidity": 70}"#),
                (10, r#"{"wind_speed_mph": 5.0, "temperature_F": 68.0, "humidity": 50}"#),
                (25, r#"{"wind_speed_mph": 0.0, "temperature_F": 32.0, "humidity": 90}"#),
            ];
            for (delay, line) in schedule {
                tokio::time::sleep(Duration::from_secs(delay)).await;
                writer.write_all(line.as_bytes()).await.unwrap();
                writer.write_all(b"\n").await.unwrap();
            }
        });

        let stats = driver.run(BufReader::new(reader)).await.unwrap();
        feeder.await.unwrap();
        worker.shutdown().await;

        assert_eq!(stats.counters.lines_read, 3);
        assert_eq!(stats.counters.admitted, 2);
        assert_eq!(stats.counters.discarded, 1);

        let delivered = sink.delivered();
        assert_eq!(delivered.len(), 2);

        assert!((delivered[0].temperature_c - 10.56).abs() < 0.01);
        assert!((delivered[0].wind_speed_kmh - 4.27).abs() < 0.01);
        assert_eq!(delivered[0].humidity, 70.0);

        assert!(delivered[1].temperature_c.abs() < 1e-6);
        assert_eq!(delivered[1].wind_speed_kmh, 0.0);
        assert_eq!(delivered[1].humidity, 90.0);

        assert!(delivered[0].capture_time <= delivered[1].capture_time);
    }

    #[tokio::test]
    async fn test_e2e_malformed_line_is_skipped() {
        let sink = RecordingSink::default();
        let (worker, handoff) = DeliveryWorker::spawn(sink.clone());
        let driver = PipelineDriver::new(DriverConfig::new(Duration::ZERO), handoff);

        let stats = driver
            .run(lines(&[
                r#"{"wind_speed_mph": 1.0, "temperature_F": 50.0, "humidity": 40}"#,
                r#"{"wind_speed_mph": "fast", "temperature_F": 50.0"#,
                r#"{"wind_speed_mph": 1.0, "temperature_F": 41.0, "humidity": 41}"#,
            ]))
            .await
            .unwrap();
        worker.shutdown().await;

        assert_eq!(stats.counters.decode_errors, 1);
        let humidities: Vec<f32> = sink.delivered().iter().map(|r| r.humidity).collect();
        assert_eq!(humidities, vec![40.0, 41.0]);
    }

    #[tokio::test]
    async fn test_e2e_sink_failure_does_not_stop_later_records() {
        let sink = RecordingSink {
            fail_on_attempt: Some(1),
            ..Default::default()
        };
        let (worker, handoff) = DeliveryWorker::spawn(sink.clone());
        let sink_metrics = Arc::clone(worker.metrics());
        let driver = PipelineDriver::new(DriverConfig::new(Duration::ZERO), handoff);

        driver
            .run(lines(&[
                r#"{"wind_speed_mph": 0.0, "temperature_F": 32.0, "humidity": 1}"#,
                r#"{"wind_speed_mph": 0.0, "temperature_F": 32.0, "humidity": 2}"#,
                r#"{"wind_speed_mph": 0.0, "temperature_F": 32.0, "humidity": 3}"#,
            ]))
            .await
            .unwrap();
        worker.shutdown().await;

        assert_eq!(sink.attempts.load(Ordering::SeqCst), 3);
        let snapshot = sink_metrics.snapshot();
        assert_eq!(snapshot.failure_count, 1);
        assert_eq!(snapshot.write_count, 2);

        let humidities: Vec<f32> = sink.delivered().iter().map(|r| r.humidity).collect();
        assert_eq!(humidities, vec![2.0, 3.0]);
    }

    /// A slow sink holds the driver: one record in delivery, none queued behind it.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_slow_sink_holds_driver_at_handoff() {
        let sink = RecordingSink {
            write_delay: Some(Duration::from_secs(10)),
            ..Default::default()
        };
        let (worker, handoff) = DeliveryWorker::spawn(sink.clone());
        let sink_metrics = Arc::clone(worker.metrics());
        let driver = PipelineDriver::new(DriverConfig::new(Duration::ZERO), handoff);
        let driver_metrics = driver.metrics();

        let run = tokio::spawn(driver.run(lines(&[
            r#"{"wind_speed_mph": 0.0, "temperature_F": 32.0, "humidity": 1}"#,
            r#"{"wind_speed_mph": 0.0, "temperature_F": 32.0, "humidity": 2}"#,
            r#"{"wind_speed_mph": 0.0, "temperature_F": 32.0, "humidity": 3}"#,
        ])));

        // First write is still pending
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(sink_metrics.snapshot().write_count, 0);
        assert_eq!(driver_metrics.snapshot().handed_off, 1);

        let stats = run.await.unwrap().unwrap();
        worker.shutdown().await;

        assert_eq!(stats.counters.handed_off, 3);
        let humidities: Vec<f32> = sink.delivered().iter().map(|r| r.humidity).collect();
        assert_eq!(humidities, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_e2e_file_sink_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.jsonl");
        let toml = format!(
            "[pipeline]\ninterval_secs = 0\n\n[sink]\nname = \"archive\"\nsink_type = \"file\"\n\n[sink.params]\npath = {:?}\n",
            path.to_string_lossy()
        );
        let bp = config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
            .unwrap();

        let (worker, handoff) = dispatcher::spawn_worker(&bp.sink).await.unwrap();
        let driver = PipelineDriver::new(DriverConfig::from(&bp.pipeline), handoff);
        driver
            .run(lines(&[
                r#"{"wind_speed_mph": 23.0, "temperature_F": -40.0, "humidity": 12}"#,
            ]))
            .await
            .unwrap();
        assert!(worker.shutdown_with_timeout(Duration::from_secs(5)).await);

        let content = std::fs::read_to_string(&path).unwrap();
        let line = content.lines().next().unwrap();
        assert!(line.contains("\"Temperature\":-40"));
        assert!(line.contains("\"Humidity\":12"));
    }
}
