//! 管道指标收集模块
//!
//! 记录输入行、解码错误、准入结果与投递结果，并在内存中聚合读数统计。

use contracts::ConvertedRecord;
use metrics::{counter, histogram};

/// 记录读取到一行输入
pub fn record_line_read() {
    counter!("weather_relay_lines_total").increment(1);
}

/// 记录一次解码失败
pub fn record_decode_error() {
    counter!("weather_relay_decode_errors_total").increment(1);
}

/// 记录准入过滤结果
pub fn record_admission(admitted: bool) {
    if admitted {
        counter!("weather_relay_readings_admitted_total").increment(1);
    } else {
        counter!("weather_relay_readings_discarded_total").increment(1);
    }
}

/// 记录一次投递尝试
pub fn record_delivery(sink_name: &str, success: bool, latency_ms: f64) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "weather_relay_deliveries_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "weather_relay_delivery_latency_ms",
        "sink" => sink_name.to_string()
    )
    .record(latency_ms);
}

/// 读数统计聚合器
///
/// 对交接给投递 worker 的记录做在线统计，便于运行结束时输出摘要。
#[derive(Debug, Clone, Default)]
pub struct ReadingStatsAggregator {
    /// 温度 (°C)
    pub temperature_c: RunningStats,

    /// 风速 (km/h)
    pub wind_speed_kmh: RunningStats,

    /// 湿度 (%)
    pub humidity: RunningStats,
}

impl ReadingStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, record: &ConvertedRecord) {
        self.temperature_c.push(f64::from(record.temperature_c));
        self.wind_speed_kmh.push(f64::from(record.wind_speed_kmh));
        self.humidity.push(f64::from(record.humidity));
    }

    /// 生成摘要报告
    pub fn summary(&self) -> ReadingSummary {
        ReadingSummary {
            temperature_c: StatsSummary::from(&self.temperature_c),
            wind_speed_kmh: StatsSummary::from(&self.wind_speed_kmh),
            humidity: StatsSummary::from(&self.humidity),
        }
    }
}

/// 读数摘要
#[derive(Debug, Clone, Default)]
pub struct ReadingSummary {
    pub temperature_c: StatsSummary,
    pub wind_speed_kmh: StatsSummary,
    pub humidity: StatsSummary,
}

impl std::fmt::Display for ReadingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Temperature (C): {}", self.temperature_c)?;
        writeln!(f, "Wind speed (km/h): {}", self.wind_speed_kmh)?;
        writeln!(f, "Humidity (%): {}", self.humidity)
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.2}, max={:.2}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}
