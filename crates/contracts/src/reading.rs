//! RawReading / ConvertedRecord - Ingestion 输入与输出
//!
//! 原始传感器读数（英制单位）与转换后的记录（公制单位）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 原始传感器读数
///
/// 从一行 JSON 输入解码得到，例如：
///
/// ```text
/// {"time" : "2018-12-22 16:31:14", "model" : "Acurite 3n1 sensor", "sensor_id" : 2618,
///  "channel" : "A", "sequence_num" : 3, "battery" : "LOW", "message_type" : 32,
///  "wind_speed_mph" : 2.654, "temperature_F" : 51.000, "humidity" : 70}
/// ```
///
/// 测量字段必填；元数据字段缺省时取默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// 采集时间（传感器守护进程给出的字符串）
    #[serde(default)]
    pub time: String,

    /// 传感器型号
    #[serde(default)]
    pub model: String,

    /// 传感器 ID
    #[serde(default)]
    pub sensor_id: i64,

    /// 通道
    #[serde(default)]
    pub channel: String,

    /// 序列号
    #[serde(default)]
    pub sequence_num: i64,

    /// 电池状态
    #[serde(default)]
    pub battery: String,

    /// 消息类型
    #[serde(default)]
    pub message_type: i64,

    /// 风速 (mph)
    pub wind_speed_mph: f32,

    /// 温度 (°F)
    #[serde(rename = "temperature_F")]
    pub temperature_f: f32,

    /// 湿度 (%)
    pub humidity: i64,
}

/// 转换后的记录
///
/// 字段名与分析表的列名一致 (`Time`, `Temperature`, `WindSpeed`, `Humidity`)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedRecord {
    /// 采集时间戳（交接时刻，不是解析时刻）
    #[serde(rename = "Time")]
    pub capture_time: DateTime<Utc>,

    /// 温度 (°C)
    #[serde(rename = "Temperature")]
    pub temperature_c: f32,

    /// 风速 (km/h)
    #[serde(rename = "WindSpeed")]
    pub wind_speed_kmh: f32,

    /// 湿度 (%)
    #[serde(rename = "Humidity")]
    pub humidity: f32,
}
