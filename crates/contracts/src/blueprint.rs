//! PipelineBlueprint - Config Loader 输出
//!
//! 描述完整的管道配置：准入间隔、输出 sink。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// 默认准入间隔（秒）
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的管道配置蓝图
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 管道设置
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// 输出配置
    #[serde(default)]
    pub sink: SinkConfig,
}

/// 管道设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSettings {
    /// 两次准入之间的最小间隔（秒），0 表示不限流
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl PipelineSettings {
    /// 准入间隔
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Sink 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink 名称
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            name: "log".to_string(),
            sink_type: SinkType::Log,
            params: HashMap::new(),
        }
    }
}

/// Sink 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// 日志输出
    Log,
    /// JSON Lines 文件输出
    File,
    /// 网络输出 (UDP)
    Network,
    /// 分析库 HTTP 流式写入
    Http,
}

impl SinkType {
    /// 该类型必填的参数
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            SinkType::Log => &[],
            SinkType::File => &["path"],
            SinkType::Network => &["addr"],
            SinkType::Http => &["endpoint"],
        }
    }
}
