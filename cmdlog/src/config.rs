//! 审计日志配置
//!
//! 进程启动时加载一次（代码构建或 JSON），之后以只读方式共享。
//!
use crate::error::ConfigError;
use crate::redaction::{DEFAULT_REDACT_FIELDS, RedactingSerializer, RedactionDepth, RedactionSet};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 日志级别
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// 命令审计日志配置
///
/// ```rust
/// use cmdlog::config::{CommandLoggingConfig, LogLevel};
/// use cmdlog::redaction::RedactionDepth;
///
/// let cfg = CommandLoggingConfig::from_json_str(r#"{ "redact_fields": ["token"] }"#).unwrap();
/// assert_eq!(cfg.redact_fields, vec!["token".to_string()]);
/// assert_eq!(cfg.depth, RedactionDepth::Shallow);
/// assert_eq!(cfg.level, LogLevel::Info);
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandLoggingConfig {
    /// 需要脱敏的字段名（区分大小写）
    #[builder(default = default_redact_fields())]
    pub redact_fields: Vec<String>,
    /// 脱敏深度
    #[builder(default)]
    pub depth: RedactionDepth,
    /// 审计日志级别
    #[builder(default)]
    pub level: LogLevel,
}

fn default_redact_fields() -> Vec<String> {
    DEFAULT_REDACT_FIELDS.iter().map(|s| s.to_string()).collect()
}

impl Default for CommandLoggingConfig {
    fn default() -> Self {
        Self {
            redact_fields: default_redact_fields(),
            depth: RedactionDepth::default(),
            level: LogLevel::default(),
        }
    }
}

impl CommandLoggingConfig {
    /// 从 JSON 文本加载，缺省项取默认值，未知键报错
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn redaction_set(&self) -> RedactionSet {
        RedactionSet::new(self.redact_fields.iter().cloned())
    }

    pub fn serializer(&self) -> RedactingSerializer {
        RedactingSerializer::new(self.redaction_set()).with_depth(self.depth)
    }
}
