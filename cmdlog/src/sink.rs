//! 日志输出端（Log Sink）
//!
//! 审计日志只依赖该 trait；默认实现经由 `tracing` 输出，
//! 内存实现用于测试与本地排查。
//!
use crate::config::LogLevel;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};

/// 审计日志事件的 `tracing` target
pub const AUDIT_TARGET: &str = "cmdlog::audit";

/// 一条待输出的审计日志
#[derive(Clone, Copy, Debug)]
pub struct AuditEntry<'a> {
    pub level: LogLevel,
    pub command: &'a str,
    pub user: Option<&'a str>,
    /// 已格式化的完整日志行
    pub line: &'a str,
}

/// 日志输出端
pub trait LogSink: Send + Sync {
    fn write(&self, entry: &AuditEntry<'_>);
}

/// 经由 `tracing` 输出，事件带结构化字段 `command`、`user`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogSink;

macro_rules! audit_event {
    ($level:ident, $entry:expr) => {
        tracing::$level!(
            target: AUDIT_TARGET,
            command = $entry.command,
            user = $entry.user.unwrap_or_default(),
            "{}",
            $entry.line
        )
    };
}

impl LogSink for TracingLogSink {
    fn write(&self, entry: &AuditEntry<'_>) {
        // tracing 宏要求级别为常量
        match entry.level {
            LogLevel::Trace => audit_event!(trace, entry),
            LogLevel::Debug => audit_event!(debug, entry),
            LogLevel::Info => audit_event!(info, entry),
            LogLevel::Warn => audit_event!(warn, entry),
            LogLevel::Error => audit_event!(error, entry),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub command: String,
    pub user: Option<String>,
    pub line: String,
    pub logged_at: DateTime<Utc>,
}

/// 基于内存的 LogSink 实现
#[derive(Debug, Default)]
pub struct InMemoryLogSink {
    records: Mutex<Vec<LogRecord>>,
}

impl InMemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.line.clone()).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        // 写入方 panic 不影响已记录的数据
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for InMemoryLogSink {
    fn write(&self, entry: &AuditEntry<'_>) {
        self.lock().push(LogRecord {
            level: entry.level,
            command: entry.command.to_string(),
            user: entry.user.map(str::to_string),
            line: entry.line.to_string(),
            logged_at: Utc::now(),
        });
    }
}
