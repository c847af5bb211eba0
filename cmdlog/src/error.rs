//! 统一错误定义
//!
//! - `RedactionError`：脱敏序列化失败（无法序列化为 JSON、或调用了不支持的操作）
//! - `AppError`：应用层命令分发/处理失败
//! - `ConfigError`：配置加载失败
//!
use thiserror::Error;

/// 脱敏序列化错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RedactionError {
    /// 值无法序列化为 JSON（如 map 键非字符串、自定义 `Serialize` 报错）
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 序列化器只写不读，反序列化等操作一律拒绝
    #[error("unsupported operation: {operation}")]
    Unsupported { operation: &'static str },
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("authorization: {0}")]
    Authorization(String),

    #[error("infra: {0}")]
    Infra(String),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("redaction: {0}")]
    Redaction(#[from] RedactionError),
}

/// 配置加载错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
}
