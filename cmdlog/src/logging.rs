//! 命令执行审计日志（装饰器）
//!
//! 在委托执行之前输出一行审计日志：
//!
//! ```text
//! Executing command '<NAME>' (User: '<actor_name>', Data: '<redacted json>')
//! ```
//!
//! - 命令名取自 [`Command::NAME`]；执行者由调用方显式传入，缺失时输出为空；
//! - 命令内容经 [`RedactingSerializer`] 脱敏；序列化失败不影响委托执行，
//!   内容以 [`UNSERIALIZABLE`] 代替；
//! - 日志严格先于委托，委托恰好执行一次，其结果（含错误）原样返回。
//!
use crate::{
    command::Command,
    command_handler::CommandHandler,
    config::{CommandLoggingConfig, LogLevel},
    context::AppContext,
    error::AppError,
    redaction::RedactingSerializer,
    sink::{AuditEntry, LogSink, TracingLogSink},
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

/// 命令内容无法序列化时的占位文本
pub const UNSERIALIZABLE: &str = "<unserializable>";

/// 格式化审计日志行
pub fn format_line(command: &str, user: Option<&str>, data: &str) -> String {
    format!(
        "Executing command '{command}' (User: '{}', Data: '{data}')",
        user.unwrap_or_default()
    )
}

/// 命令审计日志记录器
///
/// 持有只读的脱敏序列化器与日志输出端，可在多个处理器/并发调用间共享。
#[derive(Clone)]
pub struct CommandLogger {
    serializer: Arc<RedactingSerializer>,
    sink: Arc<dyn LogSink>,
    level: LogLevel,
}

impl Default for CommandLogger {
    fn default() -> Self {
        Self::from_config(&CommandLoggingConfig::default())
    }
}

impl std::fmt::Debug for CommandLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLogger")
            .field("serializer", &self.serializer)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl CommandLogger {
    pub fn new(serializer: RedactingSerializer, sink: Arc<dyn LogSink>) -> Self {
        Self {
            serializer: Arc::new(serializer),
            sink,
            level: LogLevel::Info,
        }
    }

    /// 按配置构建，输出到 `tracing`
    pub fn from_config(config: &CommandLoggingConfig) -> Self {
        Self::new(config.serializer(), Arc::new(TracingLogSink)).with_level(config.level)
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn serializer(&self) -> &RedactingSerializer {
        &self.serializer
    }

    /// 生成审计日志行（不输出）
    pub fn render<C>(&self, cmd: &C, user: Option<&str>) -> String
    where
        C: Command,
    {
        let data = match self.serializer.serialize(cmd) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(
                    command = C::NAME,
                    error = %err,
                    "command payload not serializable, logging placeholder"
                );
                UNSERIALIZABLE.to_string()
            }
        };

        format_line(C::NAME, user, &data)
    }

    /// 输出审计日志行，同时携带 `command`、`user` 字段
    pub fn log_command<C>(&self, cmd: &C, user: Option<&str>)
    where
        C: Command,
    {
        let line = self.render(cmd, user);
        self.sink.write(&AuditEntry {
            level: self.level,
            command: C::NAME,
            user,
            line: &line,
        });
    }

    /// 先记录日志，再将命令交还给 `next` 执行；`next` 的结果原样返回
    ///
    /// 委托在 `command` span 内执行（字段：`command`、`user`）。
    pub async fn log_and_delegate<C, F, Fut, T>(&self, cmd: C, user: Option<&str>, next: F) -> T
    where
        C: Command,
        F: FnOnce(C) -> Fut,
        Fut: Future<Output = T>,
    {
        let span = tracing::info_span!(
            "command",
            command = C::NAME,
            user = user.unwrap_or_default()
        );

        span.in_scope(|| self.log_command(&cmd, user));

        next(cmd).instrument(span).await
    }
}

/// 审计日志装饰器：记录命令后委托给内部处理器
///
/// 执行者展示名取自 [`AppContext::actor_name`]。
pub struct LoggingCommandHandler<H> {
    inner: H,
    logger: Arc<CommandLogger>,
}

impl<H> LoggingCommandHandler<H> {
    pub fn new(inner: H, logger: Arc<CommandLogger>) -> Self {
        Self { inner, logger }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<C, H> CommandHandler<C> for LoggingCommandHandler<H>
where
    C: Command,
    H: CommandHandler<C>,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError> {
        self.logger
            .log_and_delegate(cmd, ctx.actor_name(), |cmd| self.inner.handle(ctx, cmd))
            .await
    }
}
