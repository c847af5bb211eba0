use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 命令处理器：一个命令类型恰好由一个处理器处理
///
/// 横切关注点（如审计日志）以装饰器形式包裹处理器，
/// 参见 [`LoggingCommandHandler`](crate::logging::LoggingCommandHandler)。
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>;
}
