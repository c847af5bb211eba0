use crate::{
    command::Command, command_bus::CommandBus, command_handler::CommandHandler,
    context::AppContext, error::AppError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{Any, TypeId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type CmdHandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>>;

/// 类型擦除后的命令及其命令名
struct ErasedCommand {
    name: &'static str,
    cmd: Box<dyn Any + Send>,
}

type CmdHandlerFn =
    Arc<dyn for<'a> Fn(ErasedCommand, &'a AppContext) -> CmdHandlerFuture<'a> + Send + Sync>;

/// 基于内存的 CommandBus 实现
/// - 通过 TypeId 注册不同 Command 对应的 Handler（每个命令类型恰好一个）
/// - 运行时以类型擦除（Any）方式进行调度
/// - 审计日志等横切逻辑通过装饰处理器组合，例如注册
///   `LoggingCommandHandler::new(handler, logger)`
pub struct InMemoryCommandBus {
    handlers: DashMap<TypeId, (&'static str, CmdHandlerFn)>,
}

impl Default for InMemoryCommandBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册命令处理器
    pub fn register<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let key = TypeId::of::<C>();

        let f: CmdHandlerFn = Arc::new(move |erased: ErasedCommand, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                // 正常情况下这里的 downcast 永远不会失败（键与闭包同一泛型 C）
                match erased.cmd.downcast::<C>() {
                    Ok(cmd) => handler.handle(ctx, *cmd).await,
                    Err(_) => Err(AppError::TypeMismatch {
                        expected: C::NAME,
                        found: erased.name,
                    }),
                }
            })
        });

        // entry 保证检查与插入的原子性
        match self.handlers.entry(key) {
            Entry::Occupied(_) => {
                Err(AppError::AlreadyRegisteredCommand { command: C::NAME })
            }
            Entry::Vacant(slot) => {
                slot.insert((C::NAME, f));
                tracing::debug!(command = C::NAME, "command handler registered");
                Ok(())
            }
        }
    }

    /// 获取已注册的命令名列表（只读视图）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().0).collect()
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    async fn dispatch<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError> {
        let Some(f) = self
            .handlers
            .get(&TypeId::of::<C>())
            .map(|h| h.value().1.clone())
        else {
            return Err(AppError::HandlerNotFound(C::NAME));
        };

        tracing::debug!(command = C::NAME, "dispatching command");

        let erased = ErasedCommand {
            name: C::NAME,
            cmd: Box::new(cmd),
        };
        (f)(erased, ctx).await
    }
}
