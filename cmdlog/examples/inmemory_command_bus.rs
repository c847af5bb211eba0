use async_trait::async_trait;
use cmdlog::InMemoryCommandBus;
use cmdlog::command::command;
use cmdlog::command_bus::CommandBus;
use cmdlog::command_handler::CommandHandler;
use cmdlog::context::AppContext;
use cmdlog::error::AppError;
use cmdlog::logging::{CommandLogger, LoggingCommandHandler};
use cmdlog::redaction::{RedactingSerializer, RedactionSet};
use cmdlog::sink::InMemoryLogSink;
use std::sync::Arc;

#[command]
struct CreateUser {
    name: String,
    password: String,
}

struct CreateUserHandler;

#[async_trait]
impl CommandHandler<CreateUser> for CreateUserHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: CreateUser) -> Result<(), AppError> {
        println!("CreateUser: name={}", cmd.name);
        Ok(())
    }
}

#[command]
struct DeleteUser {
    id: u32,
}

struct DeleteUserHandler;

#[async_trait]
impl CommandHandler<DeleteUser> for DeleteUserHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: DeleteUser) -> Result<(), AppError> {
        println!("DeleteUser: id={}", cmd.id);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 内存输出端便于直接打印审计日志
    let sink = Arc::new(InMemoryLogSink::new());
    let logger = Arc::new(CommandLogger::new(
        RedactingSerializer::new(RedactionSet::new(["password"])),
        sink.clone(),
    ));

    let bus = InMemoryCommandBus::new();
    bus.register::<CreateUser, _>(Arc::new(LoggingCommandHandler::new(
        CreateUserHandler,
        logger.clone(),
    )))?;
    bus.register::<DeleteUser, _>(Arc::new(LoggingCommandHandler::new(
        DeleteUserHandler,
        logger,
    )))?;

    let ctx = AppContext::builder()
        .correlation_id("cor-1".into())
        .actor_id("u-1".into())
        .actor_name("admin".into())
        .build();
    bus.dispatch(
        &ctx,
        CreateUser {
            name: "Alice".into(),
            password: "s3cret".into(),
        },
    )
    .await?;
    bus.dispatch(&AppContext::default(), DeleteUser { id: 42 }).await?;

    for line in sink.lines() {
        println!("{line}");
    }

    // 未注册的命令 -> 返回 HandlerNotFound 错误
    #[command]
    struct UpdateUser {
        id: u32,
        name: String,
    }

    if let Err(AppError::HandlerNotFound(name)) = bus
        .dispatch(
            &ctx,
            UpdateUser {
                id: 7,
                name: "Eve".into(),
            },
        )
        .await
    {
        eprintln!("HandlerNotFound as expected for command: {}", name);
    }
    Ok(())
}
