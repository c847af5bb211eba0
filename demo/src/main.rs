use anyhow::Context;
use async_trait::async_trait;
use cmdlog::InMemoryCommandBus;
use cmdlog::command::command;
use cmdlog::command_bus::CommandBus;
use cmdlog::command_handler::CommandHandler;
use cmdlog::config::CommandLoggingConfig;
use cmdlog::context::AppContext;
use cmdlog::error::AppError;
use cmdlog::logging::{CommandLogger, LoggingCommandHandler};
use std::collections::HashMap;
use std::env::VarError;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ulid::Ulid;

#[command]
#[serde(rename_all = "PascalCase")]
struct RegisterUser {
    username: String,
    password: String,
}

#[command]
#[serde(rename_all = "PascalCase")]
struct CreatePost {
    title: String,
    body: String,
}

#[derive(Default)]
struct Users {
    passwords: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl CommandHandler<RegisterUser> for Users {
    async fn handle(&self, _ctx: &AppContext, cmd: RegisterUser) -> Result<(), AppError> {
        if cmd.password.len() < 8 {
            return Err(AppError::Validation("password too short".into()));
        }

        let mut passwords = self
            .passwords
            .lock()
            .map_err(|e| AppError::Infra(e.to_string()))?;
        if passwords.contains_key(&cmd.username) {
            return Err(AppError::Validation(format!(
                "user {} already exists",
                cmd.username
            )));
        }
        passwords.insert(cmd.username, cmd.password);
        Ok(())
    }
}

struct Posts;

#[async_trait]
impl CommandHandler<CreatePost> for Posts {
    async fn handle(&self, ctx: &AppContext, cmd: CreatePost) -> Result<(), AppError> {
        let Some(author) = ctx.actor_name() else {
            return Err(AppError::Authorization("anonymous users cannot post".into()));
        };
        tracing::info!(%author, title = %cmd.title, "post created");
        Ok(())
    }
}

fn load_config() -> anyhow::Result<CommandLoggingConfig> {
    config_from(std::env::var("CMDLOG_CONFIG"))
}

// 仅在变量未设置时使用默认配置
fn config_from(var: Result<String, VarError>) -> anyhow::Result<CommandLoggingConfig> {
    match var {
        Ok(path) => CommandLoggingConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config from {path}")),
        Err(VarError::NotPresent) => Ok(CommandLoggingConfig::default()),
        Err(err) => Err(err).context("CMDLOG_CONFIG is not valid unicode"),
    }
}

fn ctx_for(user: Option<&str>) -> AppContext {
    AppContext::builder()
        .correlation_id(Ulid::new().to_string())
        .maybe_actor_name(user.map(str::to_string))
        .build()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cmdlog=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    let logger = Arc::new(CommandLogger::from_config(&config));

    let bus = InMemoryCommandBus::new();
    bus.register::<RegisterUser, _>(Arc::new(LoggingCommandHandler::new(
        Users::default(),
        logger.clone(),
    )))?;
    bus.register::<CreatePost, _>(Arc::new(LoggingCommandHandler::new(Posts, logger)))?;

    bus.dispatch(
        &ctx_for(None),
        RegisterUser {
            username: "alice".into(),
            password: "correct horse battery staple".into(),
        },
    )
    .await?;

    bus.dispatch(
        &ctx_for(Some("alice")),
        CreatePost {
            title: "Hello".into(),
            body: "World".into(),
        },
    )
    .await?;

    // 处理器的错误原样返回，审计日志已在此之前写出
    if let Err(err) = bus
        .dispatch(
            &ctx_for(None),
            CreatePost {
                title: "spam".into(),
                body: "spam".into(),
            },
        )
        .await
    {
        tracing::warn!(%err, "command rejected");
    }

    Ok(())
}
