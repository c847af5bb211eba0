//! 命令审计日志（cmdlog）
//!
//! 在命令处理器之前插入一条结构化审计日志：命令名、执行者、以及脱敏后的命令内容（JSON）。
//!
//! - `command` / `command_handler` / `command_bus`：命令分发约定，`#[command]` 宏在编译期生成命令名；
//! - `redaction`：脱敏序列化，按字段名把敏感值替换为 `---`；
//! - `logging`：审计日志记录器与处理器装饰器（`LoggingCommandHandler`）；
//! - `sink`：日志输出端（`tracing` / 内存）；
//! - `config`：启动期加载的只读配置。
//!
//! 典型用法：
//! 1. 用 `#[command]` 定义命令，实现 `CommandHandler`；
//! 2. 由 `CommandLoggingConfig` 构建 `CommandLogger`；
//! 3. 以 `LoggingCommandHandler::new(handler, logger)` 包裹处理器并注册到 `InMemoryCommandBus`。
//!
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod config;
pub mod context;
pub mod error;
pub mod inmemory_command_bus;
pub mod logging;
pub mod redaction;
pub mod sink;

pub use inmemory_command_bus::InMemoryCommandBus;
pub use logging::{CommandLogger, LoggingCommandHandler};
pub use redaction::{RedactingSerializer, RedactionSet};

// 过程宏生成的代码通过该路径引用 serde，调用方无需直接依赖 serde
#[doc(hidden)]
pub mod __private {
    pub use serde;
}

// 允许在本 crate 内部通过 ::cmdlog 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::cmdlog 路径。
extern crate self as cmdlog;
