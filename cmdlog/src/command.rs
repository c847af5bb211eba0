use serde::Serialize;

pub use cmdlog_macros::command;

/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，通常会修改领域状态。
/// - 不返回业务数据，仅表达执行结果（成功/失败）；
/// - 字段由编译期生成的 `Serialize` 实现枚举，审计日志据此输出（并脱敏）命令内容；
/// - 建议保持语义化的“动宾结构”命名，如 `CreateUser`、`ChangePassword`。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`。
///
/// 通常借助 [`command`] 宏实现：
///
/// ```rust
/// use cmdlog::command::{Command, command};
///
/// #[command]
/// struct CreateUser {
///     username: String,
///     password: String,
/// }
///
/// #[command(name = "user.rename")]
/// struct RenameUser {
///     username: String,
/// }
///
/// assert_eq!(CreateUser::NAME, "CreateUser");
/// assert_eq!(RenameUser::NAME, "user.rename");
/// ```
pub trait Command: Serialize + Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;
}
