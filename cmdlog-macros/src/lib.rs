use proc_macro::TokenStream;

mod command;
mod derive_utils;

/// 命令宏
/// - 为结构体/枚举合并派生 `Debug`、`Serialize`（无需调用方直接依赖 serde）
/// - 自动实现 `::cmdlog::command::Command`，`NAME` 为类型名，字段由 `Serialize` 在编译期枚举
/// - 支持参数：`#[command(name = "...")]` 指定稳定的命令名
///
/// ```ignore
/// #[command]
/// struct ChangePassword {
///     username: String,
///     password: String,
/// }
///
/// #[command(name = "post.create")]
/// #[serde(rename_all = "camelCase")]
/// struct CreatePost {
///     title: String,
///     body: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::expand(attr, item)
}
