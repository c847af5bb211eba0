use bon::Builder;

/// 应用层上下文（Application Context）
///
/// 承载一次命令调用所需的横切信息，例如：
/// - 关联追踪 `correlation_id`；
/// - 执行者（acting principal）：`actor_id` 与用于审计展示的 `actor_name`；
/// - 幂等键（`idempotency_key`）：用于在基础设施层实现请求幂等。
///
/// 执行者信息由调用方显式传入，不依赖任何全局/隐式的请求上下文；
/// 匿名调用时为空，这是合法状态而非错误。
///
/// 典型用法：
/// ```rust
/// use cmdlog::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123".into())
///     .actor_id("u-1".into())
///     .actor_name("alice".into())
///     .maybe_idempotency_key(None)
///     .build();
///
/// assert_eq!(ctx.actor_name(), Some("alice"));
/// assert_eq!(AppContext::default().actor_name(), None);
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    /// 关联 ID（链路追踪）
    correlation_id: Option<String>,
    /// 执行者 ID
    actor_id: Option<String>,
    /// 执行者展示名（写入审计日志）
    actor_name: Option<String>,
    /// 幂等键（可选）：为空则由上层或基础设施决定是否参与幂等
    idempotency_key: Option<String>,
}

impl AppContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn actor_name(&self) -> Option<&str> {
        self.actor_name.as_deref()
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}
