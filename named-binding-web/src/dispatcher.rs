//! 控制器分发
//!
//! 绑定策略在每次分发时根据当前配置选择一次：启用时按名称绑定，
//! 关闭时退回按位置绑定。

use axum::response::Response;
use named_binding_core::{
    select_binder, Binder, BindingProperties, DependencyResolver, MethodDescriptor, RouteValues,
};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::WebError;
use crate::handler::HandlerInvoker;

/// 控制器分发器
#[derive(Debug, Default)]
pub struct ControllerDispatcher {
    properties: RwLock<BindingProperties>,
}

impl ControllerDispatcher {
    pub fn new(properties: BindingProperties) -> Self {
        Self {
            properties: RwLock::new(properties),
        }
    }

    /// 当前配置
    pub fn properties(&self) -> BindingProperties {
        *self.properties.read()
    }

    /// 替换配置，对之后的分发生效
    pub fn set_properties(&self, properties: BindingProperties) {
        tracing::info!(
            enabled = properties.enabled,
            strategy = %properties.strategy,
            "Named route binding reconfigured"
        );
        *self.properties.write() = properties;
    }

    /// 开启或关闭名称绑定
    pub fn set_enabled(&self, enabled: bool) {
        let mut properties = self.properties();
        properties.enabled = enabled;
        self.set_properties(properties);
    }

    /// 按当前配置选择绑定器
    pub fn binder(&self) -> Arc<dyn Binder> {
        select_binder(&self.properties())
    }

    /// 绑定参数并调用处理器
    pub async fn dispatch(
        &self,
        method: &MethodDescriptor,
        route_values: &RouteValues,
        resolver: &dyn DependencyResolver,
        invoker: &dyn HandlerInvoker,
    ) -> Result<Response, WebError> {
        let binder = self.binder();
        let arguments = binder
            .bind(route_values, method.parameters(), resolver)
            .map_err(|e| {
                tracing::warn!(
                    handler = method.name(),
                    binder = binder.name(),
                    error = %e,
                    "Failed to bind handler parameters"
                );
                WebError::from(e)
            })?;

        tracing::debug!(
            handler = method.name(),
            binder = binder.name(),
            arguments = arguments.len(),
            "Dispatching handler"
        );

        Ok(invoker.invoke(arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use axum::body::to_bytes;
    use axum::Json;
    use named_binding_core::{BindingStrategy, NoopResolver, ResolvedArguments};
    use serde_json::Value;

    fn echo() -> impl HandlerInvoker {
        handler_fn(|args: ResolvedArguments| async move {
            let values: Vec<Value> = args
                .iter()
                .map(|arg| arg.to_json().unwrap_or(Value::Null))
                .collect();
            Json(values)
        })
    }

    async fn body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_by_name() {
        let dispatcher = ControllerDispatcher::default();
        let method = MethodDescriptor::new("reversedParams").param("post").param("user");
        let values = RouteValues::from([("user", "123"), ("post", "456")]);

        let response = dispatcher
            .dispatch(&method, &values, &NoopResolver, &echo())
            .await
            .unwrap();
        assert_eq!(body(response).await, serde_json::json!(["456", "123"]));
    }

    #[tokio::test]
    async fn test_dispatch_positional_when_disabled() {
        let dispatcher = ControllerDispatcher::default();
        dispatcher.set_enabled(false);
        let method = MethodDescriptor::new("reversedParams").param("post").param("user");
        let values = RouteValues::from([("user", "123"), ("post", "456")]);

        let response = dispatcher
            .dispatch(&method, &values, &NoopResolver, &echo())
            .await
            .unwrap();
        assert_eq!(body(response).await, serde_json::json!(["123", "456"]));
        assert_eq!(dispatcher.binder().name(), "positional");
    }

    #[tokio::test]
    async fn test_dispatch_reports_unresolved_parameter() {
        let dispatcher = ControllerDispatcher::new(BindingProperties {
            enabled: true,
            strategy: BindingStrategy::Reorder,
        });
        let method = MethodDescriptor::new("show").param("user").param("comment");
        let values = RouteValues::from([("user", "1")]);

        let err = dispatcher
            .dispatch(&method, &values, &NoopResolver, &echo())
            .await
            .unwrap_err();
        let WebError::UnresolvedParameter(e) = err;
        assert_eq!(e.parameter(), "comment");
        assert_eq!(e.available(), ["user".to_string()]);
    }
}
