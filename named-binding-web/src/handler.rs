//! 处理器调用
//!
//! 处理器接收按参数声明顺序排列的 [`ResolvedArguments`]。

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use named_binding_core::ResolvedArguments;
use std::future::Future;

/// 处理器调用器
#[async_trait]
pub trait HandlerInvoker: Send + Sync {
    async fn invoke(&self, arguments: ResolvedArguments) -> Response;
}

/// 将异步闭包适配为 [`HandlerInvoker`]
pub struct HandlerFn<F>(F);

/// 用闭包创建处理器
///
/// ```ignore
/// let show = handler_fn(|args: ResolvedArguments| async move {
///     Json(serde_json::json!({ "user": args.str(0), "post": args.str(1) }))
/// });
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> HandlerFn<F>
where
    F: Fn(ResolvedArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut, R> HandlerInvoker for HandlerFn<F>
where
    F: Fn(ResolvedArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    async fn invoke(&self, arguments: ResolvedArguments) -> Response {
        (self.0)(arguments).await.into_response()
    }
}
