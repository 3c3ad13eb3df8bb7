//! 按名称分发的路由表
//!
//! 路由模式支持 `{name}` 与 `:name` 两种写法；提取出的路由参数保持模式中的
//! 声明顺序，再由 [`ControllerDispatcher`] 绑定到处理器参数。

use axum::extract::{FromRequestParts, RawPathParams, Request};
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter};
use axum::Router;
use named_binding_core::{DependencyResolver, MethodDescriptor, RouteValues};
use std::sync::Arc;

use crate::dispatcher::ControllerDispatcher;
use crate::handler::HandlerInvoker;
use crate::request::{RequestContext, RequestScopedResolver};

/// 路由信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteInfo {
    /// HTTP 方法
    pub method: &'static str,
    /// 声明的路由模式
    pub path: String,
    /// 处理器名称
    pub handler: String,
    /// 路由参数名（按声明顺序）
    pub parameters: Vec<String>,
}

/// 已注册的处理器
struct Endpoint {
    descriptor: MethodDescriptor,
    invoker: Arc<dyn HandlerInvoker>,
    dispatcher: Arc<ControllerDispatcher>,
    resolver: Arc<dyn DependencyResolver>,
}

impl Endpoint {
    async fn handle(&self, request: Request) -> Response {
        let (mut parts, _body) = request.into_parts();
        let path = parts.uri.path().to_string();

        let route_values: RouteValues = match RawPathParams::from_request_parts(&mut parts, &()).await {
            Ok(params) => params.iter().collect(),
            Err(rejection) => {
                tracing::debug!(path = %path, error = %rejection, "Rejected route parameters");
                return rejection.into_response();
            }
        };

        let resolver = RequestScopedResolver::new(
            RequestContext::from_parts(&parts),
            Arc::clone(&self.resolver),
        );

        match self
            .dispatcher
            .dispatch(&self.descriptor, &route_values, &resolver, self.invoker.as_ref())
            .await
        {
            Ok(response) => response,
            Err(e) => e.to_error_response(&path).into_response(),
        }
    }
}

/// 路由构建器
pub struct NamedRouter {
    dispatcher: Arc<ControllerDispatcher>,
    resolver: Arc<dyn DependencyResolver>,
    router: Router,
    routes: Vec<RouteInfo>,
}

impl NamedRouter {
    pub fn new(dispatcher: Arc<ControllerDispatcher>, resolver: Arc<dyn DependencyResolver>) -> Self {
        Self {
            dispatcher,
            resolver,
            router: Router::new(),
            routes: Vec::new(),
        }
    }

    /// 注册路由
    pub fn route<H>(
        mut self,
        method: MethodFilter,
        pattern: &str,
        descriptor: MethodDescriptor,
        handler: H,
    ) -> Self
    where
        H: HandlerInvoker + 'static,
    {
        let info = RouteInfo {
            method: method_name(method),
            path: pattern.to_string(),
            handler: descriptor.name().to_string(),
            parameters: pattern_parameters(pattern),
        };
        tracing::debug!(
            method = info.method,
            path = %info.path,
            handler = %info.handler,
            "Registering named route"
        );

        let endpoint = Arc::new(Endpoint {
            descriptor,
            invoker: Arc::new(handler),
            dispatcher: Arc::clone(&self.dispatcher),
            resolver: Arc::clone(&self.resolver),
        });
        let service = move |request: Request| {
            let endpoint = Arc::clone(&endpoint);
            async move { endpoint.handle(request).await }
        };

        self.router = self.router.route(&to_axum_path(pattern), on(method, service));
        self.routes.push(info);
        self
    }

    pub fn get<H: HandlerInvoker + 'static>(self, pattern: &str, descriptor: MethodDescriptor, handler: H) -> Self {
        self.route(MethodFilter::GET, pattern, descriptor, handler)
    }

    pub fn post<H: HandlerInvoker + 'static>(self, pattern: &str, descriptor: MethodDescriptor, handler: H) -> Self {
        self.route(MethodFilter::POST, pattern, descriptor, handler)
    }

    pub fn put<H: HandlerInvoker + 'static>(self, pattern: &str, descriptor: MethodDescriptor, handler: H) -> Self {
        self.route(MethodFilter::PUT, pattern, descriptor, handler)
    }

    pub fn delete<H: HandlerInvoker + 'static>(self, pattern: &str, descriptor: MethodDescriptor, handler: H) -> Self {
        self.route(MethodFilter::DELETE, pattern, descriptor, handler)
    }

    /// 已注册的路由
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

fn method_name(method: MethodFilter) -> &'static str {
    [
        (MethodFilter::GET, "GET"),
        (MethodFilter::POST, "POST"),
        (MethodFilter::PUT, "PUT"),
        (MethodFilter::DELETE, "DELETE"),
        (MethodFilter::PATCH, "PATCH"),
        (MethodFilter::HEAD, "HEAD"),
        (MethodFilter::OPTIONS, "OPTIONS"),
        (MethodFilter::TRACE, "TRACE"),
    ]
    .into_iter()
    .find(|(filter, _)| *filter == method)
    .map(|(_, name)| name)
    .unwrap_or("ANY")
}

/// 将 `{name}` 段转换为 axum 的 `:name` 段，`{*name}` 转换为 `*name`
pub fn to_axum_path(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) if name.starts_with('*') => name.to_string(),
            Some(name) => format!(":{}", name),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// 路由模式中声明的参数名
pub fn pattern_parameters(pattern: &str) -> Vec<String> {
    pattern
        .split('/')
        .filter_map(|segment| {
            segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .map(|name| name.trim_start_matches('*'))
                .or_else(|| segment.strip_prefix(':'))
                .or_else(|| segment.strip_prefix('*'))
        })
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::Json;
    use http_body_util::BodyExt;
    use named_binding_core::{ResolvedArguments, TypeRegistry};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct Greeter;

    impl Greeter {
        fn greet(&self, name: &str) -> String {
            format!("hello {}", name)
        }
    }

    fn router(dispatcher: Arc<ControllerDispatcher>) -> Router {
        let registry = TypeRegistry::new();
        registry.register_instance(Greeter);

        NamedRouter::new(dispatcher, Arc::new(registry))
            .get(
                "/users/{user}/posts/{post}",
                MethodDescriptor::new("orderedParams").param("user").param("post"),
                handler_fn(|args: ResolvedArguments| async move {
                    Json(json!({ "user": args.str(0), "post": args.str(1) }))
                }),
            )
            .get(
                "/users/{user}/posts/{post}/reversed",
                MethodDescriptor::new("reversedParams").param("post").param("user"),
                handler_fn(|args: ResolvedArguments| async move {
                    Json(json!({ "post": args.str(0), "user": args.str(1) }))
                }),
            )
            .get(
                "/greet/:user_name",
                MethodDescriptor::new("greet").typed::<Greeter>("greeter").param("userName"),
                handler_fn(|args: ResolvedArguments| async move {
                    let greeter = args.instance::<Greeter>(0);
                    let name = args.str(1).unwrap_or_default();
                    Json(json!({ "message": greeter.map(|g| g.greet(name)) }))
                }),
            )
            .get(
                "/optional/{item}",
                MethodDescriptor::new("optional").param_with_default("item", "none"),
                handler_fn(|args: ResolvedArguments| async move {
                    Json(json!({ "item": args.str(0) }))
                }),
            )
            .get(
                "/files/{*path}",
                MethodDescriptor::new("download").param("path"),
                handler_fn(|args: ResolvedArguments| async move {
                    Json(json!({ "path": args.str(0) }))
                }),
            )
            .get(
                "/comments/{comment}",
                MethodDescriptor::new("missing").param("post"),
                handler_fn(|_args: ResolvedArguments| async move { StatusCode::OK }),
            )
            .into_router()
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(HttpRequest::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[test]
    fn test_pattern_helpers() {
        assert_eq!(to_axum_path("/users/{user}/posts/{post}"), "/users/:user/posts/:post");
        assert_eq!(to_axum_path("/users/:user"), "/users/:user");
        assert_eq!(to_axum_path("/files/{*path}"), "/files/*path");
        assert_eq!(to_axum_path("/files/*path"), "/files/*path");
        assert_eq!(pattern_parameters("/users/{user_id}/posts/:post"), vec!["user_id", "post"]);
        assert_eq!(pattern_parameters("/files/{*path}"), vec!["path"]);
        assert_eq!(pattern_parameters("/files/*path"), vec!["path"]);
        assert!(pattern_parameters("/health").is_empty());
    }

    #[tokio::test]
    async fn test_routes_bind_by_name() {
        let dispatcher = Arc::new(ControllerDispatcher::default());

        let (status, body) = get(router(Arc::clone(&dispatcher)), "/users/123/posts/456").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "user": "123", "post": "456" }));

        let (status, body) = get(router(Arc::clone(&dispatcher)), "/users/123/posts/456/reversed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "post": "456", "user": "123" }));
    }

    #[tokio::test]
    async fn test_route_injects_registered_dependency() {
        let dispatcher = Arc::new(ControllerDispatcher::default());

        let (status, body) = get(router(dispatcher), "/greet/ada").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "hello ada" }));
    }

    #[tokio::test]
    async fn test_unresolved_parameter_returns_error_response() {
        let dispatcher = Arc::new(ControllerDispatcher::default());

        let (status, body) = get(router(dispatcher), "/comments/9").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["path"], "/comments/9");
        assert_eq!(body["details"], json!({ "parameter": "post", "available": ["comment"] }));
    }

    #[tokio::test]
    async fn test_invalid_path_encoding_is_rejected() {
        let dispatcher = Arc::new(ControllerDispatcher::default());

        let (status, _) = get(router(Arc::clone(&dispatcher)), "/optional/%FF").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(router(dispatcher), "/optional/book").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "item": "book" }));
    }

    #[tokio::test]
    async fn test_wildcard_route_binds_remaining_path() {
        let dispatcher = Arc::new(ControllerDispatcher::default());

        let (status, body) = get(router(dispatcher), "/files/docs/readme.md").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "path": "docs/readme.md" }));
    }

    #[tokio::test]
    async fn test_disabled_binding_uses_pattern_order() {
        let dispatcher = Arc::new(ControllerDispatcher::default());
        dispatcher.set_enabled(false);

        let (status, body) = get(router(dispatcher), "/users/123/posts/456/reversed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "post": "123", "user": "456" }));
    }

    #[test]
    fn test_route_info() {
        let named = NamedRouter::new(Arc::new(ControllerDispatcher::default()), Arc::new(TypeRegistry::new()))
            .post(
                "/users/{user}",
                MethodDescriptor::new("update").param("user"),
                handler_fn(|_args: ResolvedArguments| async move { StatusCode::NO_CONTENT }),
            );

        assert_eq!(
            named.routes(),
            [RouteInfo {
                method: "POST",
                path: "/users/{user}".to_string(),
                handler: "update".to_string(),
                parameters: vec!["user".to_string()],
            }]
        );
    }
}
