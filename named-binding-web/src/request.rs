//! 请求对象与请求级依赖解析

use axum::extract::Query;
use http::{request::Parts, HeaderMap, Method, Uri};
use named_binding_core::{DependencyResolver, Instance, ResolveResult, TypeKey};
use std::collections::HashMap;
use std::sync::Arc;

/// 当前请求
///
/// 处理器参数声明为 `RequestContext` 类型时，由 [`RequestScopedResolver`] 注入
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: HashMap<String, String>,
}

impl RequestContext {
    pub fn from_parts(parts: &Parts) -> Self {
        let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            query,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// 获取单个查询参数
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// 获取单个请求头（值不是合法 ASCII 时返回 `None`）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// 请求级解析器
///
/// `RequestContext` 由当前请求提供，其余类型交给应用级解析器
pub struct RequestScopedResolver {
    request: Arc<RequestContext>,
    application: Arc<dyn DependencyResolver>,
}

impl RequestScopedResolver {
    pub fn new(request: RequestContext, application: Arc<dyn DependencyResolver>) -> Self {
        Self {
            request: Arc::new(request),
            application,
        }
    }

    pub fn request(&self) -> &Arc<RequestContext> {
        &self.request
    }
}

impl DependencyResolver for RequestScopedResolver {
    fn make(&self, ty: &TypeKey) -> ResolveResult<Instance> {
        if *ty == TypeKey::of::<RequestContext>() {
            return Ok(Arc::clone(&self.request) as Instance);
        }
        self.application.make(ty)
    }

    fn can_make(&self, ty: &TypeKey) -> bool {
        *ty == TypeKey::of::<RequestContext>() || self.application.can_make(ty)
    }
}
