//! # Named Binding Web
//!
//! 基于 Axum 的按名称分发：路由参数按名称（而不是位置）绑定到处理器参数
//!
//! ## 核心特性
//!
//! - **名称绑定** - 路由参数与处理器参数按名称匹配，支持 snake_case / camelCase
//! - **依赖注入** - 请求对象与注册的服务通过类型注入
//! - **可关闭** - `named-route-binding.enabled = false` 时退回按位置绑定

pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod plugin;
pub mod request;
pub mod router;
pub mod server;

pub mod prelude {
    //! 预导入模块

    pub use crate::dispatcher::*;
    pub use crate::error::*;
    pub use crate::handler::*;
    pub use crate::plugin::*;
    pub use crate::request::*;
    pub use crate::router::*;
    pub use crate::server::*;

    pub use named_binding_core::prelude::*;

    pub use axum;
    pub use axum::http::StatusCode;
    pub use axum::response::{IntoResponse, Response};
    pub use axum::Json;
}
