//! Web 服务器模块
//!
//! 基于 Axum 的 Web 服务器实现

use anyhow::Context;
use axum::Router;
use named_binding_core::Environment;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::constants::{SERVER_ENABLE_REQUEST_LOGGING, SERVER_HOST, SERVER_PORT};
use crate::middleware::request_logging;

/// Web 服务器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProperties {
    /// 服务器监听地址
    pub host: String,

    /// 服务器监听端口
    pub port: u16,

    /// 是否启用请求日志
    pub enable_request_logging: bool,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_request_logging: true,
        }
    }
}

impl ServerProperties {
    /// 从 Environment 加载配置
    pub fn from_environment(env: &Environment) -> Self {
        let defaults = Self::default();
        Self {
            host: env.get_string_or(SERVER_HOST, &defaults.host),
            port: env
                .get_i64(SERVER_PORT)
                .and_then(|port| u16::try_from(port).ok())
                .unwrap_or(defaults.port),
            enable_request_logging: env
                .get_bool_or(SERVER_ENABLE_REQUEST_LOGGING, defaults.enable_request_logging),
        }
    }

    /// 获取服务器地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Web 服务器
pub struct WebServer {
    config: ServerProperties,
    router: Router,
}

impl WebServer {
    pub fn new(config: ServerProperties, router: Router) -> Self {
        Self { config, router }
    }

    /// 最终对外提供服务的路由（按配置加上请求日志）
    pub fn app(&self) -> Router {
        if self.config.enable_request_logging {
            self.router
                .clone()
                .layer(axum::middleware::from_fn(request_logging))
        } else {
            self.router.clone()
        }
    }

    /// 启动服务器
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.address();
        let app = self.app();

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        tracing::info!("Server listening on http://{}", addr);

        axum::serve(listener, app).await.context("Server error")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use named_binding_core::{ConfigValue, MapPropertySource};

    #[test]
    fn test_server_properties_from_environment() {
        let env = Environment::new();
        env.add_property_source(Box::new(
            MapPropertySource::new("test")
                .with_property(SERVER_PORT, ConfigValue::Int(3000))
                .with_property(SERVER_ENABLE_REQUEST_LOGGING, ConfigValue::Bool(false)),
        ));

        let properties = ServerProperties::from_environment(&env);
        assert_eq!(properties.host, "0.0.0.0");
        assert_eq!(properties.port, 3000);
        assert!(!properties.enable_request_logging);
        assert_eq!(properties.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_port_falls_back_to_default() {
        let env = Environment::new();
        env.add_property_source(Box::new(
            MapPropertySource::new("test").with_property(SERVER_PORT, ConfigValue::Int(70000)),
        ));

        assert_eq!(ServerProperties::from_environment(&env).port, 8080);
    }
}
