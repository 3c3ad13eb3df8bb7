//! 名称绑定插件
//!
//! 负责把配置接入分发器：注册阶段读取 `named-route-binding.*` 配置并创建
//! 分发器与类型注册表，启动阶段输出生效的配置。

use named_binding_core::{
    BindingProperties, ConfigError, DependencyResolver, Environment, TomlPropertySource,
    TypeRegistry,
};
use std::path::Path;
use std::sync::Arc;

use crate::dispatcher::ControllerDispatcher;
use crate::router::NamedRouter;

/// 名称绑定插件
pub struct NamedRouteBindingPlugin {
    environment: Arc<Environment>,
    registry: Arc<TypeRegistry>,
    dispatcher: Arc<ControllerDispatcher>,
}

impl NamedRouteBindingPlugin {
    /// 插件名称
    pub fn name(&self) -> &str {
        "named-route-binding"
    }

    /// 注册阶段 - 从 Environment 读取配置并创建分发器
    pub fn register(environment: Arc<Environment>) -> Self {
        let properties = BindingProperties::from_environment(&environment);
        Self {
            environment,
            registry: Arc::new(TypeRegistry::new()),
            dispatcher: Arc::new(ControllerDispatcher::new(properties)),
        }
    }

    /// 合并 TOML 配置文件（优先级最低），并重新加载配置
    pub fn merge_config_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = TomlPropertySource::from_file(path)?;
        self.environment.add_property_source(Box::new(source));
        self.reload();
        Ok(self)
    }

    /// 启动阶段 - 输出生效的配置
    pub fn boot(&self) {
        let properties = self.dispatcher.properties();
        tracing::info!(
            plugin = self.name(),
            enabled = properties.enabled,
            strategy = %properties.strategy,
            sources = ?self.environment.source_names(),
            "Named route binding booted"
        );
    }

    /// 重新从 Environment 读取配置
    pub fn reload(&self) -> BindingProperties {
        let properties = BindingProperties::from_environment(&self.environment);
        self.dispatcher.set_properties(properties);
        properties
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    /// 应用级类型注册表，处理器依赖在此注册
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Arc<ControllerDispatcher> {
        &self.dispatcher
    }

    /// 创建共享分发器与注册表的路由构建器
    pub fn router(&self) -> NamedRouter {
        let resolver: Arc<dyn DependencyResolver> = self.registry.clone();
        NamedRouter::new(Arc::clone(&self.dispatcher), resolver)
    }
}
