// named-binding-core: 按名称绑定路由参数
//
// 将路由参数按名称（而不是位置）绑定到处理器参数，支持：
// - snake_case / camelCase 名称归一化
// - 非基本类型参数通过依赖解析器注入
// - 默认值与可空参数回退
// - 通过配置关闭名称绑定，退回按位置绑定

pub mod binder;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod route;
pub mod scope;
pub mod utils;

// 重新导出常用类型
pub use binder::{
    match_route_value, reorder_route_values, select_binder, Binder, NamedBinder,
    PositionalBinder, ReorderingBinder,
};
pub use config::{
    BindingProperties, BindingStrategy, ConfigValue, Environment, EnvironmentPropertySource,
    MapPropertySource, PropertySource, TomlPropertySource,
};
pub use constants::*;
pub use descriptor::{MethodDescriptor, ParameterDescriptor, TypeKey};
pub use error::{BindingError, BindingResult, ConfigError, LoggingError, ResolveError, ResolveResult, Result};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use resolver::{ChainResolver, DependencyResolver, Instance, NoopResolver, TypeRegistry};
pub use route::{Argument, ResolvedArguments, RouteValues};
pub use scope::Scope;

/// Prelude 模块，包含常用的 traits 和类型
pub mod prelude {
    pub use crate::binder::{select_binder, Binder, NamedBinder, PositionalBinder, ReorderingBinder};
    pub use crate::config::{
        BindingProperties, BindingStrategy, ConfigValue, Environment, EnvironmentPropertySource,
        MapPropertySource, PropertySource, TomlPropertySource,
    };
    pub use crate::descriptor::{MethodDescriptor, ParameterDescriptor, TypeKey};
    pub use crate::error::{BindingError, ResolveError, Result};
    pub use crate::logging::{LogFormat, LogLevel, LoggingConfig};
    pub use crate::resolver::{DependencyResolver, TypeRegistry};
    pub use crate::route::{Argument, ResolvedArguments, RouteValues};
    pub use crate::utils;
    // Re-export anyhow for convenience
    pub use anyhow::{anyhow, Context};
}
