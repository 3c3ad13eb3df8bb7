//! 配置常量定义
//!
//! 定义所有使用的配置键名称

/// 是否启用名称绑定（关闭后按位置绑定）
///
/// 对应环境变量 `NAMED_ROUTE_BINDING_ENABLED`
pub const NAMED_ROUTE_BINDING_ENABLED: &str = "named-route-binding.enabled";

/// 启用时的绑定实现：`direct` 或 `reorder`
pub const NAMED_ROUTE_BINDING_STRATEGY: &str = "named-route-binding.strategy";

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "config/named-route-binding.toml";
