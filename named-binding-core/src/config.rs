use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::constants::{
    NAMED_ROUTE_BINDING_ENABLED, NAMED_ROUTE_BINDING_STRATEGY,
};
use crate::error::ConfigError;

/// 配置值类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<ConfigValue>),
    Object(HashMap<String, ConfigValue>),
}

impl ConfigValue {
    /// 转换为字符串
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 转换为整数
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// 转换为布尔值
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::Int(i) => Some(*i != 0),
            ConfigValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Some(true),
                "false" | "no" | "0" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// 配置源 trait
pub trait PropertySource: Send + Sync {
    /// 获取配置源名称
    fn name(&self) -> &str;

    /// 获取配置值
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// 获取所有配置键
    fn keys(&self) -> Vec<String>;

    /// 配置源优先级（数字越大优先级越高）
    fn priority(&self) -> i32 {
        0
    }
}

/// Environment - 配置管理器
///
/// 按优先级依次查询各配置源，第一个命中的值生效
#[derive(Default)]
pub struct Environment {
    /// 配置源列表（按优先级降序）
    sources: RwLock<Vec<Box<dyn PropertySource>>>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("sources", &self.source_names())
            .finish()
    }
}

impl Environment {
    /// 创建新的环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 带有进程环境变量配置源的环境
    pub fn with_system_env() -> Self {
        let env = Self::new();
        env.add_property_source(Box::new(EnvironmentPropertySource::new("")));
        env
    }

    /// 添加配置源
    pub fn add_property_source(&self, source: Box<dyn PropertySource>) {
        let mut sources = self.sources.write();
        sources.push(source);
        // 按优先级降序排序
        sources.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// 所有配置源名称（按查询顺序）
    pub fn source_names(&self) -> Vec<String> {
        self.sources.read().iter().map(|s| s.name().to_string()).collect()
    }

    /// 获取配置值
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        let sources = self.sources.read();
        for source in sources.iter() {
            if let Some(value) = source.get(key) {
                tracing::debug!("Config '{}' found in source '{}'", key, source.name());
                return Some(value);
            }
        }
        tracing::debug!("Config '{}' not found in any source", key);
        None
    }

    /// 获取字符串配置
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(String::from))
    }

    /// 获取字符串配置（带默认值）
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }

    /// 获取整数配置
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    /// 获取布尔值配置
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    /// 获取布尔值配置（带默认值）
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }
}

// ========== Property Sources ==========

/// 环境变量配置源
pub struct EnvironmentPropertySource {
    prefix: String,
    priority: i32,
}

impl EnvironmentPropertySource {
    /// 创建环境变量配置源
    ///
    /// # 参数
    /// * `prefix` - 环境变量前缀，例如 "APP_"；为空时直接使用配置键
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            priority: 100, // 环境变量优先级较高
        }
    }

    /// 将环境变量名转换为配置键
    /// 例如: APP_DATABASE_URL -> database.url
    fn env_to_key(&self, env_key: &str) -> String {
        let stripped = env_key.strip_prefix(&self.prefix).unwrap_or(env_key);
        stripped.to_lowercase().replace('_', ".")
    }

    /// 将配置键转换为环境变量名
    /// 例如: named-route-binding.enabled -> NAMED_ROUTE_BINDING_ENABLED
    fn key_to_env(&self, key: &str) -> String {
        format!(
            "{}{}",
            self.prefix,
            key.replace(['.', '-'], "_").to_uppercase()
        )
    }
}

impl PropertySource for EnvironmentPropertySource {
    fn name(&self) -> &str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        std::env::var(self.key_to_env(key))
            .ok()
            .map(ConfigValue::String)
    }

    fn keys(&self) -> Vec<String> {
        std::env::vars()
            .filter(|(k, _)| k.starts_with(&self.prefix))
            .map(|(k, _)| self.env_to_key(&k))
            .collect()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// TOML 文件配置源
pub struct TomlPropertySource {
    name: String,
    properties: HashMap<String, ConfigValue>,
    priority: i32,
}

impl TomlPropertySource {
    /// 从文件加载 TOML 配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content, path.to_string_lossy().to_string())
    }

    /// 从字符串解析 TOML 配置
    pub fn parse(content: &str, name: impl Into<String>) -> Result<Self, ConfigError> {
        let value: toml::Value = toml::from_str(content)?;

        let mut properties = HashMap::new();
        Self::flatten_toml(&value, String::new(), &mut properties);

        Ok(Self {
            name: name.into(),
            properties,
            priority: 0, // 文件配置优先级最低
        })
    }

    /// 展平 TOML 结构
    /// 例如: { named-route-binding: { enabled: true } } -> { "named-route-binding.enabled": true }
    fn flatten_toml(value: &toml::Value, prefix: String, result: &mut HashMap<String, ConfigValue>) {
        match value {
            toml::Value::Table(table) => {
                for (key, val) in table {
                    let new_prefix = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    Self::flatten_toml(val, new_prefix, result);
                }
            }
            other => {
                result.insert(prefix, Self::toml_value_to_config(other));
            }
        }
    }

    /// 转换 TOML 值为 ConfigValue
    fn toml_value_to_config(value: &toml::Value) -> ConfigValue {
        match value {
            toml::Value::String(s) => ConfigValue::String(s.clone()),
            toml::Value::Integer(i) => ConfigValue::Int(*i),
            toml::Value::Float(f) => ConfigValue::Float(*f),
            toml::Value::Boolean(b) => ConfigValue::Bool(*b),
            toml::Value::Array(arr) => {
                ConfigValue::Array(arr.iter().map(Self::toml_value_to_config).collect())
            }
            toml::Value::Table(table) => ConfigValue::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::toml_value_to_config(v)))
                    .collect(),
            ),
            toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl PropertySource for TomlPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.properties.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 内存配置源（用于测试或运行时配置）
pub struct MapPropertySource {
    name: String,
    properties: HashMap<String, ConfigValue>,
    priority: i32,
}

impl MapPropertySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
            priority: 50,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl PropertySource for MapPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.properties.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

// ========== Binding Properties ==========

/// 启用名称绑定时使用的实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingStrategy {
    /// 逐参数直接解析
    #[default]
    Direct,
    /// 先按参数顺序重排路由参数，再按位置绑定
    Reorder,
}

impl FromStr for BindingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(BindingStrategy::Direct),
            "reorder" => Ok(BindingStrategy::Reorder),
            _ => Err(format!("Invalid binding strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for BindingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingStrategy::Direct => write!(f, "direct"),
            BindingStrategy::Reorder => write!(f, "reorder"),
        }
    }
}

/// 名称绑定配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingProperties {
    /// 是否启用名称绑定（默认：true）
    pub enabled: bool,

    /// 启用时的绑定实现（默认：direct）
    pub strategy: BindingStrategy,
}

impl Default for BindingProperties {
    fn default() -> Self {
        Self {
            enabled: true,
            strategy: BindingStrategy::Direct,
        }
    }
}

impl BindingProperties {
    /// 从 Environment 加载配置
    pub fn from_environment(env: &Environment) -> Self {
        let strategy = match env.get_string(NAMED_ROUTE_BINDING_STRATEGY) {
            Some(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to 'direct'", e);
                BindingStrategy::Direct
            }),
            None => BindingStrategy::Direct,
        };

        Self {
            enabled: env.get_bool_or(NAMED_ROUTE_BINDING_ENABLED, true),
            strategy,
        }
    }
}
