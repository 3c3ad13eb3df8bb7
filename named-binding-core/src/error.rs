//! 错误类型
//!
//! 绑定、依赖解析、配置加载与日志初始化各自拥有独立的错误枚举。
//! 用户提供的工厂闭包统一使用 `anyhow::Result`，通过 `.context()` 添加上下文。

use thiserror::Error;

/// 参数绑定错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// 没有任何解析步骤能为该参数提供值
    #[error(
        "Unable to resolve parameter [{parameter}] for handler method. Available route parameters: {}",
        available.join(", ")
    )]
    UnresolvedParameter {
        /// 参数名
        parameter: String,
        /// 当前路由中可用的参数名（按路由声明顺序）
        available: Vec<String>,
    },
}

impl BindingError {
    /// 无法解析的参数名
    pub fn parameter(&self) -> &str {
        match self {
            BindingError::UnresolvedParameter { parameter, .. } => parameter,
        }
    }

    /// 可用的路由参数名
    pub fn available(&self) -> &[String] {
        match self {
            BindingError::UnresolvedParameter { available, .. } => available,
        }
    }
}

/// 依赖解析错误
///
/// 绑定器在类型解析步骤中会吞掉此错误，继续尝试默认值与可空回退
#[derive(Error, Debug)]
pub enum ResolveError {
    /// 类型未注册
    #[error("No provider registered for type '{0}'")]
    NotRegistered(String),

    /// 工厂创建实例失败
    #[error("Failed to construct '{type_name}': {source}")]
    ConstructionFailed {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    /// 注册的实例类型与请求的类型不一致
    #[error("Registered instance for '{0}' has a different type")]
    TypeMismatch(String),
}

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Logging initialization failed: {0}")]
    InitFailed(String),
}

/// 绑定结果
pub type BindingResult<T> = std::result::Result<T, BindingError>;

/// 依赖解析结果
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// 通用结果类型
pub use anyhow::Result;
