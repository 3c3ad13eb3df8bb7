//! 路由参数与绑定结果

use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 从匹配路径中提取出的路由参数
///
/// 键唯一，迭代顺序为路由模式中的声明顺序，而不是处理器参数顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues {
    entries: Vec<(String, String)>,
}

impl RouteValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入参数；键已存在时原位替换值
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// 按声明顺序返回所有参数名
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    /// 按声明顺序返回所有参数值
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = RouteValues::new();
        for (key, value) in iter {
            values.insert(key, value);
        }
        values
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for RouteValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// 单个已解析的实参
#[derive(Clone)]
pub enum Argument {
    /// 来自路由参数的原始字符串
    Route(String),
    /// 依赖解析器提供的实例
    Instance(Arc<dyn Any + Send + Sync>),
    /// 参数声明的默认值
    Default(Value),
    /// 可空参数的空值
    Null,
}

impl Argument {
    /// 路由值或字符串默认值
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::Route(value) => Some(value),
            Argument::Default(Value::String(value)) => Some(value),
            _ => None,
        }
    }

    /// 将实例向下转型为 `T`
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Argument::Instance(instance) => Arc::clone(instance).downcast::<T>().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Argument::Null)
    }

    /// 转换为 JSON；实例无法序列化，返回 `None`
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Argument::Route(value) => Some(Value::String(value.clone())),
            Argument::Default(value) => Some(value.clone()),
            Argument::Null => Some(Value::Null),
            Argument::Instance(_) => None,
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Route(value) => f.debug_tuple("Route").field(value).finish(),
            Argument::Instance(_) => f.write_str("Instance(..)"),
            Argument::Default(value) => f.debug_tuple("Default").field(value).finish(),
            Argument::Null => f.write_str("Null"),
        }
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Argument::Route(a), Argument::Route(b)) => a == b,
            (Argument::Default(a), Argument::Default(b)) => a == b,
            (Argument::Null, Argument::Null) => true,
            (Argument::Instance(a), Argument::Instance(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// 最终的实参列表，长度与参数描述列表一致
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedArguments {
    arguments: Vec<Argument>,
}

impl ResolvedArguments {
    pub fn new(arguments: Vec<Argument>) -> Self {
        Self { arguments }
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }

    /// 第 `index` 个实参的字符串值
    pub fn str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Argument::as_str)
    }

    /// 第 `index` 个实参的实例
    pub fn instance<T: Any + Send + Sync>(&self, index: usize) -> Option<Arc<T>> {
        self.get(index).and_then(Argument::downcast::<T>)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.arguments.iter()
    }

    pub fn into_inner(self) -> Vec<Argument> {
        self.arguments
    }
}

impl IntoIterator for ResolvedArguments {
    type Item = Argument;
    type IntoIter = std::vec::IntoIter<Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_values_keep_declaration_order() {
        let mut values = RouteValues::new();
        values.insert("user", "123");
        values.insert("post", "456");
        values.insert("user", "999");

        assert_eq!(values.keys(), vec!["user", "post"]);
        assert_eq!(values.get("user"), Some("999"));
        assert_eq!(values.values().collect::<Vec<_>>(), vec!["999", "456"]);
        assert!(!values.contains_key("comment"));
    }

    #[test]
    fn test_argument_accessors() {
        let instance: Arc<dyn Any + Send + Sync> = Arc::new(42u32);
        let args = ResolvedArguments::new(vec![
            Argument::Route("abc".to_string()),
            Argument::Default(Value::from("fallback")),
            Argument::Instance(instance),
            Argument::Null,
        ]);

        assert_eq!(args.len(), 4);
        assert_eq!(args.str(0), Some("abc"));
        assert_eq!(args.str(1), Some("fallback"));
        assert_eq!(args.instance::<u32>(2).as_deref(), Some(&42));
        assert!(args.instance::<String>(2).is_none());
        assert!(args.get(3).is_some_and(Argument::is_null));
        assert_eq!(args.get(3).and_then(Argument::to_json), Some(Value::Null));
    }
}
