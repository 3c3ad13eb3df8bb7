//! 处理器参数描述
//!
//! 运行时无法反射函数签名，因此每个处理器方法的参数列表通过
//! [`MethodDescriptor`] 显式声明，声明顺序即实参顺序。

use serde_json::Value;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 声明类型标识
///
/// 基本类型（字符串、数字、布尔、字符）不会交给依赖解析器处理
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    primitive: bool,
}

impl TypeKey {
    /// 获取类型 `T` 的标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<T>();
        Self {
            id,
            name: std::any::type_name::<T>(),
            primitive: is_primitive(id),
        }
    }

    /// 类型 ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 类型名称（仅用于诊断）
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 是否为基本类型
    pub fn is_primitive(&self) -> bool {
        self.primitive
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeKey")
            .field("name", &self.name)
            .field("primitive", &self.primitive)
            .finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn is_primitive(id: TypeId) -> bool {
    [
        TypeId::of::<String>(),
        TypeId::of::<str>(),
        TypeId::of::<&'static str>(),
        TypeId::of::<bool>(),
        TypeId::of::<char>(),
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
        TypeId::of::<Value>(),
    ]
    .contains(&id)
}

/// 单个处理器参数的静态元数据
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name: String,
    declared_type: Option<TypeKey>,
    default: Option<Value>,
    nullable: bool,
}

impl ParameterDescriptor {
    /// 创建无类型参数
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "parameter name must not be empty");
        Self {
            name,
            declared_type: None,
            default: None,
            nullable: false,
        }
    }

    /// 创建声明了类型 `T` 的参数
    pub fn typed<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name).with_type(TypeKey::of::<T>())
    }

    /// 设置声明类型
    pub fn with_type(mut self, declared_type: TypeKey) -> Self {
        self.declared_type = Some(declared_type);
        self
    }

    /// 设置默认值
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// 允许为空
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> Option<&TypeKey> {
        self.declared_type.as_ref()
    }

    /// 需要交给依赖解析器的类型（声明了类型且不是基本类型）
    pub fn resolvable_type(&self) -> Option<&TypeKey> {
        self.declared_type.as_ref().filter(|ty| !ty.is_primitive())
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// 处理器方法描述
///
/// 参数顺序就是调用处理器时的实参顺序
///
/// ```
/// use named_binding_core::descriptor::MethodDescriptor;
///
/// let method = MethodDescriptor::new("withDefault")
///     .param("required")
///     .param_with_default("optional", "default_value");
///
/// assert_eq!(method.parameter_names(), vec!["required", "optional"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodDescriptor {
    name: String,
    parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// 追加参数描述
    pub fn with(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// 追加无类型参数
    pub fn param(self, name: impl Into<String>) -> Self {
        self.with(ParameterDescriptor::new(name))
    }

    /// 追加声明了类型 `T` 的参数
    pub fn typed<T: ?Sized + 'static>(self, name: impl Into<String>) -> Self {
        self.with(ParameterDescriptor::typed::<T>(name))
    }

    /// 追加带默认值的参数
    pub fn param_with_default(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(ParameterDescriptor::new(name).with_default(value))
    }

    /// 追加可空参数
    pub fn nullable(self, name: impl Into<String>) -> Self {
        self.with(ParameterDescriptor::new(name).nullable())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name()).collect()
    }
}
