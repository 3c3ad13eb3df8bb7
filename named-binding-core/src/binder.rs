//! 参数绑定器
//!
//! 将路由参数按名称（而不是位置）绑定到处理器参数。每个参数依次尝试：
//!
//! 1. 同名路由参数
//! 2. snake_case 形式的同名路由参数
//! 3. camelCase 形式的同名路由参数
//! 4. 非基本类型参数交给依赖解析器（失败时继续向下）
//! 5. 默认值
//! 6. 可空参数取空值
//! 7. 以上都不满足时返回 [`BindingError::UnresolvedParameter`]
//!
//! 前三步由 [`match_route_value`] 实现，所有绑定器共用。

use crate::config::{BindingProperties, BindingStrategy};
use crate::descriptor::ParameterDescriptor;
use crate::error::{BindingError, BindingResult};
use crate::resolver::DependencyResolver;
use crate::route::{Argument, ResolvedArguments, RouteValues};
use crate::utils::naming::candidate_keys;
use std::sync::Arc;

/// 绑定策略
pub trait Binder: Send + Sync {
    /// 策略名称（用于日志）
    fn name(&self) -> &'static str;

    /// 为 `parameters` 生成按声明顺序排列的实参
    fn bind(
        &self,
        route_values: &RouteValues,
        parameters: &[ParameterDescriptor],
        resolver: &dyn DependencyResolver,
    ) -> BindingResult<ResolvedArguments>;
}

/// 在路由参数中查找与参数名匹配的项（原名、snake_case、camelCase）
///
/// 返回匹配到的路由参数名与值
pub fn match_route_value<'a>(
    route_values: &'a RouteValues,
    parameter: &str,
) -> Option<(&'a str, &'a str)> {
    candidate_keys(parameter).iter().find_map(|candidate| {
        route_values
            .iter()
            .find(|(key, _)| *key == candidate.as_str())
    })
}

/// 不依赖路由参数的回退步骤：类型解析、默认值、可空
fn resolve_fallback(
    parameter: &ParameterDescriptor,
    resolver: &dyn DependencyResolver,
) -> Option<Argument> {
    if let Some(ty) = parameter.resolvable_type() {
        match resolver.make(ty) {
            Ok(instance) => return Some(Argument::Instance(instance)),
            Err(e) => {
                tracing::debug!(
                    parameter = parameter.name(),
                    type_name = ty.name(),
                    error = %e,
                    "Dependency resolution failed, falling back"
                );
            }
        }
    }

    if let Some(default) = parameter.default_value() {
        return Some(Argument::Default(default.clone()));
    }

    if parameter.is_nullable() {
        return Some(Argument::Null);
    }

    None
}

fn unresolved(parameter: &ParameterDescriptor, route_values: &RouteValues) -> BindingError {
    BindingError::UnresolvedParameter {
        parameter: parameter.name().to_string(),
        available: route_values.keys(),
    }
}

/// 按名称绑定
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedBinder;

impl NamedBinder {
    fn resolve_parameter(
        parameter: &ParameterDescriptor,
        route_values: &RouteValues,
        resolver: &dyn DependencyResolver,
    ) -> BindingResult<Argument> {
        if let Some((key, value)) = match_route_value(route_values, parameter.name()) {
            tracing::debug!(parameter = parameter.name(), route_key = key, "Bound from route");
            return Ok(Argument::Route(value.to_string()));
        }

        resolve_fallback(parameter, resolver).ok_or_else(|| unresolved(parameter, route_values))
    }
}

impl Binder for NamedBinder {
    fn name(&self) -> &'static str {
        "named"
    }

    fn bind(
        &self,
        route_values: &RouteValues,
        parameters: &[ParameterDescriptor],
        resolver: &dyn DependencyResolver,
    ) -> BindingResult<ResolvedArguments> {
        parameters
            .iter()
            .map(|parameter| Self::resolve_parameter(parameter, route_values, resolver))
            .collect::<BindingResult<Vec<_>>>()
            .map(ResolvedArguments::new)
    }
}

/// 按位置绑定（关闭名称绑定时使用）
///
/// 路由参数按声明顺序逐个分配给参数，忽略名称。非基本类型参数优先交给
/// 解析器，解析成功时不占用路由参数；路由参数用完后依次尝试默认值与可空。
/// 多余的路由参数被忽略。
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalBinder;

impl Binder for PositionalBinder {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn bind(
        &self,
        route_values: &RouteValues,
        parameters: &[ParameterDescriptor],
        resolver: &dyn DependencyResolver,
    ) -> BindingResult<ResolvedArguments> {
        let mut remaining = route_values.values();
        parameters
            .iter()
            .map(|parameter| positional_argument(parameter, &mut remaining, resolver, route_values))
            .collect::<BindingResult<Vec<_>>>()
            .map(ResolvedArguments::new)
    }
}

/// 位置绑定的单个参数：非基本类型先交给解析器，其余取下一个路由参数，
/// 路由参数用完后回退到默认值与可空
fn positional_argument<'a>(
    parameter: &ParameterDescriptor,
    remaining: &mut impl Iterator<Item = &'a str>,
    resolver: &dyn DependencyResolver,
    route_values: &RouteValues,
) -> BindingResult<Argument> {
    if let Some(ty) = parameter.resolvable_type() {
        if let Ok(instance) = resolver.make(ty) {
            return Ok(Argument::Instance(instance));
        }
    }

    match remaining.next() {
        Some(value) => Ok(Argument::Route(value.to_string())),
        None => parameter
            .default_value()
            .map(|default| Argument::Default(default.clone()))
            .or_else(|| parameter.is_nullable().then_some(Argument::Null))
            .ok_or_else(|| unresolved(parameter, route_values)),
    }
}

/// 先按参数顺序重排路由参数，再按位置绑定
///
/// 匹配到的路由参数以参数名为键、按参数声明顺序排列，未匹配的路由参数
/// 保持原顺序追加在末尾。按名称匹配到路由参数的参数直接取该值，不再交给
/// 解析器；其余参数按位置消费未匹配的路由参数。
#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderingBinder;

/// 按参数声明顺序重排路由参数
pub fn reorder_route_values(
    route_values: &RouteValues,
    parameters: &[ParameterDescriptor],
) -> RouteValues {
    let mut reordered = RouteValues::new();
    let mut used: Vec<&str> = Vec::new();

    for parameter in parameters {
        if let Some((key, value)) = match_route_value(route_values, parameter.name()) {
            reordered.insert(parameter.name(), value);
            used.push(key);
        }
    }

    for (key, value) in route_values.iter() {
        if !used.contains(&key) && !reordered.contains_key(key) {
            reordered.insert(key, value);
        }
    }

    reordered
}

impl Binder for ReorderingBinder {
    fn name(&self) -> &'static str {
        "reorder"
    }

    fn bind(
        &self,
        route_values: &RouteValues,
        parameters: &[ParameterDescriptor],
        resolver: &dyn DependencyResolver,
    ) -> BindingResult<ResolvedArguments> {
        let reordered = reorder_route_values(route_values, parameters);
        let is_parameter = |key: &str| parameters.iter().any(|p| p.name() == key);
        let mut leftovers = reordered
            .iter()
            .filter(|(key, _)| !is_parameter(*key))
            .map(|(_, value)| value);

        parameters
            .iter()
            .map(|parameter| match reordered.get(parameter.name()) {
                Some(value) => Ok(Argument::Route(value.to_string())),
                None => positional_argument(parameter, &mut leftovers, resolver, route_values),
            })
            .collect::<BindingResult<Vec<_>>>()
            .map(ResolvedArguments::new)
    }
}

/// 根据配置选择绑定器
pub fn select_binder(properties: &BindingProperties) -> Arc<dyn Binder> {
    if !properties.enabled {
        return Arc::new(PositionalBinder);
    }

    match properties.strategy {
        BindingStrategy::Direct => Arc::new(NamedBinder),
        BindingStrategy::Reorder => Arc::new(ReorderingBinder),
    }
}
