//! 依赖解析
//!
//! 绑定器只依赖 [`DependencyResolver`] 这一个能力：根据类型标识创建实例。
//! [`TypeRegistry`] 是一个按类型注册工厂的简单实现，[`ChainResolver`]
//! 按顺序组合多个解析器。

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptor::TypeKey;
use crate::error::{ResolveError, ResolveResult};
use crate::Scope;

/// 解析出的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 依赖解析器
pub trait DependencyResolver: Send + Sync {
    /// 创建或获取 `ty` 对应的实例
    fn make(&self, ty: &TypeKey) -> ResolveResult<Instance>;

    /// 是否能够解析 `ty`
    fn can_make(&self, ty: &TypeKey) -> bool;
}

impl<R: DependencyResolver + ?Sized> DependencyResolver for &R {
    fn make(&self, ty: &TypeKey) -> ResolveResult<Instance> {
        (**self).make(ty)
    }

    fn can_make(&self, ty: &TypeKey) -> bool {
        (**self).can_make(ty)
    }
}

impl<R: DependencyResolver + ?Sized> DependencyResolver for Arc<R> {
    fn make(&self, ty: &TypeKey) -> ResolveResult<Instance> {
        (**self).make(ty)
    }

    fn can_make(&self, ty: &TypeKey) -> bool {
        (**self).can_make(ty)
    }
}

/// 不解析任何类型的解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl DependencyResolver for NoopResolver {
    fn make(&self, ty: &TypeKey) -> ResolveResult<Instance> {
        Err(ResolveError::NotRegistered(ty.name().to_string()))
    }

    fn can_make(&self, _ty: &TypeKey) -> bool {
        false
    }
}

type Factory = Arc<dyn Fn() -> anyhow::Result<Instance> + Send + Sync>;

/// 类型注册信息
#[derive(Clone)]
struct Registration {
    type_name: &'static str,
    scope: Scope,
    factory: Factory,
    /// 单例实例，每个注册各自持有
    singleton: Arc<OnceCell<Instance>>,
}

impl Registration {
    fn construct(&self) -> ResolveResult<Instance> {
        (self.factory)().map_err(|source| ResolveError::ConstructionFailed {
            type_name: self.type_name.to_string(),
            source,
        })
    }
}

/// 按类型注册的解析器
///
/// 单例在首次解析时创建，并发解析时工厂也只会被调用一次；原型每次解析都调用工厂。
/// 重复注册同一类型会覆盖之前的注册，连同已创建的单例。
#[derive(Default)]
pub struct TypeRegistry {
    registrations: RwLock<HashMap<TypeId, Registration>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册已构建好的实例
    pub fn register_instance<T: Any + Send + Sync>(&self, value: T) {
        let instance: Instance = Arc::new(value);
        let cached = Arc::clone(&instance);
        self.insert::<T>(
            Scope::Singleton,
            Arc::new(move || Ok(Arc::clone(&cached))),
            OnceCell::with_value(instance),
        );
    }

    /// 注册单例工厂（延迟创建）
    pub fn register_singleton<T, F>(&self, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.insert::<T>(Scope::Singleton, erase(factory), OnceCell::new());
    }

    /// 注册原型工厂
    pub fn register_prototype<T, F>(&self, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.insert::<T>(Scope::Prototype, erase(factory), OnceCell::new());
    }

    /// 是否注册了类型 `T`
    pub fn contains<T: Any>(&self) -> bool {
        self.registrations.read().contains_key(&TypeId::of::<T>())
    }

    /// 解析类型 `T` 的实例
    pub fn get<T: Any + Send + Sync>(&self) -> ResolveResult<Arc<T>> {
        let key = TypeKey::of::<T>();
        self.make(&key)?
            .downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch(key.name().to_string()))
    }

    /// 已注册的类型名称
    pub fn type_names(&self) -> Vec<&'static str> {
        self.registrations
            .read()
            .values()
            .map(|registration| registration.type_name)
            .collect()
    }

    fn insert<T: Any>(&self, scope: Scope, factory: Factory, singleton: OnceCell<Instance>) {
        let type_name = std::any::type_name::<T>();
        self.registrations.write().insert(
            TypeId::of::<T>(),
            Registration {
                type_name,
                scope,
                factory,
                singleton: Arc::new(singleton),
            },
        );
        tracing::debug!(type_name, ?scope, "Registered type");
    }
}

fn erase<T, F>(factory: F) -> Factory
where
    T: Any + Send + Sync,
    F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
{
    Arc::new(move || factory().map(|value| Arc::new(value) as Instance))
}

impl DependencyResolver for TypeRegistry {
    fn make(&self, ty: &TypeKey) -> ResolveResult<Instance> {
        // 工厂调用前释放读锁，工厂内部可以再访问注册表
        let registration = {
            let registrations = self.registrations.read();
            registrations
                .get(&ty.id())
                .cloned()
                .ok_or_else(|| ResolveError::NotRegistered(ty.name().to_string()))?
        };

        match registration.scope {
            Scope::Singleton => registration
                .singleton
                .get_or_try_init(|| registration.construct())
                .map(Arc::clone),
            Scope::Prototype => registration.construct(),
        }
    }

    fn can_make(&self, ty: &TypeKey) -> bool {
        self.registrations.read().contains_key(&ty.id())
    }
}

/// 按顺序尝试多个解析器，第一个成功的结果生效
#[derive(Default)]
pub struct ChainResolver {
    resolvers: Vec<Arc<dyn DependencyResolver>>,
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: Arc<dyn DependencyResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }
}

impl DependencyResolver for ChainResolver {
    fn make(&self, ty: &TypeKey) -> ResolveResult<Instance> {
        let mut last_error = None;
        for resolver in &self.resolvers {
            match resolver.make(ty) {
                Ok(instance) => return Ok(instance),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| ResolveError::NotRegistered(ty.name().to_string())))
    }

    fn can_make(&self, ty: &TypeKey) -> bool {
        self.resolvers.iter().any(|resolver| resolver.can_make(ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct UserRepository {
        id: usize,
    }

    struct Mailer;

    #[test]
    fn test_singleton_is_created_once() {
        let registry = TypeRegistry::new();
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        registry.register_singleton(move || {
            Ok(UserRepository {
                id: counter.fetch_add(1, Ordering::SeqCst),
            })
        });

        let first = registry.get::<UserRepository>().unwrap();
        let second = registry.get::<UserRepository>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_prototype_creates_new_instances() {
        let registry = TypeRegistry::new();
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        registry.register_prototype(move || {
            Ok(UserRepository {
                id: counter.fetch_add(1, Ordering::SeqCst),
            })
        });

        assert_eq!(registry.get::<UserRepository>().unwrap().id, 0);
        assert_eq!(registry.get::<UserRepository>().unwrap().id, 1);
    }

    #[test]
    fn test_registered_instance() {
        let registry = TypeRegistry::new();
        registry.register_instance(UserRepository { id: 7 });

        assert!(registry.contains::<UserRepository>());
        assert_eq!(*registry.get::<UserRepository>().unwrap(), UserRepository { id: 7 });
    }

    #[test]
    fn test_concurrent_singleton_is_created_once() {
        let registry = TypeRegistry::new();
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        registry.register_singleton(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            Ok(UserRepository {
                id: counter.fetch_add(1, Ordering::SeqCst),
            })
        });

        let instances: Vec<Arc<UserRepository>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| registry.get::<UserRepository>().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
    }

    #[test]
    fn test_factory_may_use_registry() {
        let registry = Arc::new(TypeRegistry::new());
        registry.register_instance(Mailer);
        let inner = Arc::clone(&registry);
        registry.register_singleton(move || {
            inner.get::<Mailer>()?;
            // 工厂内注册其他类型不会阻塞
            inner.register_prototype(|| Ok(7u8));
            Ok(UserRepository { id: 1 })
        });

        assert_eq!(registry.get::<UserRepository>().unwrap().id, 1);
        assert!(registry.contains::<u8>());
    }

    #[test]
    fn test_reregistration_replaces_singleton() {
        let registry = TypeRegistry::new();
        registry.register_instance(UserRepository { id: 1 });
        assert_eq!(registry.get::<UserRepository>().unwrap().id, 1);

        registry.register_singleton(|| Ok(UserRepository { id: 2 }));
        assert_eq!(registry.get::<UserRepository>().unwrap().id, 2);
    }

    #[test]
    fn test_unregistered_and_failing_types() {
        let registry = TypeRegistry::new();
        registry.register_singleton::<Mailer, _>(|| Err(anyhow::anyhow!("smtp unreachable")));

        assert!(matches!(
            registry.make(&TypeKey::of::<UserRepository>()),
            Err(ResolveError::NotRegistered(_))
        ));
        assert!(matches!(
            registry.make(&TypeKey::of::<Mailer>()),
            Err(ResolveError::ConstructionFailed { .. })
        ));
        assert!(registry.can_make(&TypeKey::of::<Mailer>()));
    }

    #[test]
    fn test_chain_resolver_uses_first_success() {
        let empty: Arc<dyn DependencyResolver> = Arc::new(TypeRegistry::new());
        let registry = TypeRegistry::new();
        registry.register_instance(UserRepository { id: 3 });
        let registry: Arc<dyn DependencyResolver> = Arc::new(registry);

        let chain = ChainResolver::new().with(empty).with(registry);

        assert!(chain.can_make(&TypeKey::of::<UserRepository>()));
        let instance = chain.make(&TypeKey::of::<UserRepository>()).unwrap();
        assert_eq!(instance.downcast::<UserRepository>().unwrap().id, 3);
        assert!(chain.make(&TypeKey::of::<Mailer>()).is_err());
        assert!(NoopResolver.make(&TypeKey::of::<Mailer>()).is_err());
    }
}
