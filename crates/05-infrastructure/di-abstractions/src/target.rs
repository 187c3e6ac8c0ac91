//! 目标描述符
//!
//! 目标是一个可注入单元：普通提供者或模块。名称由注册方显式给出，
//! 依赖清单、模块结构以及是否为作用域资源都在注册时确定。

use crate::factory::{Built, ConstructorFn, ResolvedDependencies};
use crate::manifest::DependencyManifest;
use crate::module::ModuleDescriptor;
use crate::resource::ScopedResource;
use infrastructure_common::{BoxError, TypeInfo};
use std::marker::PhantomData;
use std::sync::Arc;

/// 目标描述符
pub struct TargetDescriptor {
    name: String,
    type_info: TypeInfo,
    manifest: DependencyManifest,
    module: Option<ModuleDescriptor>,
    scoped: bool,
    constructor: ConstructorFn,
}

impl TargetDescriptor {
    /// 开始构建类型 `T` 的目标描述符
    pub fn builder<T: Send + Sync + 'static>(name: impl Into<String>) -> TargetBuilder<T> {
        TargetBuilder {
            name: name.into(),
            manifest: DependencyManifest::new(),
            module: None,
            _marker: PhantomData,
        }
    }

    /// 只负责装配的模块，实例为 [`ModuleInstance`]
    pub fn module(name: impl Into<String>, module: ModuleDescriptor) -> Arc<Self> {
        let name = name.into();
        let instance_name = name.clone();
        Self::builder::<ModuleInstance>(name)
            .module(module)
            .construct(move |_| {
                Ok(ModuleInstance {
                    name: instance_name.clone(),
                })
            })
    }

    /// 取可注入类型的描述符
    pub fn of<T: Injectable>() -> Arc<Self> {
        T::descriptor()
    }

    /// 查找键
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 依赖清单（按声明顺序）
    pub fn manifest(&self) -> &DependencyManifest {
        &self.manifest
    }

    pub fn module_descriptor(&self) -> Option<&ModuleDescriptor> {
        self.module.as_ref()
    }

    pub fn is_module(&self) -> bool {
        self.module.is_some()
    }

    /// 是否声明了作用域资源能力
    pub fn is_scoped(&self) -> bool {
        self.scoped
    }

    /// 用已解析的依赖构造目标
    pub fn construct(&self, dependencies: &ResolvedDependencies) -> Result<Built, BoxError> {
        (self.constructor)(dependencies)
    }
}

impl std::fmt::Debug for TargetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetDescriptor")
            .field("name", &self.name)
            .field("type", &self.type_info.name)
            .field("scoped", &self.scoped)
            .field("manifest", &self.manifest.names())
            .field("module", &self.module)
            .finish()
    }
}

/// 目标描述符构建器
///
/// 以 `construct` 或 `construct_scoped` 结束构建。
pub struct TargetBuilder<T> {
    name: String,
    manifest: DependencyManifest,
    module: Option<ModuleDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> TargetBuilder<T> {
    /// 声明依赖
    pub fn depends_on<D: Send + Sync + 'static>(mut self, name: impl Into<String>) -> Self {
        self.manifest.declare(name, TypeInfo::of::<D>());
        self
    }

    /// 附加模块描述符
    pub fn module(mut self, module: ModuleDescriptor) -> Self {
        self.module = Some(module);
        self
    }

    /// 以普通构造函数结束构建
    pub fn construct<F>(self, constructor: F) -> Arc<TargetDescriptor>
    where
        F: Fn(&ResolvedDependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let constructor: ConstructorFn =
            Arc::new(move |deps: &ResolvedDependencies| constructor(deps).map(Built::plain));
        self.finish(constructor, false)
    }

    fn finish(self, constructor: ConstructorFn, scoped: bool) -> Arc<TargetDescriptor> {
        Arc::new(TargetDescriptor {
            name: self.name,
            type_info: TypeInfo::of::<T>(),
            manifest: self.manifest,
            module: self.module,
            scoped,
            constructor,
        })
    }
}

impl<T: ScopedResource> TargetBuilder<T> {
    /// 以作用域资源构造函数结束构建
    pub fn construct_scoped<F>(self, constructor: F) -> Arc<TargetDescriptor>
    where
        F: Fn(&ResolvedDependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let constructor: ConstructorFn =
            Arc::new(move |deps: &ResolvedDependencies| constructor(deps).map(Built::scoped));
        self.finish(constructor, true)
    }
}

/// 纯装配模块的实例
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInstance {
    pub name: String,
}

/// 可注入类型
///
/// 静态给出查找名称和描述符，通常由 `#[derive(Injectable)]` 生成。
pub trait Injectable: Send + Sync + 'static {
    /// 查找名称
    const NAME: &'static str;

    /// 目标描述符
    fn descriptor() -> Arc<TargetDescriptor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Clock;

    #[derive(Debug)]
    struct Scheduler {
        clock: Arc<Clock>,
    }

    #[test]
    fn builder_records_manifest() {
        let descriptor = TargetDescriptor::builder::<Scheduler>("scheduler")
            .depends_on::<Clock>("clock")
            .construct(|deps| {
                Ok(Scheduler {
                    clock: deps.get("clock")?,
                })
            });

        assert_eq!(descriptor.name(), "scheduler");
        assert!(!descriptor.is_module());
        assert!(!descriptor.is_scoped());
        assert_eq!(descriptor.manifest().names(), vec!["clock"]);
        assert_eq!(descriptor.type_info().name, "Scheduler");
    }

    #[test]
    fn declared_dependency_matches_concrete_instance_type() {
        let descriptor = TargetDescriptor::builder::<Scheduler>("scheduler")
            .depends_on::<Clock>("clock")
            .construct(|deps| {
                Ok(Scheduler {
                    clock: deps.get("clock")?,
                })
            });

        let entry = descriptor.manifest().iter().next().unwrap();
        let instance: crate::Instance = Arc::new(Clock);
        let actual: &dyn std::any::Any = &*instance;
        assert_eq!(std::any::Any::type_id(actual), entry.type_info.id);
        assert!(entry.type_info.is::<Clock>());
    }

    #[test]
    fn constructor_receives_resolved_values() {
        let descriptor = TargetDescriptor::builder::<Scheduler>("scheduler")
            .depends_on::<Clock>("clock")
            .construct(|deps| {
                Ok(Scheduler {
                    clock: deps.get("clock")?,
                })
            });

        let mut deps = ResolvedDependencies::new("scheduler");
        deps.insert("clock", Arc::new(Clock));
        let built = descriptor.construct(&deps).unwrap();

        let scheduler = built.instance.downcast::<Scheduler>().unwrap();
        assert!(Arc::strong_count(&scheduler.clock) >= 1);
        assert!(built.resource.is_none());
    }

    #[test]
    fn module_only_target_builds_marker_instance() {
        let descriptor = TargetDescriptor::module("services", ModuleDescriptor::new());
        assert!(descriptor.is_module());
        assert!(descriptor.manifest().is_empty());

        let built = descriptor
            .construct(&ResolvedDependencies::new("services"))
            .unwrap();
        let instance = built.instance.downcast::<ModuleInstance>().unwrap();
        assert_eq!(instance.name, "services");
    }
}
