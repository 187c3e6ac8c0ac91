//! 组件工厂
//!
//! 目标通过声明的构造函数创建，构造函数接收已解析完成的依赖。

use crate::resource::{Instance, ScopedResource};
use infrastructure_common::{BoxError, DependencyError};
use std::any::Any;
use std::sync::Arc;

/// 构造函数类型
pub type ConstructorFn =
    Arc<dyn Fn(&ResolvedDependencies) -> Result<Built, BoxError> + Send + Sync>;

/// 构造结果
pub struct Built {
    /// 构造出的实例
    pub instance: Instance,
    /// 若目标声明了作用域资源能力，则为同一实例的资源视图
    pub resource: Option<Arc<dyn ScopedResource>>,
}

impl Built {
    /// 普通实例
    pub fn plain<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            instance: Arc::new(value),
            resource: None,
        }
    }

    /// 作用域资源实例
    pub fn scoped<T: ScopedResource>(value: T) -> Self {
        let value = Arc::new(value);
        Self {
            instance: value.clone(),
            resource: Some(value),
        }
    }
}

impl std::fmt::Debug for Built {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Built")
            .field("scoped", &self.resource.is_some())
            .finish_non_exhaustive()
    }
}

/// 已解析的依赖集合
///
/// 顺序与目标的依赖清单一致。
pub struct ResolvedDependencies {
    requester: String,
    values: Vec<(String, Instance)>,
}

impl ResolvedDependencies {
    /// 创建空集合
    pub fn new(requester: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            values: Vec::new(),
        }
    }

    /// 添加已解析的依赖
    pub fn insert(&mut self, name: impl Into<String>, instance: Instance) {
        self.values.push((name.into(), instance));
    }

    /// 按名称获取类型化的依赖
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, DependencyError> {
        let instance = self
            .instance(name)
            .ok_or_else(|| DependencyError::ResolutionFailed {
                requester: self.requester.clone(),
                name: name.to_string(),
            })?;

        instance
            .clone()
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// 按名称获取类型擦除的依赖
    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, instance)| instance)
    }

    /// 请求方名称
    pub fn requester(&self) -> &str {
        &self.requester
    }

    /// 按解析顺序返回名称
    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for ResolvedDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDependencies")
            .field("requester", &self.requester)
            .field("names", &self.names())
            .finish()
    }
}
