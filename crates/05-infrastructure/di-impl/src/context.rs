//! 上下文节点
//!
//! 每个目标在树中对应一个节点。树在创建根节点时一次性为整个声明的模块图构建完成，
//! 之后节点按需进入：解析依赖清单、构造目标、获取作用域资源。
//!
//! 可见性规则：
//!
//! - `can_provide` 面向请求方：自有提供者、已导出的导入，以及无条件向父节点上溯。
//! - `can_export` 面向导入方：只有出现在 `exports` 中的自有提供者或导入模块才可见。

use crate::lifecycle_stack::LifecycleStack;
use di_abstractions::{
    ContainerConfig, ContainerStats, ContextEvent, DiagnosticSink, Instance, ResolutionSource,
    ResolvedDependencies, TargetDescriptor,
};
use futures::future::BoxFuture;
use infrastructure_common::{
    ConfigurationError, DependencyError, LifecycleError, NodeState, Scope,
};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Instant;

/// 整棵树共享的配置与诊断接收器
#[derive(Debug)]
struct TreeShared {
    config: ContainerConfig,
    sink: Arc<dyn DiagnosticSink>,
    /// 正在进入的节点路径，用于报告循环依赖
    entering: Mutex<Vec<String>>,
}

#[derive(Default)]
struct NodeInner {
    state: NodeState,
    cache: HashMap<String, Instance>,
    instance: Option<Instance>,
}

/// 上下文节点
pub struct ContextNode {
    target: Arc<TargetDescriptor>,
    scope: Scope,
    parent: Weak<ContextNode>,
    providers: Vec<Arc<ContextNode>>,
    imports: Vec<Arc<ContextNode>>,
    shared: Arc<TreeShared>,
    inner: Mutex<NodeInner>,
    stack: LifecycleStack,
}

impl ContextNode {
    /// 为根目标构建完整的上下文树
    ///
    /// 先校验模块图，校验通过后为每个声明的提供者和导入创建子节点，无论之后是否被请求。
    pub fn root(
        target: Arc<TargetDescriptor>,
        config: ContainerConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Arc<Self>, DependencyError> {
        validate_graph(&target, &config)?;

        let shared = Arc::new(TreeShared {
            config,
            sink,
            entering: Mutex::new(Vec::new()),
        });
        let scope = Scope::new(target.name());
        let root = Self::build(target, Weak::new(), scope, &shared);

        shared.sink.record(&ContextEvent::TreeBuilt {
            root: root.name().to_string(),
            nodes: root.stats().nodes,
        });
        Ok(root)
    }

    fn build(
        target: Arc<TargetDescriptor>,
        parent: Weak<ContextNode>,
        scope: Scope,
        shared: &Arc<TreeShared>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| {
            let children = |targets: &[Arc<TargetDescriptor>]| {
                targets
                    .iter()
                    .map(|child| {
                        Self::build(child.clone(), me.clone(), scope.child(child.name()), shared)
                    })
                    .collect::<Vec<_>>()
            };
            let (providers, imports) = match target.module_descriptor() {
                Some(module) => (children(module.providers()), children(module.imports())),
                None => (Vec::new(), Vec::new()),
            };

            Self {
                target,
                scope,
                parent,
                providers,
                imports,
                shared: shared.clone(),
                inner: Mutex::new(NodeInner::default()),
                stack: LifecycleStack::new(),
            }
        })
    }

    /// 目标名称
    pub fn name(&self) -> &str {
        self.target.name()
    }

    pub fn target(&self) -> &Arc<TargetDescriptor> {
        &self.target
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn state(&self) -> NodeState {
        self.inner.lock().state
    }

    pub fn is_module(&self) -> bool {
        self.target.is_module()
    }

    pub fn parent(&self) -> Option<Arc<ContextNode>> {
        self.parent.upgrade()
    }

    pub fn providers(&self) -> &[Arc<ContextNode>] {
        &self.providers
    }

    pub fn imports(&self) -> &[Arc<ContextNode>] {
        &self.imports
    }

    /// 已构造的实例（仅在 Entered 状态下存在）
    pub fn instance(&self) -> Option<Instance> {
        self.inner.lock().instance.clone()
    }

    /// 本节点生命周期栈中的条目数量
    pub fn registered_entries(&self) -> usize {
        self.stack.len()
    }

    /// 请求方视角：本节点能否解析该名称
    pub fn can_provide(&self, name: &str) -> bool {
        self.own_provider(name).is_some()
            || self.imports.iter().any(|import| import.can_export(name))
            || self
                .parent
                .upgrade()
                .is_some_and(|parent| parent.can_provide(name))
    }

    /// 导入方视角：本模块是否对外暴露该名称
    ///
    /// 非模块目标总是返回 `false`。
    pub fn can_export(&self, name: &str) -> bool {
        let Some(module) = self.target.module_descriptor() else {
            return false;
        };

        (module.exports_name(name) && self.own_provider(name).is_some())
            || self
                .imports
                .iter()
                .any(|import| module.exports_name(import.name()) && import.can_export(name))
    }

    fn own_provider(&self, name: &str) -> Option<&Arc<ContextNode>> {
        self.providers.iter().find(|provider| provider.name() == name)
    }

    /// 解析具名依赖
    ///
    /// 同一节点对同一名称在生命周期内只解析一次，之后返回同一实例。
    pub fn get_dependency<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Instance, DependencyError>> {
        Box::pin(async move {
            let cached = {
                let inner = self.inner.lock();
                if matches!(inner.state, NodeState::Exiting | NodeState::Exited) {
                    return Err(DependencyError::ContextExited {
                        target: self.scope.name.clone(),
                    });
                }
                inner.cache.get(name).cloned()
            };
            if let Some(instance) = cached {
                self.record_resolved(name, ResolutionSource::Cache);
                return Ok(instance);
            }

            if let Some(provider) = self.own_provider(name) {
                let instance = self.enter_child(provider).await?;
                return Ok(self.remember(name, instance, ResolutionSource::Provider));
            }

            for import in &self.imports {
                if import.can_export(name) {
                    self.enter_child(import).await?;
                    let instance = import.get_dependency(name).await?;
                    let source = ResolutionSource::Import(import.name().to_string());
                    return Ok(self.remember(name, instance, source));
                }
            }

            if let Some(parent) = self.parent.upgrade() {
                if parent.can_provide(name) {
                    let instance = parent.get_dependency(name).await?;
                    return Ok(self.remember(name, instance, ResolutionSource::Parent));
                }
            }

            self.shared.sink.record(&ContextEvent::ResolutionFailed {
                scope: self.scope.name.clone(),
                name: name.to_string(),
            });
            Err(DependencyError::ResolutionFailed {
                requester: self.scope.name.clone(),
                name: name.to_string(),
            })
        })
    }

    /// 解析并转换为具体类型
    pub async fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, DependencyError> {
        self.get_dependency(name)
            .await?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    fn remember(&self, name: &str, instance: Instance, source: ResolutionSource) -> Instance {
        self.inner
            .lock()
            .cache
            .insert(name.to_string(), instance.clone());
        self.record_resolved(name, source);
        instance
    }

    fn record_resolved(&self, name: &str, source: ResolutionSource) {
        self.shared.sink.record(&ContextEvent::Resolved {
            scope: self.scope.name.clone(),
            name: name.to_string(),
            source,
        });
    }

    /// 进入子节点；首次进入成功后登记到本节点的生命周期栈
    async fn enter_child(&self, child: &Arc<ContextNode>) -> Result<Instance, DependencyError> {
        let (instance, fresh) = child.enter_tracked().await?;
        if fresh {
            self.stack.push_context(child.clone());
        }
        Ok(instance)
    }

    /// 进入节点并返回目标实例
    ///
    /// 对已进入的节点重复调用直接返回已有实例。
    pub fn enter(&self) -> BoxFuture<'_, Result<Instance, DependencyError>> {
        Box::pin(async move { self.enter_tracked().await.map(|(instance, _)| instance) })
    }

    fn enter_tracked(&self) -> BoxFuture<'_, Result<(Instance, bool), DependencyError>> {
        Box::pin(async move {
            {
                let mut inner = self.inner.lock();
                match inner.state {
                    NodeState::Entered => {
                        if let Some(instance) = &inner.instance {
                            return Ok((instance.clone(), false));
                        }
                    }
                    NodeState::Entering => {
                        return Err(DependencyError::CircularDependency {
                            dependency_chain: self.entering_chain(),
                        });
                    }
                    NodeState::Exiting | NodeState::Exited => {
                        return Err(DependencyError::ContextExited {
                            target: self.scope.name.clone(),
                        });
                    }
                    NodeState::Created => {}
                }
                inner.state = NodeState::Entering;
            }

            self.shared.entering.lock().push(self.scope.name.clone());
            self.shared.sink.record(&ContextEvent::Entering {
                scope: self.scope.name.clone(),
            });
            let started = self
                .shared
                .config
                .enable_performance_monitoring
                .then(Instant::now);

            let result = self.instantiate().await;
            self.shared.entering.lock().pop();

            match result {
                Ok(instance) => {
                    {
                        let mut inner = self.inner.lock();
                        inner.state = NodeState::Entered;
                        inner.instance = Some(instance.clone());
                    }
                    self.shared.sink.record(&ContextEvent::Entered {
                        scope: self.scope.name.clone(),
                        elapsed: started.map(|started| started.elapsed()),
                    });
                    Ok((instance, true))
                }
                Err(error) => {
                    self.shared.sink.record(&ContextEvent::EnterFailed {
                        scope: self.scope.name.clone(),
                        message: error.to_string(),
                    });
                    // 释放本节点在失败前已登记的条目，保留原始错误
                    self.inner.lock().state = NodeState::Exiting;
                    if let Err(release_error) = self.stack.unwind(&self.shared.sink).await {
                        self.shared.sink.record(&ContextEvent::ReleaseFailed {
                            scope: self.scope.name.clone(),
                            message: release_error.to_string(),
                        });
                    }
                    self.finish_exit();
                    Err(error)
                }
            }
        })
    }

    /// 按清单顺序逐个解析依赖，构造目标，必要时获取作用域资源
    async fn instantiate(&self) -> Result<Instance, DependencyError> {
        let mut resolved = ResolvedDependencies::new(self.scope.name.clone());
        for entry in self.target.manifest() {
            let instance = self.get_dependency(&entry.name).await?;
            let actual: &dyn Any = &*instance;
            if Any::type_id(actual) != entry.type_info.id {
                return Err(DependencyError::TypeMismatch {
                    name: entry.name.clone(),
                    expected: entry.type_info.module_path.clone(),
                });
            }
            resolved.insert(entry.name.clone(), instance);
        }

        let built = self.target.construct(&resolved).map_err(|source| {
            DependencyError::ComponentCreationFailed {
                type_name: self.target.type_info().module_path.clone(),
                source,
            }
        })?;

        let Some(resource) = built.resource else {
            return Ok(built.instance);
        };
        let replacement =
            resource
                .acquire()
                .await
                .map_err(|source| DependencyError::AcquireFailed {
                    type_name: self.target.type_info().module_path.clone(),
                    source,
                })?;
        self.stack.push_resource(self.scope.name.clone(), resource);
        self.shared.sink.record(&ContextEvent::ResourceAcquired {
            scope: self.scope.name.clone(),
        });

        Ok(replacement.unwrap_or(built.instance))
    }

    fn entering_chain(&self) -> String {
        let entering = self.shared.entering.lock();
        let start = entering
            .iter()
            .position(|scope| *scope == self.scope.name)
            .unwrap_or(0);
        let mut chain: Vec<&str> = entering[start..].iter().map(String::as_str).collect();
        chain.push(&self.scope.name);
        chain.join(" -> ")
    }

    /// 退出节点：逆序释放生命周期栈中的全部条目
    ///
    /// 任何单个释放失败都不会阻止其余条目；重复调用不做任何事。
    /// 进入被取消时仍停留在 `Entering` 的子节点尚未登记到栈中，它们最后开始进入，因此最先回收。
    pub fn exit(&self) -> BoxFuture<'_, Result<(), LifecycleError>> {
        Box::pin(async move {
            {
                let mut inner = self.inner.lock();
                if matches!(inner.state, NodeState::Exiting | NodeState::Exited) {
                    return Ok(());
                }
                inner.state = NodeState::Exiting;
            }

            let mut failures = Vec::new();
            for child in self.providers.iter().chain(&self.imports) {
                if child.state() == NodeState::Entering {
                    if let Err(error) = child.exit().await {
                        failures.extend(error.into_failures());
                    }
                }
            }
            if let Err(error) = self.stack.unwind(&self.shared.sink).await {
                failures.extend(error.into_failures());
            }
            self.finish_exit();

            if failures.is_empty() {
                Ok(())
            } else {
                Err(LifecycleError::ReleaseFailed { failures })
            }
        })
    }

    fn finish_exit(&self) {
        {
            let mut inner = self.inner.lock();
            inner.state = NodeState::Exited;
            inner.cache.clear();
            inner.instance = None;
        }
        self.shared.sink.record(&ContextEvent::Exited {
            scope: self.scope.name.clone(),
        });
    }

    /// 统计以本节点为根的子树
    pub fn stats(&self) -> ContainerStats {
        let mut stats = ContainerStats::default();
        self.collect_stats(&mut stats);
        stats
    }

    fn collect_stats(&self, stats: &mut ContainerStats) {
        stats.nodes += 1;
        if self.is_module() {
            stats.modules += 1;
        }
        if self.state() == NodeState::Entered {
            stats.entered += 1;
            if self.target.is_scoped() {
                stats.scoped_resources += 1;
            }
        }
        for child in self.providers.iter().chain(&self.imports) {
            child.collect_stats(stats);
        }
    }
}

impl std::fmt::Debug for ContextNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextNode")
            .field("scope", &self.scope.name)
            .field("state", &self.state())
            .field("providers", &self.providers.len())
            .field("imports", &self.imports.len())
            .finish()
    }
}

/// 在创建任何节点之前校验整个声明的模块图
fn validate_graph(
    target: &TargetDescriptor,
    config: &ContainerConfig,
) -> Result<(), ConfigurationError> {
    let Some(module) = target.module_descriptor() else {
        return Ok(());
    };

    if config.reject_duplicate_providers {
        let mut seen = std::collections::HashSet::new();
        for provider in module.providers() {
            if !seen.insert(provider.name()) {
                return Err(ConfigurationError::DuplicateProvider {
                    module: target.name().to_string(),
                    name: provider.name().to_string(),
                });
            }
        }
    }

    if config.validate_exports {
        for export in module.exports() {
            let satisfiable = module.provides_name(export)
                || module.imports().iter().any(|import| import.name() == export);
            if !satisfiable {
                return Err(ConfigurationError::UnsatisfiableExport {
                    module: target.name().to_string(),
                    name: export.clone(),
                });
            }
        }
    }

    for child in module.providers().iter().chain(module.imports()) {
        validate_graph(child, config)?;
    }
    Ok(())
}
