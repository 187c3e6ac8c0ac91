//! 作用域生命周期栈
//!
//! 只追加的登记表，退出时从最后登记的条目开始释放。
//! 单个条目释放失败不会中断后续条目，所有失败在最后汇总返回。

use crate::context::ContextNode;
use di_abstractions::{ContextEvent, DiagnosticSink, ScopedResource};
use infrastructure_common::{LifecycleError, ReleaseFailure};
use parking_lot::Mutex;
use std::sync::Arc;

/// 栈条目
pub enum LifecycleEntry {
    /// 已进入的子上下文，释放时调用其 `exit`
    Context(Arc<ContextNode>),
    /// 已获取的作用域资源
    Resource {
        scope: String,
        resource: Arc<dyn ScopedResource>,
    },
}

impl std::fmt::Debug for LifecycleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Context(node) => f.debug_tuple("Context").field(&node.scope().name).finish(),
            Self::Resource { scope, .. } => f.debug_struct("Resource").field("scope", scope).finish(),
        }
    }
}

/// 生命周期栈
#[derive(Debug, Default)]
pub struct LifecycleStack {
    entries: Mutex<Vec<LifecycleEntry>>,
}

impl LifecycleStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记已进入的子上下文
    pub fn push_context(&self, node: Arc<ContextNode>) {
        self.entries.lock().push(LifecycleEntry::Context(node));
    }

    /// 登记已获取的作用域资源
    pub fn push_resource(&self, scope: impl Into<String>, resource: Arc<dyn ScopedResource>) {
        self.entries.lock().push(LifecycleEntry::Resource {
            scope: scope.into(),
            resource,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// 逆序释放全部条目
    ///
    /// 栈在释放前被清空，重复调用是安全的。
    pub async fn unwind(&self, sink: &Arc<dyn DiagnosticSink>) -> Result<(), LifecycleError> {
        let entries = std::mem::take(&mut *self.entries.lock());
        let mut failures = Vec::new();

        for entry in entries.into_iter().rev() {
            match entry {
                LifecycleEntry::Context(node) => {
                    if let Err(error) = node.exit().await {
                        failures.extend(error.into_failures());
                    }
                }
                LifecycleEntry::Resource { scope, resource } => match resource.release().await {
                    Ok(()) => sink.record(&ContextEvent::ResourceReleased {
                        scope: scope.clone(),
                    }),
                    Err(source) => {
                        sink.record(&ContextEvent::ReleaseFailed {
                            scope: scope.clone(),
                            message: source.to_string(),
                        });
                        failures.push(ReleaseFailure {
                            target: scope,
                            source,
                        });
                    }
                },
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LifecycleError::ReleaseFailed { failures })
        }
    }
}
