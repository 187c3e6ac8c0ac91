//! 启动入口
//!
//! 获取存活实例的唯一途径：创建根上下文、等待完整解析、把根实例交给调用方，
//! 并在作用域结束时（成功、失败或被取消）退出根节点，触发完整的逆序回收。

use crate::context::ContextNode;
use di_abstractions::{ContainerConfig, DiagnosticSink, TargetDescriptor, TracingSink};
use futures::FutureExt;
use infrastructure_common::DependencyError;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 启动器
#[derive(Debug, Clone)]
pub struct Bootstrap {
    config: ContainerConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl Bootstrap {
    /// 使用默认配置和 `tracing` 诊断创建启动器
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            sink: Arc::new(TracingSink),
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置诊断接收器
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 打开根作用域
    ///
    /// 根节点进入失败时，已进入的部分在返回错误之前已全部释放；
    /// 进入期间被取消时，已获取的资源在后台释放。
    pub async fn open<T: Any + Send + Sync>(
        &self,
        root: Arc<TargetDescriptor>,
    ) -> Result<ScopedHandle<T>, DependencyError> {
        let root_name = root.name().to_string();
        info!(root = %root_name, "启动根上下文");

        let context = ContextNode::root(root, self.config.clone(), self.sink.clone())?;
        let guard = EnterGuard {
            context: Some(context.clone()),
        };
        let entered = context.enter().await;
        guard.disarm();
        let instance = entered?;

        match instance.downcast::<T>() {
            Ok(instance) => Ok(ScopedHandle {
                context,
                instance,
                closed: false,
            }),
            Err(_) => {
                if let Err(release_error) = context.exit().await {
                    warn!(root = %root_name, error = %release_error, "根实例类型不匹配，回收时出现错误");
                }
                Err(DependencyError::TypeMismatch {
                    name: root_name,
                    expected: std::any::type_name::<T>().to_string(),
                })
            }
        }
    }

    /// 在根作用域内运行 `body`，结束后总是退出根节点
    ///
    /// `body` 发生 panic 时先完成回收再继续传播 panic。
    pub async fn run<T, F, Fut, R>(
        &self,
        root: Arc<TargetDescriptor>,
        body: F,
    ) -> Result<R, DependencyError>
    where
        T: Any + Send + Sync,
        F: FnOnce(Arc<T>) -> Fut,
        Fut: Future<Output = R>,
    {
        let handle = self.open::<T>(root).await?;
        let outcome = AssertUnwindSafe(body(handle.instance()))
            .catch_unwind()
            .await;
        let closed = handle.close().await;

        match outcome {
            Ok(value) => closed.map(|()| value),
            Err(panic) => {
                if let Err(close_error) = closed {
                    error!(error = %close_error, "作用域内发生 panic，回收时出现错误");
                }
                std::panic::resume_unwind(panic)
            }
        }
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

/// 以默认配置启动 `root` 并在其作用域内运行 `body`
pub async fn bootstrap<T, F, Fut, R>(
    root: Arc<TargetDescriptor>,
    body: F,
) -> Result<R, DependencyError>
where
    T: Any + Send + Sync,
    F: FnOnce(Arc<T>) -> Fut,
    Fut: Future<Output = R>,
{
    Bootstrap::new().run(root, body).await
}

/// 根作用域句柄
///
/// 应通过 [`ScopedHandle::close`] 显式关闭。未关闭就被丢弃时（例如外层 future 被取消），
/// 会在当前 Tokio 运行时上后台完成回收。
pub struct ScopedHandle<T> {
    context: Arc<ContextNode>,
    instance: Arc<T>,
    closed: bool,
}

impl<T> ScopedHandle<T> {
    /// 根实例
    pub fn instance(&self) -> Arc<T> {
        self.instance.clone()
    }

    /// 根上下文，可用于按名称继续解析
    pub fn context(&self) -> &Arc<ContextNode> {
        &self.context
    }

    /// 退出根上下文并逆序释放所有资源
    pub async fn close(mut self) -> Result<(), DependencyError> {
        self.closed = true;
        self.context.exit().await?;
        info!(root = %self.context.name(), "根上下文已关闭");
        Ok(())
    }
}

impl<T> std::ops::Deref for ScopedHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.instance
    }
}

impl<T> std::fmt::Debug for ScopedHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedHandle")
            .field("context", &self.context)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<T> Drop for ScopedHandle<T> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        warn!(root = %self.context.name(), "作用域句柄未关闭即被丢弃，后台回收");
        exit_in_background(self.context.clone());
    }
}

/// 根节点进入期间的守卫
///
/// 进入尚未完成时外层 future 被丢弃，守卫负责退出根节点，释放已获取的资源。
struct EnterGuard {
    context: Option<Arc<ContextNode>>,
}

impl EnterGuard {
    fn disarm(mut self) {
        self.context = None;
    }
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            warn!(root = %context.name(), "根上下文进入被取消，后台回收");
            exit_in_background(context);
        }
    }
}

/// 在当前 Tokio 运行时上后台退出根节点
fn exit_in_background(context: Arc<ContextNode>) {
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn(async move {
                if let Err(close_error) = context.exit().await {
                    error!(root = %context.name(), error = %close_error, "后台回收失败");
                }
            });
        }
        Err(_) => {
            error!(root = %context.name(), "运行时之外无法回收根上下文，资源未释放");
        }
    }
}
