//! 诊断接口
//!
//! 引擎不直接写全局日志，而是把事件交给注入的 [`DiagnosticSink`]。

use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// 依赖的解析来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// 本节点缓存
    Cache,
    /// 本节点的自有提供者
    Provider,
    /// 导入模块（模块名称）
    Import(String),
    /// 向父节点委托
    Parent,
}

/// 上下文事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextEvent {
    /// 上下文树构建完成
    TreeBuilt { root: String, nodes: usize },
    /// 开始进入节点
    Entering { scope: String },
    /// 节点进入完成
    Entered {
        scope: String,
        elapsed: Option<Duration>,
    },
    /// 依赖已解析
    Resolved {
        scope: String,
        name: String,
        source: ResolutionSource,
    },
    /// 依赖解析失败
    ResolutionFailed { scope: String, name: String },
    /// 节点进入失败
    EnterFailed { scope: String, message: String },
    /// 作用域资源已获取
    ResourceAcquired { scope: String },
    /// 作用域资源已释放
    ResourceReleased { scope: String },
    /// 作用域资源释放失败
    ReleaseFailed { scope: String, message: String },
    /// 节点已退出
    Exited { scope: String },
}

/// 诊断接收器
pub trait DiagnosticSink: Send + Sync + std::fmt::Debug {
    /// 记录事件
    fn record(&self, event: &ContextEvent);
}

/// 将事件转发到 `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &ContextEvent) {
        match event {
            ContextEvent::TreeBuilt { root, nodes } => {
                info!(root = %root, nodes = *nodes, "上下文树构建完成");
            }
            ContextEvent::Entering { scope } => {
                debug!(scope = %scope, "进入上下文");
            }
            ContextEvent::Entered { scope, elapsed } => match elapsed {
                Some(elapsed) => {
                    debug!(scope = %scope, elapsed_us = elapsed.as_micros() as u64, "上下文已进入");
                }
                None => debug!(scope = %scope, "上下文已进入"),
            },
            ContextEvent::Resolved {
                scope,
                name,
                source,
            } => {
                trace!(scope = %scope, dependency = %name, source = ?source, "依赖已解析");
            }
            ContextEvent::ResolutionFailed { scope, name } => {
                warn!(scope = %scope, dependency = %name, "依赖解析失败");
            }
            ContextEvent::EnterFailed { scope, message } => {
                warn!(scope = %scope, error = %message, "上下文进入失败，回滚已获取的资源");
            }
            ContextEvent::ResourceAcquired { scope } => {
                info!(scope = %scope, "作用域资源已获取");
            }
            ContextEvent::ResourceReleased { scope } => {
                info!(scope = %scope, "作用域资源已释放");
            }
            ContextEvent::ReleaseFailed { scope, message } => {
                warn!(scope = %scope, error = %message, "作用域资源释放失败");
            }
            ContextEvent::Exited { scope } => {
                debug!(scope = %scope, "上下文已退出");
            }
        }
    }
}

/// 丢弃所有事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: &ContextEvent) {}
}
