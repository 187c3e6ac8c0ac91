//! # 依赖注入具体实现
//!
//! 以模块图为输入构建上下文树，按需解析具名依赖，并管理作用域资源的获取与逆序释放。
//!
//! - [`ContextNode`] - 上下文树节点，负责解析、构造与生命周期
//! - [`LifecycleStack`] - 节点持有的后进先出释放栈
//! - [`Bootstrap`] / [`bootstrap`] - 唯一的入口，保证退出时完整回收

pub mod bootstrap;
pub mod context;
pub mod lifecycle_stack;

pub use bootstrap::{bootstrap, Bootstrap, ScopedHandle};
pub use context::ContextNode;
pub use lifecycle_stack::{LifecycleEntry, LifecycleStack};
