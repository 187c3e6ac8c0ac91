//! # Infrastructure Common
//!
//! 依赖注入引擎各层共享的基础类型。
//!
//! ## 核心内容
//!
//! - [`DependencyError`] / [`ConfigurationError`] / [`LifecycleError`] - 引擎错误类型
//! - [`NodeState`] / [`Scope`] - 上下文节点的生命周期状态与作用域标识
//! - [`TypeInfo`] - 类型元数据，用于依赖清单中的类型引用
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 异步优先的设计理念
//! - 显式声明优于运行时探测

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
