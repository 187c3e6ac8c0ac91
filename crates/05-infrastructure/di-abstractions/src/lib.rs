//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义模块图的声明方式和运行时协作接口。
//!
//! ## 核心接口
//!
//! - [`TargetDescriptor`] - 可注入单元（提供者或模块）的静态描述
//! - [`DependencyManifest`] - 有序的依赖声明（名称 → 类型引用）
//! - [`ModuleDescriptor`] - 模块的 providers / imports / exports
//! - [`ScopedResource`] - 需要显式获取/释放的作用域资源能力
//! - [`Injectable`] - 静态声明名称与描述符的类型
//! - [`DiagnosticSink`] - 注入式的结构化诊断接口
//! - [`ContainerConfig`] - 容器行为配置

pub mod container;
pub mod diagnostics;
pub mod factory;
pub mod manifest;
pub mod module;
pub mod resource;
pub mod target;

pub use container::*;
pub use diagnostics::*;
pub use factory::*;
pub use manifest::*;
pub use module::*;
pub use resource::*;
pub use target::*;
