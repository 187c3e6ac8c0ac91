//! # 应用组合层
//!
//! 把日志、配置文件和依赖注入启动器组合成一个可以直接运行的应用宿主。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 使用构建者模式组装日志、容器配置和诊断接收器
//! - **配置文件**: 从 `.toml` / `.json` 读取 `[container]` 与 `[logging]`
//! - **作用域运行**: 启动根目标，运行业务代码，最后逆序释放所有作用域资源
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::{ModuleDescriptor, ModuleInstance, TargetDescriptor};
//! use infrastructure_composition::{ApplicationBuilder, LoggingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let root = TargetDescriptor::module("app", ModuleDescriptor::new());
//!
//!     ApplicationBuilder::new()
//!         .with_logging(LoggingConfig::development())
//!         .run(root, |app: std::sync::Arc<ModuleInstance>| async move {
//!             println!("应用名称: {}", app.name);
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod logging;

pub use builder::ApplicationBuilder;
pub use config::ApplicationConfig;
pub use logging::LoggingConfig;

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
