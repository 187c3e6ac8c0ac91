//! 应用构建器

use crate::config::ApplicationConfig;
use crate::logging::LoggingConfig;
use di_abstractions::{ContainerConfig, DiagnosticSink, TargetDescriptor};
use di_impl::{Bootstrap, ScopedHandle};
use infrastructure_common::InfrastructureError;
use std::any::Any;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 应用构建器
///
/// 组合日志、容器配置和诊断接收器，最终以根目标启动整个作用域。
#[derive(Debug, Default)]
pub struct ApplicationBuilder {
    /// 容器配置
    container: ContainerConfig,
    /// 日志配置，`None` 表示不初始化日志
    logging: Option<LoggingConfig>,
    /// 诊断接收器，默认转发到 `tracing`
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 设置容器配置
    pub fn with_container_config(mut self, config: ContainerConfig) -> Self {
        self.container = config;
        self
    }

    /// 设置诊断接收器
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 读取配置文件
    ///
    /// 文件中的 `[container]` 覆盖当前容器配置；存在 `[logging]` 时同样覆盖日志配置。
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        info!("加载配置文件: {}", path.display());

        let config = ApplicationConfig::from_file(path)?;
        self.container = config.container;
        if let Some(logging) = config.logging {
            self.logging = Some(logging);
        }
        Ok(self)
    }

    pub fn container_config(&self) -> &ContainerConfig {
        &self.container
    }

    pub fn logging_config(&self) -> Option<&LoggingConfig> {
        self.logging.as_ref()
    }

    /// 初始化日志并生成启动器
    pub fn build(self) -> Result<Bootstrap, InfrastructureError> {
        if let Some(logging) = &self.logging {
            logging.init()?;
        }

        let bootstrap = Bootstrap::new().with_config(self.container);
        Ok(match self.sink {
            Some(sink) => bootstrap.with_sink(sink),
            None => bootstrap,
        })
    }

    /// 打开根作用域，由调用方负责关闭
    pub async fn open<T: Any + Send + Sync>(
        self,
        root: Arc<TargetDescriptor>,
    ) -> Result<ScopedHandle<T>, InfrastructureError> {
        Ok(self.build()?.open::<T>(root).await?)
    }

    /// 在根作用域内运行 `body`，结束后释放所有作用域资源
    pub async fn run<T, F, Fut, R>(
        self,
        root: Arc<TargetDescriptor>,
        body: F,
    ) -> Result<R, InfrastructureError>
    where
        T: Any + Send + Sync,
        F: FnOnce(Arc<T>) -> Fut,
        Fut: Future<Output = R>,
    {
        let bootstrap = self.build()?;
        info!(root = %root.name(), "启动应用");
        let value = bootstrap.run(root, body).await?;
        info!("应用已停止");
        Ok(value)
    }
}
