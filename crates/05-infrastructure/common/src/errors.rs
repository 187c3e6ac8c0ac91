//! 错误类型定义

use thiserror::Error;

/// 用户代码产生的错误（构造函数、acquire/release 钩子）
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("不支持的配置文件格式: {path}")]
    UnsupportedFormat { path: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::ParseError {
            source: Box::new(source),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(source: toml::de::Error) -> Self {
        Self::ParseError {
            source: Box::new(source),
        }
    }
}

/// 模块图配置错误
///
/// 在上下文树构建阶段检测，先于任何实例化发生。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("模块 {module} 导出了无法满足的名称: {name}")]
    UnsatisfiableExport { module: String, name: String },

    #[error("模块 {module} 中存在重复的提供者名称: {name}")]
    DuplicateProvider { module: String, name: String },
}

/// 单个资源释放失败记录
#[derive(Debug)]
pub struct ReleaseFailure {
    /// 资源所属的目标名称
    pub target: String,
    /// 失败原因
    pub source: BoxError,
}

impl std::fmt::Display for ReleaseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.target, self.source)
    }
}

/// 生命周期管理错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("{} 个资源释放失败: {}", .failures.len(), format_failures(.failures))]
    ReleaseFailed { failures: Vec<ReleaseFailure> },
}

impl LifecycleError {
    /// 展开为释放失败列表，便于在外层栈中合并
    pub fn into_failures(self) -> Vec<ReleaseFailure> {
        match self {
            Self::ReleaseFailed { failures } => failures,
        }
    }
}

fn format_failures(failures: &[ReleaseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("{requester}: 无法提供依赖 {name}")]
    ResolutionFailed { requester: String, name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed { type_name: String, source: BoxError },

    #[error("作用域资源获取失败: {type_name}, 原因: {source}")]
    AcquireFailed { type_name: String, source: BoxError },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("依赖类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("上下文已退出，不能再次进入: {target}")]
    ContextExited { target: String },

    #[error("模块配置错误: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("生命周期错误: {0}")]
    Lifecycle(#[from] LifecycleError),
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}
