//! 容器配置与统计

use infrastructure_common::ConfigError;
use serde::{Deserialize, Serialize};

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 构建上下文树时校验模块导出是否可满足
    pub validate_exports: bool,
    /// 同一模块内出现重复提供者名称时报错
    pub reject_duplicate_providers: bool,
    /// 是否记录每个节点的进入耗时
    pub enable_performance_monitoring: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            validate_exports: true,
            reject_duplicate_providers: true,
            enable_performance_monitoring: false,
        }
    }
}

impl ContainerConfig {
    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// 宽松模式：不做任何图校验
    pub fn permissive() -> Self {
        Self {
            validate_exports: false,
            reject_duplicate_providers: false,
            enable_performance_monitoring: false,
        }
    }
}

/// 上下文树统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 节点总数
    pub nodes: usize,
    /// 模块节点数量
    pub modules: usize,
    /// 当前处于 Entered 状态的节点数量
    pub entered: usize,
    /// 已获取的作用域资源数量
    pub scoped_resources: usize,
}
