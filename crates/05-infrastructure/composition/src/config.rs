//! 应用配置文件
//!
//! 支持 `.toml` 与 `.json` 两种格式，包含 `[container]` 和可选的 `[logging]` 两张表。

use crate::logging::LoggingConfig;
use di_abstractions::ContainerConfig;
use infrastructure_common::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// 容器配置
    pub container: ContainerConfig,
    /// 日志配置，缺省时不初始化日志
    pub logging: Option<LoggingConfig>,
}

impl ApplicationConfig {
    /// 从文件加载，格式由扩展名决定
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                })
            }
        };

        debug!(path = %path.display(), "已加载应用配置");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }
}
