//! 模块描述符

use crate::target::{Injectable, TargetDescriptor};
use std::sync::Arc;

/// 模块描述符
///
/// 纯数据：模块自有的提供者、导入的其他模块，以及愿意向导入方再次暴露的名称。
/// `exports` 中的名称必须能由自有提供者或已导出的导入满足，否则在构建上下文树时报错。
#[derive(Clone, Default)]
pub struct ModuleDescriptor {
    providers: Vec<Arc<TargetDescriptor>>,
    imports: Vec<Arc<TargetDescriptor>>,
    exports: Vec<String>,
}

impl ModuleDescriptor {
    /// 创建空模块描述符
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加提供者
    pub fn provider(mut self, descriptor: Arc<TargetDescriptor>) -> Self {
        self.providers.push(descriptor);
        self
    }

    /// 添加可注入类型作为提供者
    pub fn provide<T: Injectable>(self) -> Self {
        self.provider(T::descriptor())
    }

    /// 添加导入模块
    pub fn import(mut self, descriptor: Arc<TargetDescriptor>) -> Self {
        self.imports.push(descriptor);
        self
    }

    /// 添加可注入模块作为导入
    pub fn import_module<T: Injectable>(self) -> Self {
        self.import(T::descriptor())
    }

    /// 声明导出名称
    pub fn export(mut self, name: impl Into<String>) -> Self {
        self.exports.push(name.into());
        self
    }

    /// 导出可注入类型的名称
    pub fn export_type<T: Injectable>(self) -> Self {
        self.export(T::NAME)
    }

    pub fn providers(&self) -> &[Arc<TargetDescriptor>] {
        &self.providers
    }

    pub fn imports(&self) -> &[Arc<TargetDescriptor>] {
        &self.imports
    }

    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    /// 是否导出了指定名称
    pub fn exports_name(&self, name: &str) -> bool {
        self.exports.iter().any(|export| export == name)
    }

    /// 自有提供者中是否有指定名称
    pub fn provides_name(&self, name: &str) -> bool {
        self.providers.iter().any(|provider| provider.name() == name)
    }
}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |targets: &[Arc<TargetDescriptor>]| {
            targets
                .iter()
                .map(|target| target.name().to_string())
                .collect::<Vec<_>>()
        };
        f.debug_struct("ModuleDescriptor")
            .field("providers", &names(&self.providers))
            .field("imports", &names(&self.imports))
            .field("exports", &self.exports)
            .finish()
    }
}
