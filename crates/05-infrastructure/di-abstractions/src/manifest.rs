//! 依赖清单
//!
//! 每个目标在注册时显式给出的有序依赖声明。

use infrastructure_common::TypeInfo;

/// 单条依赖声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 依赖名称（查找键）
    pub name: String,
    /// 期望的实例类型
    pub type_info: TypeInfo,
}

/// 有序依赖清单
///
/// 名称唯一；重复声明同一名称时替换原有条目并保留其位置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManifest {
    entries: Vec<ManifestEntry>,
}

impl DependencyManifest {
    /// 创建空清单
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条依赖声明
    pub fn declare(&mut self, name: impl Into<String>, type_info: TypeInfo) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
            entry.type_info = type_info;
        } else {
            self.entries.push(ManifestEntry { name, type_info });
        }
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// 是否声明了指定名称
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 按声明顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    /// 按声明顺序返回名称
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a DependencyManifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
