//! 元数据定义
//!
//! 提供依赖清单使用的类型信息

use std::any::TypeId;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: short_type_name(full_name).to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 判断是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.module_path)
    }
}

/// 去掉模块路径，保留泛型参数之前的最后一段
fn short_type_name(full_name: &str) -> &str {
    let base = full_name.split('<').next().unwrap_or(full_name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HttpService;

    #[test]
    fn type_info_strips_module_path() {
        let info = TypeInfo::of::<HttpService>();
        assert_eq!(info.name, "HttpService");
        assert!(info.module_path.ends_with("::HttpService"));
        assert!(info.is::<HttpService>());
        assert!(!info.is::<String>());
    }

    #[test]
    fn generic_type_keeps_outer_name() {
        let info = TypeInfo::of::<Vec<HttpService>>();
        assert_eq!(info.name, "Vec");
    }
}
