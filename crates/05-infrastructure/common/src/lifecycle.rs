//! 上下文节点生命周期状态与作用域标识

/// 上下文节点的生命周期状态
///
/// 进入路径为 `Created → Entering → Entered`，退出路径为
/// `Entered → Exiting → Exited`。每个方向至多经历一次，`Exited` 为终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// 已在树构建阶段创建，尚未实例化
    Created,
    /// 正在解析依赖并构造目标
    Entering,
    /// 目标实例已构造（若为作用域资源则已获取）
    Entered,
    /// 正在逆序释放生命周期栈
    Exiting,
    /// 已退出，不可再次使用
    Exited,
}

impl Default for NodeState {
    fn default() -> Self {
        Self::Created
    }
}

/// 组件作用域
///
/// 每个上下文节点持有一个作用域，`name` 为从根节点开始的点分路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub name: String,
}

impl Scope {
    /// 创建新作用域
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 创建子作用域
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self::new(format!("{}.{}", self.name, name.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_scope_extends_dotted_path() {
        let root = Scope::new("application");
        let child = root.child("domain_services").child("google_pinger");

        assert_eq!(child.name, "application.domain_services.google_pinger");
    }

    #[test]
    fn new_nodes_start_created() {
        assert_eq!(NodeState::default(), NodeState::Created);
    }
}
