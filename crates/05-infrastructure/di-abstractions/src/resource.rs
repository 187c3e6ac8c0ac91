//! 作用域资源能力

use async_trait::async_trait;
use infrastructure_common::BoxError;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 作用域资源 trait
///
/// 实现此 trait 并通过 [`TargetBuilder::construct_scoped`](crate::TargetBuilder::construct_scoped)
/// 注册的目标，在构造完成后由所属上下文调用 `acquire`，在作用域退出时按获取的逆序调用 `release`。
#[async_trait]
pub trait ScopedResource: Send + Sync + 'static {
    /// 获取资源
    ///
    /// 返回 `Some(instance)` 时，该值替代构造结果成为登记的实例。
    async fn acquire(&self) -> Result<Option<Instance>, BoxError> {
        Ok(None)
    }

    /// 释放资源
    async fn release(&self) -> Result<(), BoxError>;
}
