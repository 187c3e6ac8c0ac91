//! # Component Macros
//!
//! 这个 crate 提供了在编译期为结构体生成 `di_abstractions::Injectable` 实现的派生宏。
//! 查找名称、依赖清单和模块结构全部在编译期确定，运行时不做任何反射。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Injectable;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! #[injectable(scoped)]
//! pub struct HttpService;
//!
//! #[derive(Injectable)]
//! #[injectable(providers(HttpService), exports(HttpService))]
//! pub struct ApplicationServices;
//!
//! #[derive(Injectable)]
//! pub struct GooglePinger {
//!     http_service: Arc<HttpService>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 可注入目标派生宏
///
/// 生成 `Injectable` 实现：`NAME` 常量和构建 `TargetDescriptor` 的 `descriptor()`。
///
/// # 结构体参数 `#[injectable(...)]`
///
/// - `name = "custom_name"` - 自定义查找名称（默认为类型名的蛇形命名）
/// - `scoped` - 作用域资源，类型需实现 `ScopedResource`
/// - `providers(A, B)` - 模块的自有提供者
/// - `imports(M)` - 导入的模块
/// - `exports(A, M, "name")` - 对导入方可见的提供者或导入
/// - `module` - 即使三个列表都为空也作为模块
///
/// # 字段参数 `#[inject(...)]`
///
/// 字段类型必须是 `Arc<T>`，默认按字段名解析。
///
/// - `name = "dependency"` - 指定依赖名称
/// - `skip` - 不注入，使用 `Default::default()`
#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
