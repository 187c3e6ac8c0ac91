//! `#[derive(Injectable)]` 实现

use crate::utils::{arc_inner_type, to_snake_case, unraw};
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::meta::ParseNestedMeta;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Error, Fields, LitStr, Result, Token, Type};

/// `#[injectable(...)]` 参数
#[derive(Default)]
struct InjectableArgs {
    /// 自定义查找名称
    name: Option<LitStr>,
    /// 是否为作用域资源
    scoped: bool,
    /// 无提供者、导入和导出时仍作为模块
    module: bool,
    providers: Vec<Type>,
    imports: Vec<Type>,
    exports: Vec<ExportItem>,
}

impl InjectableArgs {
    fn is_module(&self) -> bool {
        self.module || !self.providers.is_empty() || !self.imports.is_empty() || !self.exports.is_empty()
    }

    fn parse_from(input: &DeriveInput) -> Result<Self> {
        let mut args = Self::default();
        for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("injectable")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    args.name = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("scoped") {
                    args.scoped = true;
                } else if meta.path.is_ident("module") {
                    args.module = true;
                } else if meta.path.is_ident("providers") {
                    args.providers.extend(parse_list::<Type>(&meta)?);
                } else if meta.path.is_ident("imports") {
                    args.imports.extend(parse_list::<Type>(&meta)?);
                } else if meta.path.is_ident("exports") {
                    args.exports.extend(parse_list::<ExportItem>(&meta)?);
                } else {
                    return Err(meta.error("未知的 injectable 参数，可用: name, scoped, module, providers, imports, exports"));
                }
                Ok(())
            })?;
        }
        Ok(args)
    }
}

/// 导出项：可注入类型或名称字面量
enum ExportItem {
    Type(Type),
    Name(LitStr),
}

impl Parse for ExportItem {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            input.parse().map(Self::Name)
        } else {
            input.parse().map(Self::Type)
        }
    }
}

fn parse_list<T: Parse>(meta: &ParseNestedMeta) -> Result<Vec<T>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let items = Punctuated::<T, Token![,]>::parse_terminated(&content)?;
    Ok(items.into_iter().collect())
}

/// 字段注入方式
enum FieldPlan {
    /// 按名称解析 `Arc<T>`
    Inject { name: String, inner: Type },
    /// 使用 `Default::default()`
    Skip,
}

fn plan_field(field: &syn::Field, default_name: String) -> Result<FieldPlan> {
    let mut name = None;
    let mut skip = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
            } else if meta.path.is_ident("skip") {
                skip = true;
            } else {
                return Err(meta.error("未知的 inject 参数，可用: name, skip"));
            }
            Ok(())
        })?;
    }

    if skip {
        return Ok(FieldPlan::Skip);
    }
    let inner = arc_inner_type(&field.ty).ok_or_else(|| {
        Error::new(
            field.ty.span(),
            "注入字段必须是 Arc<T>，不需要注入的字段请标注 #[inject(skip)]",
        )
    })?;
    Ok(FieldPlan::Inject {
        name: name.unwrap_or(default_name),
        inner: inner.clone(),
    })
}

pub fn derive_injectable_impl(input: DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Injectable 不支持泛型类型",
        ));
    }

    let args = InjectableArgs::parse_from(&input)?;
    let struct_name = &input.ident;
    let target_name = match &args.name {
        Some(lit) => lit.value(),
        None => to_snake_case(&unraw(struct_name)),
    };

    let Data::Struct(data) = &input.data else {
        return Err(Error::new(
            struct_name.span(),
            "Injectable 只能用于结构体",
        ));
    };

    let mut depends_on = Vec::new();
    let construction = match &data.fields {
        Fields::Named(fields) => {
            let mut initializers = Vec::new();
            for field in &fields.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                match plan_field(field, to_snake_case(&unraw(ident)))? {
                    FieldPlan::Inject { name, inner } => {
                        depends_on.push(quote_spanned! {field.ty.span()=>
                            .depends_on::<#inner>(#name)
                        });
                        initializers.push(quote! { #ident: deps.get::<#inner>(#name)? });
                    }
                    FieldPlan::Skip => {
                        initializers.push(quote! { #ident: ::std::default::Default::default() });
                    }
                }
            }
            quote! { Self { #(#initializers),* } }
        }
        Fields::Unit => quote! { Self },
        Fields::Unnamed(fields) => {
            return Err(Error::new(
                fields.span(),
                "Injectable 需要具名字段，依赖名称取自字段名",
            ));
        }
    };

    let module = args.is_module().then(|| {
        let providers = &args.providers;
        let imports = &args.imports;
        let exports = args.exports.iter().map(|item| match item {
            ExportItem::Type(ty) => quote! { .export_type::<#ty>() },
            ExportItem::Name(lit) => quote! { .export(#lit) },
        });
        quote! {
            .module(
                ::di_abstractions::ModuleDescriptor::new()
                    #(.provide::<#providers>())*
                    #(.import_module::<#imports>())*
                    #(#exports)*
            )
        }
    });

    let construct = if args.scoped {
        quote! { construct_scoped }
    } else {
        quote! { construct }
    };

    Ok(quote! {
        impl ::di_abstractions::Injectable for #struct_name {
            const NAME: &'static str = #target_name;

            fn descriptor() -> ::std::sync::Arc<::di_abstractions::TargetDescriptor> {
                ::di_abstractions::TargetDescriptor::builder::<Self>(
                    <Self as ::di_abstractions::Injectable>::NAME,
                )
                #(#depends_on)*
                #module
                .#construct(|deps: &::di_abstractions::ResolvedDependencies| {
                    let _ = &deps;
                    ::std::result::Result::Ok(#construction)
                })
            }
        }
    })
}
