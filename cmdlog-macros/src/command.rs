use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[command] 宏实现
/// - 支持结构体（具名、tuple 或 unit）与枚举
/// - 合并/追加派生：Debug, Serialize（serde 经 `::cmdlog::__private` 引用）
/// - 实现 `::cmdlog::command::Command`，`NAME` 默认取类型名
/// - 参数：`#[command(name = "...")]` 覆写命令名
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as CommandAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(::cmdlog::__private::serde::Serialize),
    ];

    let (ident, generics) = match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            push_serde_crate(&mut st.attrs);
            (st.ident.clone(), st.generics.clone())
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            push_serde_crate(&mut en.attrs);
            (en.ident.clone(), en.generics.clone())
        }
        other => {
            return syn::Error::new(other.span(), "#[command] only supports struct or enum")
                .to_compile_error()
                .into();
        }
    };

    let name = cfg
        .name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let out = quote! {
        #input

        impl #impl_generics ::cmdlog::command::Command for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
        }
    };

    TokenStream::from(out)
}

// 若未显式指定 serde(crate = ...)，则指向 cmdlog 重导出的 serde
fn push_serde_crate(attrs: &mut Vec<Attribute>) {
    let has_crate = attrs.iter().any(|a| {
        a.path().is_ident("serde") && {
            let mut found = false;
            let _ = a.parse_nested_meta(|meta| {
                if meta.path.is_ident("crate") {
                    found = true;
                }
                // 跳过其余参数的取值
                if meta.input.peek(Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            });
            found
        }
    });

    if !has_crate {
        attrs.push(syn::parse_quote!(#[serde(crate = "::cmdlog::__private::serde")]));
    }
}

// -------- parsing --------

struct CommandAttrConfig {
    name: Option<syn::LitStr>,
}

impl Parse for CommandAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self { name: None });
        }

        let mut name: Option<syn::LitStr> = None;
        let pairs: Punctuated<CommandAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;

        for elem in pairs {
            match elem {
                CommandAttrElem::Name(lit) => {
                    if name.is_some() {
                        return Err(syn::Error::new(
                            lit.span(),
                            "duplicate key 'name' in attribute",
                        ));
                    }
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "command name must not be empty"));
                    }
                    name = Some(lit);
                }
            }
        }
        Ok(Self { name })
    }
}

enum CommandAttrElem {
    Name(syn::LitStr),
}

impl Parse for CommandAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "name" {
            let _eq: Token![=] = input.parse()?;
            let lit: syn::LitStr = input
                .parse()
                .map_err(|e| syn::Error::new(e.span(), "expected string literal for 'name'"))?;
            Ok(Self::Name(lit))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'name'",
            ))
        }
    }
}
