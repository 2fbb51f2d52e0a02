//! Parsing of the `#[cache(...)]` argument list.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, Lit, MetaNameValue, Token};

/// Same value as `recall_core::DEFAULT_CAPACITY`.
const DEFAULT_CAPACITY: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Global,
    Thread,
}

/// Parsed attributes of one cached function.
pub struct CacheAttributes {
    pub capacity: usize,
    /// Path expression of the `EvictionPolicy` variant.
    pub policy: TokenStream2,
    pub scope: Scope,
    pub custom_name: Option<String>,
}

impl Default for CacheAttributes {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: quote! { ::recall_core::EvictionPolicy::FIFO },
            scope: Scope::Global,
            custom_name: None,
        }
    }
}

fn lit_of<'a>(nv: &'a MetaNameValue) -> Option<&'a Lit> {
    match &nv.value {
        Expr::Lit(expr_lit) => Some(&expr_lit.lit),
        _ => None,
    }
}

fn string_value(nv: &MetaNameValue, what: &str) -> syn::Result<String> {
    match lit_of(nv) {
        Some(Lit::Str(s)) => Ok(s.value()),
        _ => Err(syn::Error::new_spanned(
            &nv.value,
            format!("expected a string literal for `{}`", what),
        )),
    }
}

/// `capacity = <int>`; zero is rejected here, before anything runs.
pub fn parse_capacity_attribute(nv: &MetaNameValue) -> syn::Result<usize> {
    let lit = match lit_of(nv) {
        Some(Lit::Int(lit)) => lit,
        _ => {
            return Err(syn::Error::new_spanned(
                &nv.value,
                "expected `capacity = <positive integer>`",
            ))
        }
    };
    let capacity = lit.base10_parse::<usize>()?;
    if capacity == 0 {
        return Err(syn::Error::new_spanned(
            lit,
            "cache capacity must be a positive integer",
        ));
    }
    Ok(capacity)
}

pub fn parse_policy_attribute(nv: &MetaNameValue) -> syn::Result<TokenStream2> {
    let name = string_value(nv, "policy")?;
    match name.to_ascii_lowercase().as_str() {
        "fifo" => Ok(quote! { ::recall_core::EvictionPolicy::FIFO }),
        "lru" => Ok(quote! { ::recall_core::EvictionPolicy::LRU }),
        _ => Err(syn::Error::new_spanned(
            &nv.value,
            format!("unknown eviction policy `{}`, expected \"fifo\" or \"lru\"", name),
        )),
    }
}

pub fn parse_scope_attribute(nv: &MetaNameValue) -> syn::Result<Scope> {
    let name = string_value(nv, "scope")?;
    match name.as_str() {
        "global" => Ok(Scope::Global),
        "thread" => Ok(Scope::Thread),
        _ => Err(syn::Error::new_spanned(
            &nv.value,
            "invalid scope, expected \"global\" or \"thread\"",
        )),
    }
}

pub fn parse_name_attribute(nv: &MetaNameValue) -> syn::Result<String> {
    let name = string_value(nv, "name")?;
    if name.is_empty() {
        return Err(syn::Error::new_spanned(&nv.value, "cache name must not be empty"));
    }
    Ok(name)
}

pub fn parse_cache_attributes(attr: TokenStream2) -> syn::Result<CacheAttributes> {
    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let parsed_args = parser.parse2(attr)?;

    let mut attrs = CacheAttributes::default();
    for nv in parsed_args {
        if nv.path.is_ident("capacity") {
            attrs.capacity = parse_capacity_attribute(&nv)?;
        } else if nv.path.is_ident("policy") {
            attrs.policy = parse_policy_attribute(&nv)?;
        } else if nv.path.is_ident("scope") {
            attrs.scope = parse_scope_attribute(&nv)?;
        } else if nv.path.is_ident("name") {
            attrs.custom_name = Some(parse_name_attribute(&nv)?);
        } else {
            return Err(syn::Error::new_spanned(
                &nv.path,
                "unknown attribute, expected one of `capacity`, `policy`, `scope`, `name`",
            ));
        }
    }
    Ok(attrs)
}

/// `NonZeroUsize` constructor for a capacity already known to be positive.
pub fn capacity_expr(capacity: usize) -> TokenStream2 {
    let extra = capacity - 1;
    quote! { ::std::num::NonZeroUsize::MIN.saturating_add(#extra) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let attrs = parse_cache_attributes(TokenStream2::new()).unwrap();
        assert_eq!(attrs.capacity, 10);
        assert_eq!(attrs.scope, Scope::Global);
        assert!(attrs.custom_name.is_none());
        assert_eq!(
            attrs.policy.to_string(),
            quote! { ::recall_core::EvictionPolicy::FIFO }.to_string()
        );
    }

    #[test]
    fn test_all_attributes() {
        let attrs = parse_cache_attributes(
            quote! { capacity = 2, policy = "LRU", scope = "thread", name = "slow_adder" },
        )
        .unwrap();
        assert_eq!(attrs.capacity, 2);
        assert_eq!(attrs.scope, Scope::Thread);
        assert_eq!(attrs.custom_name.as_deref(), Some("slow_adder"));
        assert_eq!(
            attrs.policy.to_string(),
            quote! { ::recall_core::EvictionPolicy::LRU }.to_string()
        );
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = parse_cache_attributes(quote! { capacity = 0 }).err().unwrap();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(parse_cache_attributes(quote! { capacity = "two" }).is_err());
        assert!(parse_cache_attributes(quote! { policy = "random" }).is_err());
        assert!(parse_cache_attributes(quote! { scope = "process" }).is_err());
        assert!(parse_cache_attributes(quote! { name = "" }).is_err());
        assert!(parse_cache_attributes(quote! { ttl = 60 }).is_err());
    }
}
