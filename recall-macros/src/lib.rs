use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, FnArg, GenericArgument, GenericParam, ItemFn, Pat, PathArguments,
    ReturnType, Type,
};

mod attributes;

use attributes::{capacity_expr, parse_cache_attributes, CacheAttributes, Scope};

/// If `ty` is `Result<T, ..>` (or an alias named `Result`), returns `T`.
fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

/// Builds the expression producing the call's `CacheKey`: the identity, then
/// `self` (for methods), then every argument in declaration order.
fn generate_key_expr(name: &str, has_self: bool, arg_idents: &[syn::Ident]) -> TokenStream2 {
    let self_part = if has_self {
        quote! { __builder.positional_key(self.to_cache_key()); }
    } else {
        quote! {}
    };
    quote! {{
        use ::recall_core::CacheableKey as _;
        let mut __builder = ::recall_core::KeyBuilder::new(#name);
        #self_part
        #(
            __builder.positional_key((#arg_idents).to_cache_key());
        )*
        __builder.finish()
    }}
}

fn check_signature(input: &ItemFn) -> syn::Result<Vec<syn::Ident>> {
    let sig = &input.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[cache] does not support async functions",
        ));
    }
    for param in &sig.generics.params {
        if !matches!(param, GenericParam::Lifetime(_)) {
            return Err(syn::Error::new_spanned(
                param,
                "#[cache] cannot be used on functions with type or const parameters",
            ));
        }
    }

    let mut arg_idents = Vec::new();
    for arg in &sig.inputs {
        if let FnArg::Typed(pat_type) = arg {
            match &*pat_type.pat {
                Pat::Ident(pat_ident) => arg_idents.push(pat_ident.ident.clone()),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "#[cache] arguments must be plain identifiers",
                    ))
                }
            }
        }
    }
    Ok(arg_idents)
}

fn generate_global_body(
    value_ty: &TokenStream2,
    ret_ty: &TokenStream2,
    new_cache: &TokenStream2,
    key_expr: &TokenStream2,
    block: &syn::Block,
    is_result: bool,
) -> TokenStream2 {
    let cache_ident = format_ident!("__RECALL_CACHE");
    let call = if is_result {
        quote! { #cache_ident.try_get_or_insert_with(__key, || -> #ret_ty #block) }
    } else {
        quote! { #cache_ident.get_or_insert_with(__key, || -> #ret_ty #block) }
    };

    quote! {
        static #cache_ident: ::recall_core::__private::Lazy<::recall_core::SharedCache<#value_ty>> =
            ::recall_core::__private::Lazy::new(|| ::recall_core::SharedCache::#new_cache);

        let __key = #key_expr;
        #call
    }
}

fn generate_thread_local_body(
    value_ty: &TokenStream2,
    ret_ty: &TokenStream2,
    new_cache: &TokenStream2,
    key_expr: &TokenStream2,
    block: &syn::Block,
    is_result: bool,
) -> TokenStream2 {
    let cache_ident = format_ident!("__RECALL_CACHE");
    let (hit, store) = if is_result {
        (
            quote! { ::std::result::Result::Ok(__hit) },
            quote! { __cache.borrow_mut().store_result(__key, &__result); },
        )
    } else {
        (
            quote! { __hit },
            quote! { __cache.borrow_mut().store(__key, ::std::clone::Clone::clone(&__result)); },
        )
    };

    // The RefCell is only borrowed around lookup and store, so the body may
    // call the function recursively.
    quote! {
        ::std::thread_local! {
            static #cache_ident: ::std::cell::RefCell<::recall_core::BoundedCache<#value_ty>> =
                ::std::cell::RefCell::new(::recall_core::BoundedCache::#new_cache);
        }

        let __key = #key_expr;
        if let ::std::option::Option::Some(__hit) =
            #cache_ident.with(|__cache| __cache.borrow_mut().lookup(&__key))
        {
            return #hit;
        }

        let __result = (|| -> #ret_ty #block)();
        #cache_ident.with(|__cache| {
            #store
        });
        __result
    }
}

fn expand(attrs: CacheAttributes, input: ItemFn) -> syn::Result<TokenStream2> {
    let arg_idents = check_signature(&input)?;

    let fn_attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;

    let has_self = sig.inputs.iter().any(|arg| matches!(arg, FnArg::Receiver(_)));

    let ret_ty = match &sig.output {
        ReturnType::Type(_, ty) => quote! { #ty },
        ReturnType::Default => quote! { () },
    };
    let ok_ty = match &sig.output {
        ReturnType::Type(_, ty) => result_ok_type(ty),
        ReturnType::Default => None,
    };
    let is_result = ok_ty.is_some();
    let value_ty = match ok_ty {
        Some(ty) => quote! { #ty },
        None => ret_ty.clone(),
    };

    let name = attrs
        .custom_name
        .unwrap_or_else(|| sig.ident.to_string());
    let capacity = capacity_expr(attrs.capacity);
    let policy = &attrs.policy;
    let new_cache = quote! { from_parts(#name, #capacity, #policy) };
    let key_expr = generate_key_expr(&name, has_self, &arg_idents);

    let body = match attrs.scope {
        Scope::Global => {
            generate_global_body(&value_ty, &ret_ty, &new_cache, &key_expr, block, is_result)
        }
        Scope::Thread => {
            generate_thread_local_body(&value_ty, &ret_ty, &new_cache, &key_expr, block, is_result)
        }
    };

    Ok(quote! {
        #(#fn_attrs)*
        #vis #sig {
            #body
        }
    })
}

/// Memoizes a function or method in a bounded cache.
///
/// Each call builds a key from the cache name and the arguments (plus `self`
/// for methods). On a hit the stored result is returned and the body does not
/// run; on a miss the body runs and its result is stored. When the cache is
/// full, storing a new result evicts one entry first.
///
/// # Requirements
///
/// - **Arguments**: plain identifiers whose types implement `CacheableKey`
///   (or `DefaultCacheableKey` + `Debug`); the same for `self`
/// - **Return type**: `Clone + Send`, without type parameters or `Self`
/// - **Purity**: the body should depend on its arguments only
///
/// # Macro Parameters
///
/// - `capacity` (optional): maximum number of resident results. Default: 10.
///   `capacity = 0` is rejected at compile time.
/// - `policy` (optional): which entry leaves a full cache:
///   - `"fifo"` - the oldest stored result (default)
///   - `"lru"` - the least recently returned result
/// - `scope` (optional):
///   - `"global"` - one cache for all threads (default); concurrent misses on
///     the same arguments run the body once
///   - `"thread"` - every thread has its own cache
/// - `name` (optional): the identity prefixing every key. Default: the
///   function name.
///
/// # Cache Behavior
///
/// - Functions returning `Result<T, E>` cache only `Ok(T)`; an `Err` is
///   returned to the caller and the next call runs the body again
/// - A panicking body stores nothing
/// - Recursive functions work in both scopes
///
/// # Examples
///
/// ```ignore
/// use recall::cache;
///
/// #[cache(capacity = 2)]
/// fn slow_adder(x: i32, y: i32) -> i32 {
///     std::thread::sleep(std::time::Duration::from_secs(1));
///     x + y
/// }
///
/// slow_adder(2, 5); // miss, sleeps
/// slow_adder(3, 5); // miss, sleeps
/// slow_adder(2, 5); // hit
/// slow_adder(4, 5); // miss, evicts (2, 5)
/// ```
///
/// ```ignore
/// use recall::cache;
///
/// #[cache(capacity = 32, policy = "lru", scope = "thread", name = "config_parser")]
/// fn parse_port(raw: String) -> Result<u16, std::num::ParseIntError> {
///     raw.trim().parse()
/// }
/// ```
#[proc_macro_attribute]
pub fn cache(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attrs = match parse_cache_attributes(attr.into()) {
        Ok(attrs) => attrs,
        Err(err) => return err.to_compile_error().into(),
    };
    let input = parse_macro_input!(item as ItemFn);

    match expand(attrs, input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
