use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, Attribute, FnArg, ImplItem, ItemImpl,
    ItemStruct, LitStr, Token,
};

use crate::injectable::field_injections;

struct ControllerArgs {
    path: String,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path = None;
        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if name == "path" {
                let lit: LitStr = input.parse()?;
                path = Some(lit.value());
            } else {
                return Err(syn::Error::new_spanned(name, "unknown controller argument"));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(ControllerArgs {
            path: path.unwrap_or_else(|| "/".to_string()),
        })
    }
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let input = parse_macro_input!(item as ItemStruct);
    let expanded = match generate_controller_impl(&args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    };
    TokenStream::from(expanded)
}

fn generate_controller_impl(args: &ControllerArgs, input: &ItemStruct) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let base_path = &args.path;

    let fields = match &input.fields {
        syn::Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "#[controller] only supports structs with named fields",
            ))
        }
    };
    let field_injections = field_injections(fields);

    Ok(quote! {
        #input

        impl ::formsite::Injectable for #struct_name {
            fn inject(container: &::formsite::Container) -> ::formsite::Result<Self> {
                Ok(Self { #(#field_injections),* })
            }
        }

        impl #struct_name {
            pub fn base_path() -> &'static str { #base_path }
        }
    })
}

/// Route attributes understood inside a `#[routes]` block.
const HTTP_METHODS: [&str; 3] = ["get", "post", "any"];

struct RouteInfo {
    method: String,
    path: String,
    fn_name: syn::Ident,
    params: Vec<syn::Type>,
    is_async: bool,
}

pub fn routes_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    let expanded = match generate_routes_impl(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    };
    TokenStream::from(expanded)
}

fn generate_routes_impl(input: ItemImpl) -> syn::Result<TokenStream2> {
    let mut routes: Vec<RouteInfo> = Vec::new();
    let mut clean_items: Vec<ImplItem> = Vec::new();

    for item in input.items.iter() {
        match item {
            ImplItem::Fn(method) => match extract_route_info(method)? {
                Some(route_info) => {
                    routes.push(route_info);
                    let mut clean_method = method.clone();
                    clean_method.attrs.retain(|attr| !is_http_method_attr(attr));
                    clean_items.push(ImplItem::Fn(clean_method));
                }
                None => clean_items.push(item.clone()),
            },
            _ => clean_items.push(item.clone()),
        }
    }

    let route_registrations = routes.iter().map(|route| {
        let method_router = match route.method.as_str() {
            "get" => quote! { ::axum::routing::get },
            "post" => quote! { ::axum::routing::post },
            _ => quote! { ::axum::routing::any },
        };

        let path = &route.path;
        let fn_name = &route.fn_name;

        let extractors: Vec<_> = route
            .params
            .iter()
            .enumerate()
            .map(|(i, ty)| {
                let temp_ident = quote::format_ident!("__p_{}", i);
                quote! { #temp_ident: #ty }
            })
            .collect();
        let args: Vec<_> = (0..route.params.len())
            .map(|i| quote::format_ident!("__p_{}", i))
            .collect();

        let call = if route.is_async {
            quote! { controller.#fn_name(#(#args),*).await }
        } else {
            quote! { controller.#fn_name(#(#args),*) }
        };

        quote! {
            .route(
                &format!("{}{}", Self::base_path().trim_end_matches('/'), #path),
                #method_router({
                    let controller = controller.clone();
                    move |#(#extractors),*| {
                        let controller = controller.clone();
                        async move {
                            use ::axum::response::IntoResponse;
                            #call.into_response()
                        }
                    }
                }),
            )
        }
    });

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #self_ty #where_clause {
            #(#clean_items)*

            /// Mount every routed handler under `base_path()`.
            pub fn router(controller: ::std::sync::Arc<Self>) -> ::axum::Router {
                ::axum::Router::new() #(#route_registrations)*
            }
        }
    })
}

fn extract_route_info(method: &syn::ImplItemFn) -> syn::Result<Option<RouteInfo>> {
    let Some(attr) = method.attrs.iter().find(|attr| is_http_method_attr(attr)) else {
        return Ok(None);
    };
    let http_method = attr
        .path()
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default();

    // `#[any]` mounts at the base path itself.
    let path = match &attr.meta {
        syn::Meta::Path(_) => "/".to_string(),
        _ => attr.parse_args::<LitStr>()?.value(),
    };
    if !path.starts_with('/') {
        return Err(syn::Error::new_spanned(attr, "route path must start with '/'"));
    }

    let mut params = Vec::new();
    for input in method.sig.inputs.iter() {
        match input {
            FnArg::Receiver(receiver) if receiver.reference.is_none() => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "routed handlers must take `&self`",
                ))
            }
            FnArg::Receiver(_) => {}
            FnArg::Typed(pat_type) => params.push((*pat_type.ty).clone()),
        }
    }

    Ok(Some(RouteInfo {
        method: http_method,
        path,
        fn_name: method.sig.ident.clone(),
        params,
        is_async: method.sig.asyncness.is_some(),
    }))
}

fn is_http_method_attr(attr: &Attribute) -> bool {
    attr.path()
        .get_ident()
        .is_some_and(|ident| HTTP_METHODS.contains(&ident.to_string().as_str()))
}
