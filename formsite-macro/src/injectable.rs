use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, FieldsNamed, Type};

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = match generate_injectable_impl(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    };
    TokenStream::from(expanded)
}

fn generate_injectable_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields,
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "#[derive(Injectable)] only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "#[derive(Injectable)] can only be applied to structs",
            ))
        }
    };

    let field_injections = field_injections(fields);

    Ok(quote! {
        impl #impl_generics ::formsite::Injectable for #struct_name #ty_generics #where_clause {
            fn inject(
                container: &::formsite::Container
            ) -> ::formsite::Result<Self> {
                Ok(Self {
                    #(#field_injections),*
                })
            }
        }
    })
}

/// One `field: container.resolve…()?` initializer per named field.
pub(crate) fn field_injections(fields: &FieldsNamed) -> Vec<TokenStream2> {
    fields
        .named
        .iter()
        .map(|field| {
            let field_name = &field.ident;
            let field_type = extract_injectable_type(&field.ty);

            // syn parses `dyn Trait` as a TraitObject.
            let resolve_method = match &field_type {
                Type::TraitObject(_) => quote!(resolve_trait),
                _ => quote!(resolve),
            };

            quote! {
                #field_name: container.#resolve_method::<#field_type>()?
            }
        })
        .collect()
}

/// Extract the inner type from Arc<T> or Arc<dyn Trait>
fn extract_injectable_type(ty: &Type) -> Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Arc" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                        return inner_type.clone();
                    }
                }
            }
        }
    }

    ty.clone()
}
