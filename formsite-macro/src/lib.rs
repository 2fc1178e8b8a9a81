use proc_macro::TokenStream;

mod controller;
mod http_methods;
mod injectable;

/// Derive macro for making a struct injectable into the DI container
///
/// Every named field must be an `Arc<T>` (resolved with `Container::resolve`)
/// or an `Arc<dyn Trait>` (resolved with `Container::resolve_trait`).
///
/// # Example
/// ```ignore
/// use formsite::prelude::*;
///
/// #[derive(Injectable)]
/// pub struct UserFormFactory {
///     repository: Arc<dyn UserRepository>,
/// }
/// ```
#[proc_macro_derive(Injectable)]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}

/// Attribute macro for defining a controller mounted at a base path
///
/// Generates the `Injectable` implementation for the struct and a
/// `base_path()` accessor.
///
/// # Example
/// ```ignore
/// #[controller(path = "/users/")]
/// pub struct UsersController {
///     forms: Arc<dyn FormFactory>,
///     renderer: Arc<dyn TemplateRenderer>,
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Attribute macro for declaring the routed handlers of a controller
///
/// Methods marked with `#[get]`, `#[post]` or `#[any]` are mounted under the
/// controller's `base_path()` by a generated `router(Arc<Self>)`. Every
/// parameter after `&self` is used as an axum extractor, and the handler's
/// return value must implement `IntoResponse`.
///
/// # Example
/// ```ignore
/// #[routes(UsersController)]
/// impl UsersController {
///     #[any]
///     pub async fn users(&self, method: Method, payload: FormData) -> Result<ViewResponse> {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::routes_attribute(attr, item)
}

/// HTTP GET route inside a `#[routes]` block
#[proc_macro_attribute]
pub fn get(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute(attr, item)
}

/// HTTP POST route inside a `#[routes]` block
#[proc_macro_attribute]
pub fn post(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute(attr, item)
}

/// Route answering every HTTP method inside a `#[routes]` block
#[proc_macro_attribute]
pub fn any(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute(attr, item)
}
