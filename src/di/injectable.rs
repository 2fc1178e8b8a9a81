use crate::di::Container;
use crate::error::Result;

/// Trait for types that can be built from the DI container
///
/// Usually implemented with `#[derive(Injectable)]` or `#[controller]`.
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
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the container
    ///
    /// # Errors
    /// Returns an error if any required dependency is not found in the container.
    fn inject(container: &Container) -> Result<Self>;
}
