//! View controllers.
//!
//! Each controller is declared with `#[controller(path = ...)]`, which makes
//! it `Injectable` and gives it a `base_path()`. Its handlers live in a
//! `#[routes]` block, which generates the `router()` mounting them.

mod index;
mod users;

pub use index::IndexController;
pub use users::UsersController;
