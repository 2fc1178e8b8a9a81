mod model;
mod repository;

pub use model::{EMAIL_MAX, FIRST_NAME_MAX, LAST_NAME_MAX, NewUser, User};
pub use repository::{InMemoryUserRepository, UserRepository};
