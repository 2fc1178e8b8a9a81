pub mod response;

pub use response::{Page, ViewResponse};
