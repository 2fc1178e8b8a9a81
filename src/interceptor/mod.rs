//! Request interceptors mounted around every route.

mod logging;

pub use logging::log_requests;
