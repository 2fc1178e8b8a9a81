//! # Formsite
//!
//! A form-backed user registration site built on axum, with a dependency
//! injection container wiring its collaborators.
//!
//! ## Pages
//!
//! - `/` renders the static `index.html`.
//! - `/users/` renders the registration form (`users.html`). A valid `POST`
//!   stores the user and answers with the index page, or a redirect to it
//!   when `FORMSITE_ON_SUCCESS=redirect`. An invalid `POST` logs a diagnostic
//!   and re-renders the form with its errors.
//!
//! ## Collaborators
//!
//! Every collaborator of the views sits behind a trait and is resolved from
//! the [`Container`]:
//!
//! - [`form::FormFactory`] builds per-request forms,
//! - [`template::TemplateRenderer`] renders named templates,
//! - [`diagnostics::Diagnostics`] receives rejected submissions,
//! - [`persistence::UserRepository`] stores users.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formsite::config::{AppSettings, ConfigService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = AppSettings::from_config(&ConfigService::from_env())?;
//!     formsite::logging::init(&settings.log_filter)?;
//!     formsite::server::serve(settings).await
//! }
//! ```
//!
//! ## Swapping a collaborator
//!
//! ```rust,no_run
//! use formsite::prelude::*;
//! use formsite::config::AppSettings;
//! use formsite::config::ConfigService;
//! use formsite::diagnostics::{Diagnostics, TracingDiagnostics};
//! use formsite::server;
//!
//! # fn main() -> formsite::Result<()> {
//! let settings = AppSettings::from_config(&ConfigService::default())?;
//! let mut container = server::build_container(&settings)?;
//! container
//!     .register(TracingDiagnostics)
//!     .register_trait::<dyn Diagnostics, TracingDiagnostics, _>(|d| d as Arc<dyn Diagnostics>);
//! let _app: Router = server::router(container)?;
//! # Ok(())
//! # }
//! ```

// Lets the derive macros refer to `::formsite` from inside this crate.
extern crate self as formsite;

pub mod common;
pub mod config;
pub mod controller;
pub mod di;
pub mod diagnostics;
pub mod error;
pub mod form;
pub mod interceptor;
pub mod lifecycle;
pub mod logging;
pub mod module;
pub mod persistence;
pub mod server;
pub mod template;

// Re-export core types
pub use common::ViewResponse;
pub use di::{Container, ContainerBuilder, Injectable};
pub use error::{FormsiteError, Result};
pub use module::Module;

// Re-export macros
pub use formsite_macro::{Injectable as DeriveInjectable, any, controller, get, post, routes};

pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use formsite::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::{Page, ViewResponse};
    pub use crate::config::{SuccessBehavior, ViewSettings};
    pub use crate::di::{Container, ContainerBuilder, Injectable};
    pub use crate::error::{FormsiteError, Result};
    pub use crate::form::{Form, FormData, FormFactory, FormView, SaveOutcome};
    pub use crate::lifecycle::shutdown_signal;
    pub use crate::module::Module;
    pub use crate::template::{Context, TemplateRenderer};
    pub use crate::{DeriveInjectable as Injectable, any, controller, get, post, routes};
    pub use async_trait::async_trait;
    pub use axum::{
        Router,
        http::{Method, StatusCode},
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
