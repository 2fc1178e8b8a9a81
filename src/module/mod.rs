use crate::config::ViewSettings;
use crate::controller::{IndexController, UsersController};
use crate::di::{Container, Injectable};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{FormsiteError, Result};
use crate::form::{FormFactory, UserFormFactory};
use crate::persistence::{InMemoryUserRepository, UserRepository};
use crate::template::{PageRenderer, TemplateRenderer};
use std::sync::Arc;

/// Trait for application modules
///
/// A module registers a group of providers into the container.
pub trait Module {
    /// Register all providers of this module
    fn register(container: &mut Container) -> Result<()>;
}

fn registration_failed<T>(err: FormsiteError) -> FormsiteError {
    FormsiteError::ModuleRegistrationFailed {
        message: format!("{}: {}", std::any::type_name::<T>(), err),
    }
}

/// Default collaborators: storage, templates, diagnostics and the user form.
///
/// `ViewSettings` and a `UserRepository` binding are kept if already
/// registered, so the form factory is built on the bound storage.
pub struct AppModule;

impl Module for AppModule {
    fn register(container: &mut Container) -> Result<()> {
        if !container.contains::<ViewSettings>() {
            container.register(ViewSettings::default());
        }

        if !container.contains::<dyn UserRepository>() {
            container
                .register(InMemoryUserRepository::new())
                .register_trait::<dyn UserRepository, InMemoryUserRepository, _>(|r| {
                    r as Arc<dyn UserRepository>
                });
        }

        container
            .register(PageRenderer::new(UsersController::base_path()))
            .register_trait::<dyn TemplateRenderer, PageRenderer, _>(|r| {
                r as Arc<dyn TemplateRenderer>
            });

        container
            .register(TracingDiagnostics)
            .register_trait::<dyn Diagnostics, TracingDiagnostics, _>(|d| {
                d as Arc<dyn Diagnostics>
            });

        let forms = UserFormFactory::inject(container)
            .map_err(registration_failed::<UserFormFactory>)?;
        container
            .register(forms)
            .register_trait::<dyn FormFactory, UserFormFactory, _>(|f| {
                f as Arc<dyn FormFactory>
            });

        Ok(())
    }
}

/// View controllers, resolved from whatever providers are registered at call time.
pub struct ControllerModule;

impl Module for ControllerModule {
    fn register(container: &mut Container) -> Result<()> {
        let index = IndexController::inject(container)
            .map_err(registration_failed::<IndexController>)?;
        container.register(index);

        let users = UsersController::inject(container)
            .map_err(registration_failed::<UsersController>)?;
        container.register(users);
        Ok(())
    }
}
