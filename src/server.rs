//! Application bootstrap: container, router and the HTTP listener.

use crate::config::AppSettings;
use crate::controller::{IndexController, UsersController};
use crate::di::{Container, ContainerBuilder};
use crate::error::Result;
use crate::interceptor::log_requests;
use crate::lifecycle::shutdown_signal;
use crate::module::{AppModule, ControllerModule, Module};
use anyhow::Context as _;
use axum::{Router, middleware};

/// Container with the settings and every default provider registered.
///
/// Providers may be rebound on the returned container before it is handed
/// to [`router`].
pub fn build_container(settings: &AppSettings) -> Result<Container> {
    let mut container = ContainerBuilder::new()
        .register(settings.views.clone())
        .build();
    AppModule::register(&mut container)?;
    Ok(container)
}

/// Resolve the controllers and mount their routes.
pub fn router(mut container: Container) -> Result<Router> {
    ControllerModule::register(&mut container)?;
    let index = container.resolve::<IndexController>()?;
    let users = container.resolve::<UsersController>()?;

    Ok(Router::new()
        .merge(IndexController::router(index))
        .merge(UsersController::router(users))
        .layer(middleware::from_fn(log_requests)))
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(settings: AppSettings) -> anyhow::Result<()> {
    let container = build_container(&settings)?;
    let app = router(container)?;

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        %addr,
        on_success = %settings.views.on_success,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
