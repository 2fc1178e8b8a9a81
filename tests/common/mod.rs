#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use formsite::config::{AppSettings, ConfigService, ON_SUCCESS, SuccessBehavior};
use formsite::diagnostics::Diagnostics;
use formsite::form::FieldErrors;
use formsite::module::{AppModule, Module};
use formsite::persistence::{InMemoryUserRepository, User, UserRepository};
use formsite::template::{Context, TemplateRenderer};
use formsite::{Container, ContainerBuilder, FormsiteError, Result, async_trait, server};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const MULTIPART_BOUNDARY: &str = "formsite-test-boundary";

/// Captures rejected submissions instead of logging them.
#[derive(Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<(String, FieldErrors)>>,
}

impl RecordingDiagnostics {
    pub fn events(&self) -> Vec<(String, FieldErrors)> {
        self.events.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn invalid_submission(&self, route: &str, errors: &FieldErrors) {
        self.events
            .lock()
            .unwrap()
            .push((route.to_string(), errors.clone()));
    }
}

/// In-memory storage that counts every insert attempt, accepted or not.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryUserRepository,
    inserts: AtomicUsize,
}

impl CountingRepository {
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for CountingRepository {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        self.inner.email_exists(email).await
    }

    async fn insert(&self, user: User) -> Result<User> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(user).await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.inner.find_all().await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}

/// Storage whose writes always fail.
pub struct FailingRepository;

#[async_trait]
impl UserRepository for FailingRepository {
    async fn email_exists(&self, _email: &str) -> Result<bool> {
        Ok(false)
    }

    async fn insert(&self, _user: User) -> Result<User> {
        Err(FormsiteError::Persistence("connection reset".to_string()))
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<usize> {
        Ok(0)
    }
}

/// Renderer that fails every template.
pub struct FailingRenderer;

impl TemplateRenderer for FailingRenderer {
    fn render(&self, name: &str, _context: &Context) -> Result<String> {
        Err(FormsiteError::render(name, "engine unavailable"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<CountingRepository>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

pub fn settings(on_success: SuccessBehavior) -> AppSettings {
    let config = ConfigService::default();
    config.set(ON_SUCCESS, &on_success.to_string());
    AppSettings::from_config(&config).unwrap()
}

/// Default providers on top of the given storage, with diagnostics recorded.
pub fn container_with<R>(on_success: SuccessBehavior, repository: R) -> Container
where
    R: UserRepository + 'static,
{
    let mut container = ContainerBuilder::new()
        .register(settings(on_success).views)
        .register(repository)
        .bind::<dyn UserRepository, R, _>(|r| r as Arc<dyn UserRepository>)
        .build();
    AppModule::register(&mut container).unwrap();

    container
        .register(RecordingDiagnostics::default())
        .register_trait::<dyn Diagnostics, RecordingDiagnostics, _>(|d| {
            d as Arc<dyn Diagnostics>
        });
    container
}

/// The production wiring over a counting store.
pub fn test_app(on_success: SuccessBehavior) -> TestApp {
    let container = container_with(on_success, CountingRepository::default());

    let repository = container.resolve::<CountingRepository>().unwrap();
    let diagnostics = container.resolve::<RecordingDiagnostics>().unwrap();
    let router = server::router(container).unwrap();

    TestApp {
        router,
        repository,
        diagnostics,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        location,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_multipart(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{MULTIPART_BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
