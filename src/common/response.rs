use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

/// A rendered template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub template: String,
    pub body: String,
}

/// Outcome of a view handler
///
/// Keeps the rendered template name next to the body so callers (and tests)
/// can tell which page was produced without parsing HTML.
///
/// # Example
/// ```ignore
/// let response = controller.index()?;
/// assert_eq!(response.template(), Some("index.html"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewResponse {
    Page(Page),
    /// 303 See Other to `location`.
    Redirect { location: String },
}

impl ViewResponse {
    pub fn page(template: impl Into<String>, body: String) -> Self {
        ViewResponse::Page(Page {
            template: template.into(),
            body,
        })
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        ViewResponse::Redirect {
            location: location.into(),
        }
    }

    pub fn template(&self) -> Option<&str> {
        match self {
            ViewResponse::Page(page) => Some(&page.template),
            ViewResponse::Redirect { .. } => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ViewResponse::Page(page) => Some(&page.body),
            ViewResponse::Redirect { .. } => None,
        }
    }
}

impl IntoResponse for ViewResponse {
    fn into_response(self) -> Response {
        match self {
            ViewResponse::Page(page) => (StatusCode::OK, Html(page.body)).into_response(),
            ViewResponse::Redirect { location } => Redirect::to(&location).into_response(),
        }
    }
}
