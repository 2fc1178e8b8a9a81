//! Named template rendering.
//!
//! Controllers address templates by file name and pass a JSON object as
//! context, so any renderer can stand in for [`PageRenderer`].

use crate::error::{FormsiteError, Result};
use crate::form::FormView;
use askama::Template;
use serde_json::{Map, Value};

pub const INDEX_TEMPLATE: &str = "index.html";
pub const USERS_TEMPLATE: &str = "users.html";

/// Template context: a JSON object keyed by variable name.
pub type Context = Map<String, Value>;

pub trait TemplateRenderer: Send + Sync {
    /// Render the template `name` with `context` into a response body.
    ///
    /// # Errors
    /// `TemplateNotFound` for unknown names, `MissingContext` when a
    /// required key is absent, `Render` when the engine fails.
    fn render(&self, name: &str, context: &Context) -> Result<String>;
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage<'a> {
    users_url: &'a str,
}

#[derive(Template)]
#[template(path = "users.html")]
struct UsersPage<'a> {
    form: &'a FormView,
    action: &'a str,
}

/// Renders the compiled askama pages
pub struct PageRenderer {
    users_url: String,
}

impl PageRenderer {
    pub fn new(users_url: impl Into<String>) -> Self {
        Self {
            users_url: users_url.into(),
        }
    }

    fn render_users(&self, context: &Context) -> Result<String> {
        let raw = context
            .get("form")
            .ok_or_else(|| FormsiteError::MissingContext {
                template: USERS_TEMPLATE.to_string(),
                key: "form".to_string(),
            })?;
        let form: FormView = serde_json::from_value(raw.clone())
            .map_err(|e| FormsiteError::render(USERS_TEMPLATE, e))?;

        UsersPage {
            form: &form,
            action: &self.users_url,
        }
        .render()
        .map_err(|e| FormsiteError::render(USERS_TEMPLATE, e))
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new("/users/")
    }
}

impl TemplateRenderer for PageRenderer {
    fn render(&self, name: &str, context: &Context) -> Result<String> {
        match name {
            INDEX_TEMPLATE => IndexPage {
                users_url: &self.users_url,
            }
            .render()
            .map_err(|e| FormsiteError::render(INDEX_TEMPLATE, e)),
            USERS_TEMPLATE => self.render_users(context),
            other => Err(FormsiteError::TemplateNotFound {
                name: other.to_string(),
            }),
        }
    }
}

/// Build a context holding a single `key`.
pub fn context_with<T: serde::Serialize>(key: &str, value: &T, template: &str) -> Result<Context> {
    let value = serde_json::to_value(value).map_err(|e| FormsiteError::render(template, e))?;
    let mut context = Context::new();
    context.insert(key.to_string(), value);
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldView;

    fn form_view(value: &str, errors: &[&str]) -> FormView {
        FormView {
            bound: true,
            valid: errors.is_empty(),
            fields: vec![FieldView {
                name: "first_name".into(),
                label: "First name".into(),
                input_type: "text".into(),
                value: value.into(),
                required: true,
                max_length: 128,
                errors: errors.iter().map(|e| e.to_string()).collect(),
            }],
            non_field_errors: vec![],
        }
    }

    #[test]
    fn index_ignores_context() {
        let renderer = PageRenderer::default();
        let empty = renderer.render(INDEX_TEMPLATE, &Context::new()).unwrap();
        let noisy = context_with("form", &form_view("x", &[]), INDEX_TEMPLATE).unwrap();

        assert!(empty.contains("Welcome to Formsite"));
        assert!(empty.contains("href=\"/users/\""));
        assert_eq!(empty, renderer.render(INDEX_TEMPLATE, &noisy).unwrap());
    }

    #[test]
    fn users_page_renders_fields_and_errors_escaped() {
        let renderer = PageRenderer::default();
        let context = context_with(
            "form",
            &form_view("<Ada>", &["This field is required."]),
            USERS_TEMPLATE,
        )
        .unwrap();

        let html = renderer.render(USERS_TEMPLATE, &context).unwrap();
        assert!(html.contains("name=\"first_name\""));
        assert!(html.contains("&lt;Ada&gt;"));
        assert!(!html.contains("<Ada>"));
        assert!(html.contains("<li>This field is required.</li>"));
        assert!(html.contains("action=\"/users/\""));
    }

    #[test]
    fn users_page_requires_form() {
        let err = PageRenderer::default()
            .render(USERS_TEMPLATE, &Context::new())
            .unwrap_err();
        assert!(matches!(err, FormsiteError::MissingContext { ref key, .. } if key == "form"));
    }

    #[test]
    fn malformed_form_context_is_a_render_error() {
        let mut context = Context::new();
        context.insert("form".into(), Value::String("nope".into()));
        let err = PageRenderer::default()
            .render(USERS_TEMPLATE, &context)
            .unwrap_err();
        assert!(matches!(err, FormsiteError::Render { .. }));
    }

    #[test]
    fn unknown_template_is_reported() {
        let err = PageRenderer::default()
            .render("missing.html", &Context::new())
            .unwrap_err();
        assert!(matches!(err, FormsiteError::TemplateNotFound { ref name } if name == "missing.html"));
    }
}
