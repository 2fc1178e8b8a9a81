use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormsiteError>;

#[derive(Debug, Error)]
pub enum FormsiteError {
    #[error("Dependency not found: {type_name}")]
    DependencyNotFound { type_name: String },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Module registration failed: {message}")]
    ModuleRegistrationFailed { message: String },

    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Template {template} requires context key '{key}'")]
    MissingContext { template: String, key: String },

    #[error("Failed to render {template}: {message}")]
    Render { template: String, message: String },

    #[error("The {model} could not be created because the data didn't validate")]
    InvalidForm { model: String },

    #[error("Duplicate value for unique field {field}: {value}")]
    Duplicate { field: String, value: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Malformed request body: {0}")]
    MalformedPayload(String),
}

impl FormsiteError {
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn render(template: impl Into<String>, message: impl ToString) -> Self {
        Self::Render {
            template: template.into(),
            message: message.to_string(),
        }
    }

    /// A body that cannot be decoded is the client's fault; everything else
    /// reaching a response is a collaborator failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FormsiteError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FormsiteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        // Internal details stay in the log.
        let message = if status.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };
        (status, message).into_response()
    }
}
