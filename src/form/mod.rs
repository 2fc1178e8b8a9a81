//! Form binding and validation.
//!
//! A [`Form`] wraps either nothing (unbound, rendered empty) or a submitted
//! [`FormData`] payload. Validation runs once and its outcome is cached on the
//! form; [`Form::view`] turns the current state into the context handed to
//! the template renderer.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod extractor;
mod user_form;
pub mod validators;

pub use user_form::{NewUserForm, UserFormFactory};

/// Key under which errors that belong to no single field are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Submitted key/value payload. Repeated keys keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        url::form_urlencoded::parse(body).into_owned().collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = FormData::new();
        for (k, v) in iter {
            data.insert(k, v);
        }
        data
    }
}

/// Validation messages per field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Render context of a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub input_type: String,
    pub value: String,
    pub required: bool,
    pub max_length: usize,
    pub errors: Vec<String>,
}

/// Render context of a whole form, as passed to `users.html`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub bound: bool,
    pub valid: bool,
    pub fields: Vec<FieldView>,
    pub non_field_errors: Vec<String>,
}

impl FormView {
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_errors(&self) -> bool {
        !self.non_field_errors.is_empty() || self.fields.iter().any(|f| !f.errors.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was written; carries its identifier.
    Committed { id: String },
    /// Validated but not written (`commit = false`).
    Pending,
    /// Storage refused the record; the form now carries the reason as field errors.
    Rejected,
}

#[async_trait]
pub trait Form: Send + Sync {
    fn is_bound(&self) -> bool;

    /// Run validation (once) and report the outcome.
    ///
    /// An unbound form is never valid and never has errors.
    async fn is_valid(&mut self) -> Result<bool>;

    fn errors(&self) -> &FieldErrors;

    fn has_error(&self, field: &str) -> bool {
        self.errors().contains(field)
    }

    fn view(&self) -> FormView;

    /// Persist the cleaned data, validating first if needed.
    ///
    /// # Errors
    /// `FormsiteError::InvalidForm` if the data does not validate; storage
    /// failures propagate unchanged.
    async fn save(&mut self, commit: bool) -> Result<SaveOutcome>;
}

/// Builds per-request forms.
pub trait FormFactory: Send + Sync {
    fn empty(&self) -> Box<dyn Form>;

    fn bind(&self, data: FormData) -> Box<dyn Form>;
}
