use super::validators;
use super::{FieldErrors, FieldView, Form, FormData, FormFactory, FormView, SaveOutcome};
use crate::error::{FormsiteError, Result};
use crate::persistence::{EMAIL_MAX, FIRST_NAME_MAX, LAST_NAME_MAX, NewUser, UserRepository};
use async_trait::async_trait;
use formsite_macro::Injectable;
use std::sync::Arc;

pub const DUPLICATE_EMAIL: &str = "User with this Email already exists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Email,
}

struct FieldSpec {
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    max_length: usize,
}

impl FieldSpec {
    fn input_type(&self) -> &'static str {
        match self.kind {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
        }
    }

    /// Trim, then run the field validators. Errors are recorded under the
    /// field name and `None` is returned.
    fn clean(&self, data: &FormData, errors: &mut FieldErrors) -> Option<String> {
        let value = data.get(self.name).unwrap_or_default().trim();

        let checked = validators::required(value)
            .and_then(|_| validators::max_length(value, self.max_length))
            .and_then(|_| match self.kind {
                FieldKind::Email => validators::email(value),
                FieldKind::Text => Ok(()),
            });

        match checked {
            Ok(()) => Some(value.to_string()),
            Err(message) => {
                errors.add(self.name, message);
                None
            }
        }
    }
}

const FIRST_NAME: FieldSpec = FieldSpec {
    name: "first_name",
    label: "First name",
    kind: FieldKind::Text,
    max_length: FIRST_NAME_MAX,
};

const LAST_NAME: FieldSpec = FieldSpec {
    name: "last_name",
    label: "Last name",
    kind: FieldKind::Text,
    max_length: LAST_NAME_MAX,
};

const EMAIL: FieldSpec = FieldSpec {
    name: "email",
    label: "Email",
    kind: FieldKind::Email,
    max_length: EMAIL_MAX,
};

const FIELDS: [&FieldSpec; 3] = [&FIRST_NAME, &LAST_NAME, &EMAIL];

enum Validation {
    NotRun,
    Valid(NewUser),
    Invalid,
}

/// Registration form over the `User` record
pub struct NewUserForm {
    repository: Arc<dyn UserRepository>,
    data: Option<FormData>,
    validation: Validation,
    errors: FieldErrors,
}

impl NewUserForm {
    pub fn unbound(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            data: None,
            validation: Validation::NotRun,
            errors: FieldErrors::default(),
        }
    }

    pub fn bound(repository: Arc<dyn UserRepository>, data: FormData) -> Self {
        Self {
            data: Some(data),
            ..Self::unbound(repository)
        }
    }

    async fn full_clean(&mut self) -> Result<()> {
        let Some(data) = &self.data else {
            return Ok(());
        };

        let mut errors = FieldErrors::default();
        let first_name = FIRST_NAME.clean(data, &mut errors);
        let last_name = LAST_NAME.clean(data, &mut errors);
        let email = EMAIL.clean(data, &mut errors);

        // Uniqueness is only checked for an otherwise valid address.
        if let Some(email) = &email {
            if self.repository.email_exists(email).await? {
                errors.add(EMAIL.name, DUPLICATE_EMAIL);
            }
        }

        self.validation = match (first_name, last_name, email) {
            (Some(first_name), Some(last_name), Some(email)) if errors.is_empty() => {
                Validation::Valid(NewUser {
                    first_name,
                    last_name,
                    email,
                })
            }
            _ => Validation::Invalid,
        };
        self.errors = errors;
        Ok(())
    }
}

#[async_trait]
impl Form for NewUserForm {
    fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    async fn is_valid(&mut self) -> Result<bool> {
        if self.data.is_none() {
            return Ok(false);
        }
        if matches!(self.validation, Validation::NotRun) {
            self.full_clean().await?;
        }
        Ok(matches!(self.validation, Validation::Valid(_)))
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn view(&self) -> FormView {
        let fields = FIELDS
            .iter()
            .map(|spec| FieldView {
                name: spec.name.to_string(),
                label: spec.label.to_string(),
                input_type: spec.input_type().to_string(),
                value: self
                    .data
                    .as_ref()
                    .and_then(|d| d.get(spec.name))
                    .unwrap_or_default()
                    .to_string(),
                required: true,
                max_length: spec.max_length,
                errors: self.errors.get(spec.name).to_vec(),
            })
            .collect();

        FormView {
            bound: self.is_bound(),
            valid: matches!(self.validation, Validation::Valid(_)),
            fields,
            non_field_errors: self.errors.get(super::NON_FIELD_ERRORS).to_vec(),
        }
    }

    async fn save(&mut self, commit: bool) -> Result<SaveOutcome> {
        if !self.is_valid().await? {
            return Err(FormsiteError::InvalidForm {
                model: "User".to_string(),
            });
        }
        let Validation::Valid(new_user) = &self.validation else {
            return Err(FormsiteError::InvalidForm {
                model: "User".to_string(),
            });
        };
        if !commit {
            return Ok(SaveOutcome::Pending);
        }

        match self.repository.insert(new_user.clone().into_user()).await {
            Ok(user) => Ok(SaveOutcome::Committed {
                id: user.id.to_string(),
            }),
            // Lost a race with a concurrent registration of the same address.
            Err(FormsiteError::Duplicate { .. }) => {
                self.errors.add(EMAIL.name, DUPLICATE_EMAIL);
                self.validation = Validation::Invalid;
                Ok(SaveOutcome::Rejected)
            }
            Err(err) => Err(err),
        }
    }
}

/// Builds `NewUserForm`s backed by the injected user repository
#[derive(Injectable)]
pub struct UserFormFactory {
    repository: Arc<dyn UserRepository>,
}

impl UserFormFactory {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

impl FormFactory for UserFormFactory {
    fn empty(&self) -> Box<dyn Form> {
        Box::new(NewUserForm::unbound(Arc::clone(&self.repository)))
    }

    fn bind(&self, data: FormData) -> Box<dyn Form> {
        Box::new(NewUserForm::bound(Arc::clone(&self.repository), data))
    }
}
