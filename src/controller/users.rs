use super::IndexController;
use crate::common::ViewResponse;
use crate::config::{SuccessBehavior, ViewSettings};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::form::{Form, FormData, FormFactory, SaveOutcome};
use crate::template::{TemplateRenderer, USERS_TEMPLATE, context_with};
use axum::http::Method;
use formsite_macro::{controller, routes};
use std::sync::Arc;

/// Registration page: renders the form, validates submissions and stores users
#[controller(path = "/users/")]
pub struct UsersController {
    forms: Arc<dyn FormFactory>,
    renderer: Arc<dyn TemplateRenderer>,
    diagnostics: Arc<dyn Diagnostics>,
    index: Arc<IndexController>,
    settings: Arc<ViewSettings>,
}

#[routes(UsersController)]
impl UsersController {
    /// Handle one request to the users page.
    ///
    /// Only `POST` binds `payload`; any other method renders the empty form.
    /// A valid submission is committed and answered with the index page (or a
    /// redirect to it, per `ViewSettings::on_success`). An invalid one raises
    /// a single diagnostic and re-renders the form with its errors.
    #[any]
    pub async fn users(&self, method: Method, payload: FormData) -> Result<ViewResponse> {
        let mut form = self.forms.empty();

        if method == Method::POST {
            form = self.forms.bind(payload);

            if form.is_valid().await? && self.commit(&mut *form).await? {
                return self.on_success();
            }
            self.diagnostics
                .invalid_submission(Self::base_path(), form.errors());
        }

        self.render_form(&*form)
    }

    /// Returns false when storage rejected the record after validation.
    async fn commit(&self, form: &mut dyn Form) -> Result<bool> {
        match form.save(true).await? {
            SaveOutcome::Rejected => Ok(false),
            SaveOutcome::Committed { id } => {
                tracing::info!(user_id = %id, "user registered");
                Ok(true)
            }
            SaveOutcome::Pending => Ok(true),
        }
    }

    fn on_success(&self) -> Result<ViewResponse> {
        match self.settings.on_success {
            SuccessBehavior::Render => self.index.index(),
            SuccessBehavior::Redirect => Ok(ViewResponse::redirect(IndexController::base_path())),
        }
    }

    fn render_form(&self, form: &dyn Form) -> Result<ViewResponse> {
        let context = context_with("form", &form.view(), USERS_TEMPLATE)?;
        let body = self.renderer.render(USERS_TEMPLATE, &context)?;
        Ok(ViewResponse::page(USERS_TEMPLATE, body))
    }
}
