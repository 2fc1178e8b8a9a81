use crate::common::ViewResponse;
use crate::error::Result;
use crate::template::{Context, INDEX_TEMPLATE, TemplateRenderer};
use formsite_macro::{controller, routes};
use std::sync::Arc;

/// Static landing page
#[controller(path = "/")]
pub struct IndexController {
    renderer: Arc<dyn TemplateRenderer>,
}

#[routes(IndexController)]
impl IndexController {
    pub fn new(renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { renderer }
    }

    /// Renders `index.html` with an empty context. Request method and body are ignored.
    #[any]
    pub fn index(&self) -> Result<ViewResponse> {
        let body = self.renderer.render(INDEX_TEMPLATE, &Context::new())?;
        Ok(ViewResponse::page(INDEX_TEMPLATE, body))
    }
}
