use std::sync::Arc;

use crate::application::services::LinkApi;
use crate::domain::redirect::RedirectOptions;

/// Shared state injected into redirect handlers.
#[derive(Clone)]
pub struct AppState {
    pub link_api: Arc<dyn LinkApi>,
    /// Render the HTML page for missing links instead of a bare 404.
    pub not_found_template: bool,
}

impl AppState {
    pub fn new(link_api: Arc<dyn LinkApi>, options: &RedirectOptions) -> Self {
        Self {
            link_api,
            not_found_template: options.not_found_template(),
        }
    }
}
