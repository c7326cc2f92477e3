// lib.rs
use std::sync::Arc;

use handlebars::Handlebars;

pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod routes;
pub mod store;

pub use error::AppError;
pub use routes::build_router;
pub use store::{MemoryStore, PgStore, PollStore};

/// Shared application state carried into the axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PollStore>,
    pub templates: Arc<Handlebars<'static>>,
}

impl AppState {
    pub fn new(store: Arc<dyn PollStore>) -> Result<Self, handlebars::TemplateError> {
        Ok(Self {
            store,
            templates: Arc::new(pages::registry()?),
        })
    }
}
