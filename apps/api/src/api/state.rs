use std::sync::Arc;

use crate::domain::repositories::Store;

/// Shared state handed to every handler
///
/// Cheap to clone; nothing in it changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.into(),
        }
    }
}
