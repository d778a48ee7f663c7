//! Application state management

use std::sync::Arc;

use crate::client::Recognizer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    recognizer: Arc<dyn Recognizer>,
}

impl AppState {
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { recognizer }),
        }
    }

    /// Get the recognizer client
    pub fn recognizer(&self) -> &dyn Recognizer {
        self.inner.recognizer.as_ref()
    }
}
