//! In-memory [`ImageResolver`] for tests.
use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;

use super::ImageResolver;
use crate::http::TransportError;

/// Stub [`ImageResolver`] with per-entity answers.
///
/// Unknown ids resolve to `Ok(None)`. Every lookup is recorded.
#[derive(Debug, Default)]
pub struct StubImageResolver {
    answers: HashMap<String, Result<Option<String>, TransportError>>,
    lookups: RefCell<Vec<String>>,
}

impl StubImageResolver {
    /// Resolve `id` to `url`.
    #[must_use]
    pub fn with_image(mut self, id: &str, url: &str) -> Self {
        self.answers.insert(id.to_owned(), Ok(Some(url.to_owned())));
        self
    }

    /// Fail lookups of `id` with `error`.
    #[must_use]
    pub fn with_failure(mut self, id: &str, error: TransportError) -> Self {
        self.answers.insert(id.to_owned(), Err(error));
        self
    }

    /// Ids looked up so far, in call order.
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ImageResolver for StubImageResolver {
    async fn resolve_image(&self, id: &str) -> Result<Option<String>, TransportError> {
        self.lookups.borrow_mut().push(id.to_owned());
        self.answers.get(id).cloned().unwrap_or(Ok(None))
    }
}
