//! In-memory [`OverpassSource`] for tests.
use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use wayfarer_core::OsmElement;

use super::OverpassSource;
use crate::http::TransportError;

/// Stub [`OverpassSource`] replaying canned responses in order.
///
/// Once the queue is exhausted every further query yields no elements.
/// Queries received are recorded for inspection.
#[derive(Debug, Default)]
pub struct StubOverpassSource {
    responses: RefCell<VecDeque<Result<Vec<OsmElement>, TransportError>>>,
    queries: RefCell<Vec<String>>,
}

impl StubOverpassSource {
    /// Stub answering the first query with `elements`.
    #[must_use]
    pub fn with_elements(elements: Vec<OsmElement>) -> Self {
        Self::default().then_elements(elements)
    }

    /// Stub failing the first query with `error`.
    #[must_use]
    pub fn with_error(error: TransportError) -> Self {
        Self::default().then_error(error)
    }

    /// Queue another successful response.
    #[must_use]
    pub fn then_elements(self, elements: Vec<OsmElement>) -> Self {
        self.responses.borrow_mut().push_back(Ok(elements));
        self
    }

    /// Queue another failure.
    #[must_use]
    pub fn then_error(self, error: TransportError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    /// Queries received so far.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl OverpassSource for StubOverpassSource {
    async fn run_query(&self, query: &str) -> Result<Vec<OsmElement>, TransportError> {
        self.queries.borrow_mut().push(query.to_owned());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
