//! Shared handler state

use std::sync::Arc;

use topup_app::{context::AppContext, pagination::Page};

/// Injected into the depot once per request by the router.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    page_size: u32,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, page_size: u32) -> Arc<Self> {
        Arc::new(Self { app, page_size })
    }

    /// Page request for a 1-based `page` query parameter, sized by `PAGE_SIZE`.
    pub(crate) fn page(&self, page: Option<u32>) -> Page {
        Page::new(page.unwrap_or(1), self.page_size)
    }
}
