//! Pagination Config

use clap::Args;

use topup_app::pagination::DEFAULT_PAGE_SIZE;

/// Page sizes for the list endpoints.
#[derive(Debug, Args)]
pub struct PaginationConfig {
    /// Rows per page on paginated endpoints
    #[arg(long, env = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}
