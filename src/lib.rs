// Emendas Dashboard - Core Library
// Filtering/aggregation engine behind the earmark execution dashboard.
// Exposes all modules for use in the CLI, the API server, and tests.

pub mod money;
pub mod model;
pub mod facets;
pub mod filter;
pub mod aggregate;
pub mod autocomplete;
pub mod dataset;

// Re-export commonly used types
pub use money::{format_money, parse_money};
pub use model::{Beneficiary, Committee, Deputy, DeputyStatus, Earmark, Office, UNIDENTIFIED};
pub use facets::{extract_earmark_facets, extract_facets, EarmarkFacets, Facets};
pub use filter::{
    filter_activity, filter_deputies, filter_earmarks, Activity, DeputyFilter, EarmarkFilter,
};
pub use aggregate::{aggregate, Aggregate, FormattedTotals, Totals};
pub use autocomplete::{AutocompleteIndex, MIN_QUERY_DATASET, MIN_QUERY_DETAIL, SUGGESTION_LIMIT};
pub use dataset::{Dataset, DetailView, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
