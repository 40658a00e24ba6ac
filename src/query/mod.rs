//! Query engine for evstats
//!
//! Stateless, read-only statistics over the stored vehicle collection:
//! summary, paginated county listing, per-make model breakdown, per-year
//! trends and the generalized `analyze` group-and-rank.
//!
//! Aggregating over zero matching records returns an empty or zero
//! result. Only caller input is ever rejected.

mod aggregate;
mod engine;
mod errors;
mod request;
mod result;
mod sorter;

pub use aggregate::{round2, Grouped, Mean};
pub use engine::{QueryEngine, DEFAULT_MAX_PAGE_SIZE, DEFAULT_TOP_MAKES};
pub use errors::{QueryError, QueryErrorCode, QueryResult};
pub use request::{
    AnalyzeFilters, AnalyzeRequest, CountyQuery, GroupBy, SortField, SortOrder, VehicleClass,
    YearRange,
};
pub use result::{
    AnalyzeGroup, EligibilityCounts, MakeCount, MakeModels, ModelStats, Summary, VehiclePage,
    YearTrend,
};
pub use sorter::VehicleSorter;
