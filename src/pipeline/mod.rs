pub mod aggregate;
pub mod cache;
pub mod detail;
pub mod filter;
pub mod growth;
pub mod loader;
pub mod record;
pub mod table;

// Flat public surface for the pipeline.
pub use aggregate::{
    advisor_options, by_segment, distinct_count, group_by, monthly_trend, summary_metrics,
    top_advisors, top_n, AdvisorRollup, Dimension, GroupKey, GroupRow, Metric, MonthlyRollup,
    SegmentRollup, SummaryMetrics,
};
pub use cache::TableCache;
pub use detail::{clamp_rows, detail_rows, SortKey, SortOrder};
pub use filter::{apply, FilterSelection};
pub use growth::{client_retention, yearly_growth, ClientRetention, YearlyGrowth};
pub use loader::{
    load, BatchSource, LoadError, MemorySource, Snapshot, SourceId, WorkbookDir, MAX_AUM,
};
pub use record::{ColumnSpec, Record, SheetRow};
pub use table::Table;
