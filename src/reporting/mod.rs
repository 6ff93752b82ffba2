pub mod aggregate;
pub mod filter;

pub use aggregate::{
    item_popularity, sales_metrics, sales_trend, ItemSales, OrderSnapshot, SalesMetrics,
    SoldItem, TrendPoint,
};
pub use filter::{DateRange, ReportFilter, ResolvedFilter, Window};
