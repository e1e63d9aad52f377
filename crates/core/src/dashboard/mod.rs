//! Dashboard rollups.
//!
//! Convenience aggregates recomputed from posted journal lines on every
//! call. Nothing here is cached or written back.

pub mod service;
pub mod types;

pub use service::DashboardService;
pub use types::DashboardStats;
