//! SMIRE Payments Analytics
//!
//! Analytics tools an agent runtime can call to answer questions about
//! merchant payments:
//! - Transaction value (TPV) and count (TPT) per month
//! - Month-over-month growth
//! - Product mix and pillar breakdowns
//! - Churn risk and churn candidates
//!
//! PIPELINE:
//! RESOLVE MONTH → FILTER → AGGREGATE → ENVELOPE
//!
//! The dataset is loaded once into an immutable [`store::RecordStore`] and
//! shared read-only by every call.

pub mod aggregate;
pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod store;
pub mod tools;

pub use error::{AnalyticsError, Result};

// Re-export common types
pub use analytics::PaymentsAnalytics;
pub use config::Config;
pub use filter::{Dimensions, FilterCriteria};
pub use models::*;
pub use store::RecordStore;
pub use tools::{create_default_registry, ToolRegistry};
