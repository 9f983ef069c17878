//! Folio Analytics
//!
//! Visitor tracking for the portfolio site: page views and CV downloads are
//! validated, stored one document per event and aggregated for the admin
//! dashboard.
//!
//! # Core Concepts
//!
//! - [`AnalyticsEvent`]: A timestamped `page_view` or `cv_download`
//! - [`AnalyticsRecorder`]: Validates and stores events in a [`folio_store::DocumentStore`]
//! - [`aggregate`]: Totals, views per page, referrers and per-day counts

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod event;
mod recorder;
mod summary;

pub use error::AnalyticsError;
pub use event::{AnalyticsEvent, EventKind, MAX_URL_LEN};
pub use recorder::{AnalyticsRecorder, DEFAULT_COLLECTION};
pub use summary::{aggregate, DailyCounts, DashboardSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
