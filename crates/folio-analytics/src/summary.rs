//! Dashboard aggregation

use crate::event::{AnalyticsEvent, EventKind};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Event counts of a single UTC day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounts {
    pub page_views: u64,
    pub cv_downloads: u64,
}

/// Figures shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_page_views: u64,
    pub cv_downloads: u64,
    /// Page path -> views, most viewed first
    pub views_by_page: IndexMap<String, u64>,
    /// Referrer -> events, in first-seen order
    pub referrers: IndexMap<String, u64>,
    pub by_day: BTreeMap<NaiveDate, DailyCounts>,
}

impl DashboardSummary {
    /// Most viewed page
    #[must_use]
    pub fn top_page(&self) -> Option<(&str, u64)> {
        self.views_by_page.first().map(|(p, n)| (p.as_str(), *n))
    }
}

/// Count events by kind, page, referrer and UTC day
///
/// Pages with equal view counts keep the order they were first seen in.
#[must_use]
pub fn aggregate(events: &[AnalyticsEvent]) -> DashboardSummary {
    let mut summary = DashboardSummary::default();

    for event in events {
        let day = summary
            .by_day
            .entry(event.timestamp.date_naive())
            .or_default();
        match event.kind {
            EventKind::PageView => {
                summary.total_page_views += 1;
                day.page_views += 1;
                if let Some(path) = &event.path {
                    *summary.views_by_page.entry(path.clone()).or_default() += 1;
                }
            }
            EventKind::CvDownload => {
                summary.cv_downloads += 1;
                day.cv_downloads += 1;
            }
        }
        if let Some(referrer) = &event.referrer {
            *summary.referrers.entry(referrer.clone()).or_default() += 1;
        }
    }

    // stable: ties keep first-seen order
    summary.views_by_page.sort_by(|_, a, _, b| b.cmp(a));
    summary
}
