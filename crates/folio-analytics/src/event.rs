//! Visitor events

use crate::error::AnalyticsError;
use chrono::{DateTime, Utc};
use folio_store::Record;
use serde::{Deserialize, Serialize};

/// Longest accepted page path or referrer
pub const MAX_URL_LEN: usize = 2048;

/// Kind of tracked event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    CvDownload,
}

impl EventKind {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::CvDownload => "cv_download",
        }
    }
}

impl std::str::FromStr for EventKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page_view" => Ok(Self::PageView),
            "cv_download" => Ok(Self::CvDownload),
            other => Err(AnalyticsError::UnknownKind(other.to_string())),
        }
    }
}

/// A single tracked event
///
/// Page views carry the visited path; CV downloads do not need one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Page view of `path`, timestamped now
    #[must_use]
    pub fn page_view(path: impl Into<String>) -> Self {
        Self {
            kind: EventKind::PageView,
            path: Some(path.into()),
            referrer: None,
            timestamp: Utc::now(),
        }
    }

    /// CV download, timestamped now
    #[must_use]
    pub fn cv_download() -> Self {
        Self {
            kind: EventKind::CvDownload,
            path: None,
            referrer: None,
            timestamp: Utc::now(),
        }
    }

    /// With referrer
    #[inline]
    #[must_use]
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// With explicit timestamp
    #[inline]
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Check the event before it is stored
    ///
    /// # Errors
    /// - [`AnalyticsError::MissingPath`] for a page view without a path
    /// - [`AnalyticsError::InvalidPath`] for a path not starting with `/`
    /// - [`AnalyticsError::TooLong`] for an oversized path or referrer
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        match (self.kind, self.path.as_deref()) {
            (EventKind::PageView, None) => return Err(AnalyticsError::MissingPath),
            (_, Some(path)) if !path.starts_with('/') => {
                return Err(AnalyticsError::InvalidPath(path.to_string()));
            }
            _ => {}
        }

        for (field, value) in [("path", &self.path), ("referrer", &self.referrer)] {
            if value.as_deref().is_some_and(|s| s.len() > MAX_URL_LEN) {
                return Err(AnalyticsError::TooLong {
                    field,
                    max: MAX_URL_LEN,
                });
            }
        }
        Ok(())
    }

    /// Stored form of the event
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_record(&self) -> Result<Record, AnalyticsError> {
        let value = serde_json::to_value(self)?;
        Record::from_value(value).map_err(|_| AnalyticsError::Malformed("event is not an object"))
    }

    /// Decode a stored event
    ///
    /// # Errors
    /// Returns error if the record does not have the event shape
    pub fn from_record(record: Record) -> Result<Self, AnalyticsError> {
        Ok(serde_json::from_value(record.into_value())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn kind_names() {
        assert_eq!(EventKind::CvDownload.as_str(), "cv_download");
        assert_eq!("page_view".parse::<EventKind>().unwrap(), EventKind::PageView);
        assert!("click".parse::<EventKind>().is_err());
    }

    #[test]
    fn validation() {
        assert!(AnalyticsEvent::page_view("/projects").validate().is_ok());
        assert!(AnalyticsEvent::cv_download().validate().is_ok());

        let mut missing = AnalyticsEvent::page_view("/");
        missing.path = None;
        assert!(matches!(missing.validate(), Err(AnalyticsError::MissingPath)));

        assert!(matches!(
            AnalyticsEvent::page_view("projects").validate(),
            Err(AnalyticsError::InvalidPath(_))
        ));

        let long = AnalyticsEvent::cv_download().with_referrer("x".repeat(MAX_URL_LEN + 1));
        assert!(matches!(
            long.validate(),
            Err(AnalyticsError::TooLong { field: "referrer", .. })
        ));
    }

    #[test]
    fn record_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let event = AnalyticsEvent::page_view("/").with_referrer("https://a.example").at(ts);
        let record = event.to_record().unwrap();

        assert_eq!(record.get_str("kind"), Some("page_view"));
        assert_eq!(record.get_str("path"), Some("/"));
        assert_eq!(AnalyticsEvent::from_record(record).unwrap(), event);

        let download = AnalyticsEvent::cv_download().at(ts).to_record().unwrap();
        assert!(!download.contains_key("path"));
        assert!(!download.contains_key("referrer"));
    }

    #[test]
    fn rejects_foreign_records() {
        let record = Record::new().with("kind", "click");
        assert!(AnalyticsEvent::from_record(record).is_err());
    }
}
