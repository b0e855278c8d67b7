// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

/// Inclusive reporting window. Both bounds take part in the comparison, so a
/// record stamped exactly at `start` or `end` falls inside the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse two RFC 3339 bounds as supplied on a query string.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        let start = parse_bound("start_date", start)?;
        let end = parse_bound("end_date", end)?;
        Self::new(start, end)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

fn parse_bound(field: &'static str, raw: Option<&str>) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or(ValidationError::MissingField(field))?;

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let range = DateRange::new(start, end).unwrap();

        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(end + Duration::seconds(1)));
        assert!(!range.contains(start - Duration::seconds(1)));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let start = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            DateRange::new(start, end),
            Err(ValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_parse_requires_both_bounds() {
        assert_eq!(
            DateRange::parse(None, Some("2025-01-31T00:00:00Z")),
            Err(ValidationError::MissingField("start_date"))
        );
        assert_eq!(
            DateRange::parse(Some("2025-01-01T00:00:00Z"), Some("")),
            Err(ValidationError::MissingField("end_date"))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_bound() {
        let err = DateRange::parse(Some("2025-13-01"), Some("2025-01-31T00:00:00Z")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { field: "start_date", .. }));
    }

    #[test]
    fn test_parse_normalizes_offsets() {
        let range = DateRange::parse(
            Some("2025-01-01T03:00:00+03:00"),
            Some("2025-01-02T00:00:00Z"),
        )
        .unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }
}
