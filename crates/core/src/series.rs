use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurgeError};

/// Fallback layout tried after RFC 3339; `%z` also accepts offsets without a colon.
const TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Hourly event counts for one issue, as returned by the time-series query layer.
///
/// `intervals` and `data` are parallel: `data[i]` is the number of events in the
/// hour starting at `intervals[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub intervals: Vec<String>,
    pub data: Vec<u64>,
}

/// One parsed hourly observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySample {
    pub timestamp: DateTime<FixedOffset>,
    pub count: u64,
}

/// A [`GroupCount`] tagged with the issue it belongs to (batch input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSeries {
    pub issue_id: String,
    #[serde(flatten)]
    pub counts: GroupCount,
}

impl GroupCount {
    /// Build a series of consecutive hourly buckets starting at `start`.
    pub fn hourly(start: DateTime<FixedOffset>, data: Vec<u64>) -> Self {
        let intervals = (0..data.len())
            .map(|h| (start + Duration::hours(h as i64)).to_rfc3339())
            .collect();
        Self { intervals, data }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty() || self.data.is_empty()
    }

    /// Parse every interval and pair it with its count.
    ///
    /// All timestamps are parsed before anything else so a malformed record
    /// always surfaces, even when the count list is empty. An empty side yields
    /// an empty history; two non-empty sides of different length are rejected.
    pub fn samples(&self) -> Result<Vec<HistorySample>> {
        let timestamps = self
            .intervals
            .iter()
            .enumerate()
            .map(|(index, value)| {
                parse_timestamp(value).map_err(|source| SurgeError::InvalidTimestamp {
                    index,
                    value: value.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if self.is_empty() {
            return Ok(Vec::new());
        }

        if timestamps.len() != self.data.len() {
            return Err(SurgeError::MismatchedSeries {
                intervals: timestamps.len(),
                data: self.data.len(),
            });
        }

        Ok(timestamps
            .into_iter()
            .zip(self.data.iter().copied())
            .map(|(timestamp, count)| HistorySample { timestamp, count })
            .collect())
    }
}

/// Parse an ISO-8601 timestamp carrying a UTC offset.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00+00:00`, `...Z`) as well as the
/// colon-less offset and optional fractional seconds the query layer emits
/// (`2024-01-01T00:00:00.000000+0000`).
pub fn parse_timestamp(
    value: &str,
) -> std::result::Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, TIMESTAMP_LAYOUT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};

    fn utc(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn parses_query_layer_formats() {
        let a = parse_timestamp("2024-01-01T05:00:00+00:00").unwrap();
        let b = parse_timestamp("2024-01-01T05:00:00.000000+0000").unwrap();
        let c = parse_timestamp("2024-01-01T05:00:00Z").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.hour(), 5);
    }

    #[test]
    fn keeps_the_sample_offset() {
        let ts = parse_timestamp("2024-01-01T23:00:00-05:00").unwrap();
        // Still Monday in its own offset even though it is Tuesday in UTC.
        assert_eq!(ts.weekday(), Weekday::Mon);
        assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn rejects_naive_and_garbage_timestamps() {
        assert!(parse_timestamp("2024-01-01T00:00:00").is_err());
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn hourly_builds_consecutive_buckets() {
        let series = GroupCount::hourly(utc("2024-01-01T00:00:00Z"), vec![1, 2, 3]);
        let samples = series.samples().unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].timestamp, utc("2024-01-01T02:00:00Z"));
        assert_eq!(samples[2].count, 3);
    }

    #[test]
    fn empty_side_yields_empty_history() {
        let no_data = GroupCount {
            intervals: vec!["2024-01-01T00:00:00Z".to_string()],
            data: vec![],
        };
        assert!(no_data.samples().unwrap().is_empty());

        let no_intervals = GroupCount {
            intervals: vec![],
            data: vec![4, 5],
        };
        assert!(no_intervals.samples().unwrap().is_empty());
    }

    #[test]
    fn malformed_timestamp_reports_index() {
        let series = GroupCount {
            intervals: vec!["2024-01-01T00:00:00Z".to_string(), "not-a-date".to_string()],
            data: vec![],
        };
        match series.samples() {
            Err(SurgeError::InvalidTimestamp { index, value, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut series = GroupCount::hourly(utc("2024-01-01T00:00:00Z"), vec![1, 2, 3]);
        series.data.pop();
        assert!(matches!(
            series.samples(),
            Err(SurgeError::MismatchedSeries { intervals: 3, data: 2 })
        ));
    }

    #[test]
    fn issue_series_flattens_counts() {
        let json = r#"{"issue_id":"42","intervals":["2024-01-01T00:00:00+00:00"],"data":[9]}"#;
        let parsed: IssueSeries = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.issue_id, "42");
        assert_eq!(parsed.counts.data, vec![9]);
    }
}
