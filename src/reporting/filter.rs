//! Report filter resolution. All windows are computed in UTC and are
//! inclusive at both ends.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    Custom,
}

/// Filter body accepted by every report endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub date_range: Option<DateRange>,
    /// Calendar date, `YYYY-MM-DD`. Required when `dateRange` is `custom`.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Menu item category; `"all"` (or absent) means no restriction.
    pub category: Option<String>,
    pub menu_item_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedFilter {
    pub window: Window,
    pub category: Option<String>,
    pub menu_item_id: Option<Uuid>,
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .expect("23:59:59 is a valid wall-clock time")
        .and_utc()
}

impl ReportFilter {
    /// Resolves the filter against a reference instant.
    ///
    /// `custom` without a start date is the only shape the aggregator
    /// refuses; everything else falls back to a defined window, down to the
    /// trailing-30-days default when no date fields are given at all.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<ResolvedFilter, AppError> {
        let today = now.date_naive();

        let window = match self.date_range {
            Some(DateRange::Today) => Window {
                start: day_start(today),
                end: day_end(today),
            },
            Some(DateRange::Week) => Window {
                start: day_start(today.checked_sub_days(Days::new(7)).unwrap_or(today)),
                end: day_end(today),
            },
            Some(DateRange::Month) => Window {
                start: day_start(today.checked_sub_months(Months::new(1)).unwrap_or(today)),
                end: day_end(today),
            },
            Some(DateRange::Custom) | None => match self.start_date {
                Some(start) => Window {
                    start: day_start(start),
                    end: self.end_date.map(day_end).unwrap_or(now),
                },
                None if self.date_range == Some(DateRange::Custom) => {
                    return Err(AppError::Validation(
                        "custom date range requires startDate".to_string(),
                    ));
                }
                None => Window {
                    start: day_start(today.checked_sub_days(Days::new(30)).unwrap_or(today)),
                    end: day_end(today),
                },
            },
        };

        if window.end < window.start {
            return Err(AppError::Validation(
                "endDate must not precede startDate".to_string(),
            ));
        }

        // "all" is the UI's explicit way of saying no category restriction.
        let category = self
            .category
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case("all") && !c.is_empty())
            .map(|c| c.to_string());

        Ok(ResolvedFilter {
            window,
            category,
            menu_item_id: self.menu_item_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn today_spans_the_current_day() {
        let now = at(2026, 3, 15, 14, 30, 0);
        let filter = ReportFilter {
            date_range: Some(DateRange::Today),
            ..Default::default()
        };
        let resolved = filter.resolve(now).unwrap();
        assert_eq!(resolved.window.start, at(2026, 3, 15, 0, 0, 0));
        assert_eq!(resolved.window.end, at(2026, 3, 15, 23, 59, 59));
    }

    #[test]
    fn week_goes_back_seven_days_on_day_boundaries() {
        let now = at(2026, 3, 15, 14, 30, 0);
        let filter = ReportFilter {
            date_range: Some(DateRange::Week),
            ..Default::default()
        };
        let window = filter.resolve(now).unwrap().window;
        assert_eq!(window.start, at(2026, 3, 8, 0, 0, 0));
        assert_eq!(window.end, at(2026, 3, 15, 23, 59, 59));
    }

    #[test]
    fn month_handles_short_months() {
        let now = at(2026, 3, 31, 9, 0, 0);
        let filter = ReportFilter {
            date_range: Some(DateRange::Month),
            ..Default::default()
        };
        let window = filter.resolve(now).unwrap().window;
        // 2026-03-31 minus one calendar month clamps to the end of February.
        assert_eq!(window.start, at(2026, 2, 28, 0, 0, 0));
    }

    #[test]
    fn custom_with_both_dates() {
        let now = at(2026, 3, 15, 14, 30, 0);
        let filter = ReportFilter {
            date_range: Some(DateRange::Custom),
            start_date: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()),
            ..Default::default()
        };
        let window = filter.resolve(now).unwrap().window;
        assert_eq!(window.start, at(2026, 1, 1, 0, 0, 0));
        assert_eq!(window.end, at(2026, 1, 31, 23, 59, 59));
    }

    #[test]
    fn bare_start_date_runs_to_now() {
        let now = at(2026, 3, 15, 14, 30, 0);
        let filter = ReportFilter {
            start_date: Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
            ..Default::default()
        };
        let window = filter.resolve(now).unwrap().window;
        assert_eq!(window.start, at(2026, 3, 1, 0, 0, 0));
        assert_eq!(window.end, now);
    }

    #[test]
    fn empty_filter_defaults_to_trailing_thirty_days() {
        let now = at(2026, 3, 31, 12, 0, 0);
        let window = ReportFilter::default().resolve(now).unwrap().window;
        assert_eq!(window.start, at(2026, 3, 1, 0, 0, 0));
        assert_eq!(window.end, at(2026, 3, 31, 23, 59, 59));
    }

    #[test]
    fn custom_without_start_date_is_rejected() {
        let filter = ReportFilter {
            date_range: Some(DateRange::Custom),
            ..Default::default()
        };
        let err = filter.resolve(Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn inverted_custom_range_is_rejected() {
        let filter = ReportFilter {
            date_range: Some(DateRange::Custom),
            start_date: Some(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()),
            ..Default::default()
        };
        assert!(filter.resolve(Utc::now()).is_err());
    }

    #[test]
    fn all_category_means_no_restriction() {
        let filter = ReportFilter {
            category: Some("All".to_string()),
            ..Default::default()
        };
        assert!(filter.resolve(Utc::now()).unwrap().category.is_none());

        let filter = ReportFilter {
            category: Some("beverage".to_string()),
            ..Default::default()
        };
        assert_eq!(
            filter.resolve(Utc::now()).unwrap().category.as_deref(),
            Some("beverage")
        );
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let now = at(2026, 3, 15, 14, 30, 0);
        let window = ReportFilter {
            date_range: Some(DateRange::Today),
            ..Default::default()
        }
        .resolve(now)
        .unwrap()
        .window;

        assert!(window.contains(at(2026, 3, 15, 0, 0, 0)));
        assert!(window.contains(at(2026, 3, 15, 23, 59, 59)));
        assert!(!window.contains(at(2026, 3, 14, 23, 59, 59)));
        assert!(!window.contains(at(2026, 3, 16, 0, 0, 0)));
    }
}
