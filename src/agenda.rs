//! Agenda projection
//!
//! Derives a month calendar from a flat list of reports. Nothing here is
//! persisted; every function is a pure computation over its inputs and can
//! be re-run on each render.
//!
//! Day membership is decided in an explicit time zone (`Local` for the CLI).
//! Schedules carrying an offset are converted into it, so a report scheduled
//! late in the evening UTC may land on the next calendar day elsewhere.
//! Offset-less schedules are wall-clock values and keep their own date.

use crate::report::Report;
use crate::types::Schedule;
use chrono::{Datelike, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Number of days in `month` (1-12) of `year`, proleptic Gregorian.
///
/// Out-of-range months have zero days.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Weekday of the first of the month, 0 = Sunday .. 6 = Saturday
pub fn first_weekday_of_month(month: u32, year: i32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.weekday().num_days_from_sunday())
}

/// Inclusive calendar-day window; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn from(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn until(end: NaiveDate) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Day-level inclusion: start counts from 00:00:00.000 and end runs to
    /// 23:59:59.999 of the local day
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start.map_or(true, |start| day >= start) && self.end.map_or(true, |end| day <= end)
    }
}

/// Reports scheduled on one day of the month
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket<'a> {
    pub day: u32,
    pub reports: Vec<&'a Report>,
}

/// Calendar grid for one month
#[derive(Debug, Clone, Serialize)]
pub struct MonthAgenda<'a> {
    pub month: u32,
    pub year: i32,
    /// Blank cells before day 1 in a Sunday-first grid
    pub first_weekday: u32,
    /// One bucket per day, 1..=N, empty days included
    pub days: Vec<DayBucket<'a>>,
}

impl<'a> MonthAgenda<'a> {
    pub fn day(&self, day: u32) -> Option<&DayBucket<'a>> {
        day.checked_sub(1).and_then(|i| self.days.get(i as usize))
    }

    pub fn scheduled_count(&self) -> usize {
        self.days.iter().map(|d| d.reports.len()).sum()
    }

    /// Days with at least one report
    pub fn busy_days(&self) -> impl Iterator<Item = &DayBucket<'a>> {
        self.days.iter().filter(|d| !d.reports.is_empty())
    }
}

/// Buckets reports into calendar days of a time zone
#[derive(Debug, Clone)]
pub struct AgendaProjector<Tz: TimeZone> {
    tz: Tz,
}

impl AgendaProjector<Local> {
    pub fn local() -> Self {
        Self { tz: Local }
    }
}

impl AgendaProjector<Utc> {
    pub fn utc() -> Self {
        Self { tz: Utc }
    }
}

impl<Tz: TimeZone> AgendaProjector<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Local calendar date of a schedule
    pub fn local_date(&self, schedule: &Schedule) -> NaiveDate {
        schedule.date_in(&self.tz)
    }

    fn scheduled_date(&self, report: &Report, filter: Option<&DateRange>) -> Option<NaiveDate> {
        let date = self.local_date(report.scheduled_at.as_ref()?);
        match filter {
            Some(range) if !range.contains_day(date) => None,
            _ => Some(date),
        }
    }

    /// Reports scheduled on `day` of `month`/`year`, in input order.
    ///
    /// Unscheduled reports and reports outside `filter` never match.
    pub fn reports_for_day<'a>(
        &self,
        day: u32,
        month: u32,
        year: i32,
        reports: &'a [Report],
        filter: Option<&DateRange>,
    ) -> Vec<&'a Report> {
        reports
            .iter()
            .filter(|report| {
                self.scheduled_date(report, filter).is_some_and(|date| {
                    date.day() == day && date.month() == month && date.year() == year
                })
            })
            .collect()
    }

    /// Full month grid in a single pass over `reports`
    pub fn month_agenda<'a>(
        &self,
        month: u32,
        year: i32,
        reports: &'a [Report],
        filter: Option<&DateRange>,
    ) -> MonthAgenda<'a> {
        let mut days: Vec<DayBucket<'a>> = (1..=days_in_month(month, year))
            .map(|day| DayBucket {
                day,
                reports: Vec::new(),
            })
            .collect();

        for report in reports {
            let Some(date) = self.scheduled_date(report, filter) else {
                continue;
            };
            if date.month() != month || date.year() != year {
                continue;
            }
            if let Some(bucket) = days.get_mut(date.day() as usize - 1) {
                bucket.reports.push(report);
            }
        }

        MonthAgenda {
            month,
            year,
            first_weekday: first_weekday_of_month(month, year).unwrap_or(0),
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    fn report(id: i64, scheduled: Option<&str>) -> Report {
        serde_json::from_value(json!({
            "id": id, "descricao": format!("report {id}"), "cliente_id": 1,
            "status": "em_andamento", "criado_em": "2025-01-01T00:00:00Z",
            "data_agendada": scheduled
        }))
        .unwrap()
    }

    fn ids(reports: &[&Report]) -> Vec<i64> {
        reports.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2023), 28);
        assert_eq!(days_in_month(4, 2024), 30);
        assert_eq!(days_in_month(12, 2024), 31);
        assert_eq!(days_in_month(2, 1900), 28);
        assert_eq!(days_in_month(2, 2000), 29);
        assert_eq!(days_in_month(13, 2024), 0);
        assert_eq!(days_in_month(0, 2024), 0);
    }

    #[test]
    fn test_first_weekday() {
        // 1 March 2025 was a Saturday, 1 September 2024 a Sunday
        assert_eq!(first_weekday_of_month(3, 2025), Some(6));
        assert_eq!(first_weekday_of_month(9, 2024), Some(0));
        assert_eq!(first_weekday_of_month(2, 2024), Some(4));
        assert_eq!(first_weekday_of_month(13, 2024), None);
    }

    #[test]
    fn test_reports_for_day_matches_exact_day() {
        let reports = vec![report(1, Some("2025-03-15T10:00:00Z"))];
        let projector = AgendaProjector::utc();
        assert_eq!(ids(&projector.reports_for_day(15, 3, 2025, &reports, None)), [1]);
        assert!(projector.reports_for_day(16, 3, 2025, &reports, None).is_empty());
        assert!(projector.reports_for_day(15, 4, 2025, &reports, None).is_empty());
        assert!(projector.reports_for_day(15, 3, 2024, &reports, None).is_empty());
    }

    #[test]
    fn test_unscheduled_reports_never_match() {
        let reports = vec![report(1, None), report(2, Some("garbage"))];
        let projector = AgendaProjector::utc();
        for day in 1..=31 {
            assert!(projector.reports_for_day(day, 3, 2025, &reports, None).is_empty());
        }
        assert_eq!(projector.month_agenda(3, 2025, &reports, None).scheduled_count(), 0);
    }

    #[test]
    fn test_filter_excludes_report() {
        let reports = vec![report(1, Some("2025-03-15T10:00:00Z"))];
        let projector = AgendaProjector::utc();
        let before = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        );
        assert!(projector.reports_for_day(15, 3, 2025, &reports, Some(&before)).is_empty());
    }

    #[test]
    fn test_filter_bounds_are_whole_days() {
        let reports = vec![
            report(1, Some("2025-03-10T00:00:00Z")),
            report(2, Some("2025-03-20T23:59:59.999Z")),
        ];
        let projector = AgendaProjector::utc();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        );
        assert_eq!(ids(&projector.reports_for_day(10, 3, 2025, &reports, Some(&range))), [1]);
        assert_eq!(ids(&projector.reports_for_day(20, 3, 2025, &reports, Some(&range))), [2]);

        let open_end = DateRange::from(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
        assert!(projector.reports_for_day(10, 3, 2025, &reports, Some(&open_end)).is_empty());
        assert_eq!(ids(&projector.reports_for_day(20, 3, 2025, &reports, Some(&open_end))), [2]);

        let open_start = DateRange::until(NaiveDate::from_ymd_opt(2025, 3, 19).unwrap());
        assert!(projector.reports_for_day(20, 3, 2025, &reports, Some(&open_start)).is_empty());
    }

    #[test]
    fn test_bucket_uses_local_calendar_day() {
        let reports = vec![report(1, Some("2025-03-15T01:30:00Z"))];
        let sao_paulo = AgendaProjector::new(FixedOffset::west_opt(3 * 3600).unwrap());
        assert_eq!(ids(&sao_paulo.reports_for_day(14, 3, 2025, &reports, None)), [1]);
        assert!(sao_paulo.reports_for_day(15, 3, 2025, &reports, None).is_empty());
    }

    #[test]
    fn test_wall_clock_schedule_keeps_its_day() {
        let reports = vec![report(1, Some("2025-03-15T01:00:00"))];
        let sao_paulo = AgendaProjector::new(FixedOffset::west_opt(3 * 3600).unwrap());
        assert_eq!(ids(&sao_paulo.reports_for_day(15, 3, 2025, &reports, None)), [1]);
        assert!(sao_paulo.reports_for_day(14, 3, 2025, &reports, None).is_empty());

        let range = DateRange::until(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert!(sao_paulo.reports_for_day(15, 3, 2025, &reports, Some(&range)).is_empty());
    }

    #[test]
    fn test_month_agenda_keeps_input_order() {
        let reports = vec![
            report(3, Some("2025-03-15T16:00:00Z")),
            report(1, Some("2025-03-02T09:00:00Z")),
            report(2, Some("2025-03-15T08:00:00Z")),
            report(4, None),
            report(5, Some("2025-04-15T08:00:00Z")),
        ];
        let agenda = AgendaProjector::utc().month_agenda(3, 2025, &reports, None);
        assert_eq!(agenda.days.len(), 31);
        assert_eq!(agenda.first_weekday, 6);
        assert_eq!(ids(&agenda.day(15).unwrap().reports), [3, 2]);
        assert_eq!(ids(&agenda.day(2).unwrap().reports), [1]);
        assert!(agenda.day(16).unwrap().reports.is_empty());
        assert!(agenda.day(0).is_none());
        assert_eq!(agenda.scheduled_count(), 3);
        assert_eq!(agenda.busy_days().map(|d| d.day).collect::<Vec<_>>(), [2, 15]);
    }

    #[test]
    fn test_month_agenda_invalid_month() {
        let reports = vec![report(1, Some("2025-03-15T10:00:00Z"))];
        let agenda = AgendaProjector::utc().month_agenda(13, 2025, &reports, None);
        assert!(agenda.days.is_empty());
        assert_eq!(agenda.scheduled_count(), 0);
    }
}
