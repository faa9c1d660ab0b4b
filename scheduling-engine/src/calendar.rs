//! CalendarModel (spec §4.2): derives the 26-of-month through
//! 25-of-next-month day sequence, Sundays, and fixed holidays.

use chrono::{Datelike, Duration, NaiveDate};
use shared::CalendarDay;

const FORBIDDEN_DAYS_OF_MONTH: [u32; 2] = [5, 20];

/// A resolved month: the full day sequence plus the derived Sunday index
/// list, built once per scheduling run.
#[derive(Debug, Clone)]
pub struct CalendarModel {
    days: Vec<CalendarDay>,
    sundays: Vec<usize>,
}

impl CalendarModel {
    /// Builds the calendar for `year`/`month`, starting on day 26 of that
    /// month and ending on day 25 of the next (wrapping December to
    /// January of `year + 1`). `holidays` is the externally-configured
    /// fixed dd/mm set (spec Open Question: no longer embedded in code).
    pub fn new(year: i32, month: u32, holidays: &std::collections::HashSet<(u32, u32)>) -> Self {
        let start = NaiveDate::from_ymd_opt(year, month, 26)
            .expect("26th of the scheduled month must exist");
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 25)
            .expect("25th of the following month must exist");

        let span = (end - start).num_days();
        let mut days = Vec::with_capacity(span as usize + 1);
        let mut sundays = Vec::new();

        for offset in 0..=span {
            let date = start + Duration::days(offset);
            let weekday = date.weekday().num_days_from_monday() as u8;
            let is_holiday = holidays.contains(&(date.day(), date.month()));
            let is_prd_forbidden = weekday == 5
                || weekday == 6
                || is_holiday
                || FORBIDDEN_DAYS_OF_MONTH.contains(&date.day());

            if weekday == 6 {
                sundays.push(days.len());
            }

            days.push(CalendarDay {
                date,
                weekday,
                is_holiday,
                is_prd_forbidden,
            });
        }

        Self { days, sundays }
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn sundays(&self) -> &[usize] {
        &self.sundays
    }

    pub fn sunday_count(&self) -> usize {
        self.sundays.len()
    }

    pub fn day(&self, index: usize) -> Option<&CalendarDay> {
        self.days.get(index)
    }

    /// Reconstructs the day-index for an absolute ISO date, used when
    /// rehydrating schedule rows keyed by date off the wire (spec §6).
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| d.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_26_to_25() {
        let model = CalendarModel::new(2025, 3, &Default::default());
        assert_eq!(model.day(0).unwrap().date, NaiveDate::from_ymd_opt(2025, 3, 26).unwrap());
        assert_eq!(
            model.day(model.day_count() - 1).unwrap().date,
            NaiveDate::from_ymd_opt(2025, 4, 25).unwrap()
        );
    }

    #[test]
    fn december_wraps_into_next_year() {
        let model = CalendarModel::new(2025, 12, &Default::default());
        assert_eq!(
            model.day(model.day_count() - 1).unwrap().date,
            NaiveDate::from_ymd_opt(2026, 1, 25).unwrap()
        );
    }

    #[test]
    fn forbidden_days_include_5th_20th_and_weekends() {
        let model = CalendarModel::new(2025, 3, &Default::default());
        for day in model.days() {
            let dom = day.date.day();
            if dom == 5 || dom == 20 {
                assert!(day.is_prd_forbidden);
            }
        }
    }

    #[test]
    fn holiday_marks_day_forbidden() {
        let mut holidays = std::collections::HashSet::new();
        holidays.insert((1, 5)); // 1 May
        let model = CalendarModel::new(2025, 4, &holidays);
        let idx = model
            .index_of(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
            .unwrap();
        assert!(model.day(idx).unwrap().is_holiday);
        assert!(model.day(idx).unwrap().is_prd_forbidden);
    }
}
