use chrono::{Datelike, NaiveDate};

use crate::entity::Sleepover;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    All,
    /// Today and later.
    Upcoming,
    /// Before today.
    Past,
}

impl TimeFilter {
    fn accepts(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            TimeFilter::All => true,
            TimeFilter::Upcoming => date >= today,
            TimeFilter::Past => date < today,
        }
    }
}

/// Sleepovers for `child` (or every child) within `time`, newest first.
pub fn filtered_sleepovers<'a>(
    sleepovers: &'a [Sleepover],
    child: Option<&str>,
    time: TimeFilter,
    today: NaiveDate,
) -> Vec<&'a Sleepover> {
    let mut shown: Vec<_> = sleepovers
        .iter()
        .filter(|s| child.is_none_or(|id| s.child_id == id))
        .filter(|s| time.accepts(s.date, today))
        .collect();
    shown.sort_by(|a, b| b.date.cmp(&a.date));
    shown
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepoverStats {
    pub total: usize,
    pub upcoming: usize,
    pub this_month: usize,
}

pub fn stats(sleepovers: &[Sleepover], today: NaiveDate) -> SleepoverStats {
    SleepoverStats {
        total: sleepovers.len(),
        upcoming: sleepovers.iter().filter(|s| s.date >= today).count(),
        this_month: sleepovers
            .iter()
            .filter(|s| s.date.year() == today.year() && s.date.month() == today.month())
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, NewSleepover};
    use chrono::Utc;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn sleepover(id: &str, child: &str, on: NaiveDate) -> Sleepover {
        Sleepover::from_draft(id.into(), NewSleepover::new(child, on), Utc::now())
    }

    fn sample() -> Vec<Sleepover> {
        vec![
            sleepover("a", "anna", date(3, 1)),
            sleepover("b", "tim", date(3, 20)),
            sleepover("c", "anna", date(3, 15)),
            sleepover("d", "anna", date(4, 2)),
        ]
    }

    #[test]
    fn filters_by_child_and_time() {
        let all = sample();
        let today = date(3, 15);

        let ids = |shown: Vec<&Sleepover>| shown.iter().map(|s| s.id.clone()).collect::<Vec<_>>();
        assert_eq!(
            ids(filtered_sleepovers(&all, Some("anna"), TimeFilter::All, today)),
            ["d", "c", "a"]
        );
        assert_eq!(
            ids(filtered_sleepovers(&all, Some("anna"), TimeFilter::Upcoming, today)),
            ["d", "c"]
        );
        assert_eq!(
            ids(filtered_sleepovers(&all, None, TimeFilter::Past, today)),
            ["a"]
        );
    }

    #[test]
    fn counts_upcoming_and_this_month() {
        assert_eq!(
            stats(&sample(), date(3, 15)),
            SleepoverStats {
                total: 4,
                upcoming: 3,
                this_month: 3
            }
        );
    }
}
