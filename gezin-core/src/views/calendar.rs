use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::entity::CalendarEvent;

/// Events involving any of `selected`. An empty selection means everyone.
pub fn filter_by_participants<'a>(
    events: &'a [CalendarEvent],
    selected: &[String],
) -> Vec<&'a CalendarEvent> {
    if selected.is_empty() {
        return events.iter().collect();
    }
    events
        .iter()
        .filter(|e| e.participants.iter().any(|p| selected.contains(p)))
        .collect()
}

/// Events on `date`, by time of day with untimed events last.
pub fn events_on<'a>(events: &[&'a CalendarEvent], date: NaiveDate) -> Vec<&'a CalendarEvent> {
    let mut day: Vec<_> = events.iter().copied().filter(|e| e.date == date).collect();
    day.sort_by(|a, b| by_time(a, b));
    day
}

fn by_time(a: &CalendarEvent, b: &CalendarEvent) -> Ordering {
    match (&a.time, &b.time) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Dates that carry at least one event.
pub fn event_dates(events: &[&CalendarEvent]) -> BTreeSet<NaiveDate> {
    events.iter().map(|e| e.date).collect()
}

/// Events in the given month, by date then time.
pub fn events_in_month<'a>(
    events: &[&'a CalendarEvent],
    year: i32,
    month: u32,
) -> Vec<&'a CalendarEvent> {
    let mut in_month: Vec<_> = events
        .iter()
        .copied()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .collect();
    in_month.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| by_time(a, b)));
    in_month
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EventType, NewCalendarEvent};
    use chrono::Utc;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn event(id: &str, on: NaiveDate, time: Option<&str>, participants: &[&str]) -> CalendarEvent {
        let mut draft = NewCalendarEvent::new(id, on, EventType::Activity);
        draft.time = time.map(str::to_string);
        draft.participants = participants.iter().map(|p| p.to_string()).collect();
        CalendarEvent::from_draft(id.into(), draft, Utc::now())
    }

    #[test]
    fn empty_selection_keeps_everything() {
        let events = [event("a", date(1, 1), None, &[]), event("b", date(1, 1), None, &["m1"])];
        assert_eq!(filter_by_participants(&events, &[]).len(), 2);

        let only_m1 = filter_by_participants(&events, &["m1".to_string()]);
        assert_eq!(only_m1.len(), 1);
        assert_eq!(only_m1[0].id, "b");
    }

    #[test]
    fn untimed_events_sort_last() {
        let events = [
            event("allday", date(3, 2), None, &[]),
            event("late", date(3, 2), Some("19:30"), &[]),
            event("early", date(3, 2), Some("08:15"), &[]),
            event("other", date(3, 3), Some("07:00"), &[]),
        ];
        let all: Vec<_> = events.iter().collect();

        let ids: Vec<_> = events_on(&all, date(3, 2)).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["early", "late", "allday"]);
        assert_eq!(event_dates(&all).len(), 2);
    }

    #[test]
    fn month_view_orders_by_date_then_time() {
        let events = [
            event("b", date(3, 9), Some("10:00"), &[]),
            event("a", date(3, 2), None, &[]),
            event("x", date(4, 1), None, &[]),
        ];
        let all: Vec<_> = events.iter().collect();
        let ids: Vec<_> = events_in_month(&all, 2025, 3).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
