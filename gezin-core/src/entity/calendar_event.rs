use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity, de, patch, patch_opt, require};
use crate::error::GezinResult;

wire_enum! {
    EventType {
        Appointment => "appointment",
        Activity => "activity",
        Meal => "meal",
        Sleepover => "sleepover",
        Task => "task",
    }
}

impl EventType {
    /// Display color used by the calendar views.
    pub fn color(self) -> &'static str {
        match self {
            EventType::Appointment => "#3182ce",
            EventType::Activity => "#38a169",
            EventType::Meal => "#d69e2e",
            EventType::Sleepover => "#805ad5",
            EventType::Task => "#e53e3e",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    /// `HH:MM`, compared lexically.
    #[serde(default, deserialize_with = "de::optional_text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub participants: Vec<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub description: Option<String>,
    pub event_type: EventType,
    pub participants: Vec<String>,
    pub location: Option<String>,
}

impl NewCalendarEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate, event_type: EventType) -> Self {
        NewCalendarEvent {
            title: title.into(),
            date,
            time: None,
            description: None,
            event_type,
            participants: Vec::new(),
            location: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CalendarEventPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub event_type: Option<EventType>,
    pub participants: Option<Vec<String>>,
    pub location: Option<Option<String>>,
}

impl Entity for CalendarEvent {
    const COLLECTION: Collection = Collection::CalendarEvents;
    type Draft = NewCalendarEvent;
    type Patch = CalendarEventPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewCalendarEvent, _now: DateTime<Utc>) -> Self {
        CalendarEvent {
            id,
            title: draft.title.trim().to_string(),
            date: draft.date,
            time: draft.time,
            description: draft.description,
            event_type: draft.event_type,
            participants: draft.participants,
            location: draft.location,
        }
    }

    fn apply_patch(&mut self, p: CalendarEventPatch, _now: DateTime<Utc>) {
        patch(&mut self.title, p.title);
        patch(&mut self.date, p.date);
        patch_opt(&mut self.time, p.time);
        patch_opt(&mut self.description, p.description);
        patch(&mut self.event_type, p.event_type);
        patch(&mut self.participants, p.participants);
        patch_opt(&mut self.location, p.location);
    }

    fn validate(&self) -> GezinResult<()> {
        require("title", &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_participants_decode_as_empty() {
        let event: CalendarEvent = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "title": "Dentist",
            "date": "2025-03-20",
            "time": "",
            "type": "appointment",
            "participants": null
        }))
        .unwrap();

        assert!(event.participants.is_empty());
        assert_eq!(event.time, None);
        assert_eq!(event.location, None);
    }

    #[test]
    fn serializes_type_field() {
        let event = CalendarEvent::from_draft(
            "e1".into(),
            NewCalendarEvent::new(
                "Swimming",
                NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
                EventType::Activity,
            ),
            Utc::now(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "activity");
        assert_eq!(json["date"], "2025-03-20");
    }
}
