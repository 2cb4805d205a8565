use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity, de, patch, patch_opt, require};
use crate::error::GezinResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sleepover {
    pub id: String,
    /// Family member id of the child staying over.
    #[serde(alias = "childid")]
    pub child_id: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub location: Option<String>,
    #[serde(default, alias = "hostname", deserialize_with = "de::optional_text")]
    pub host_name: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub notes: Option<String>,
    #[serde(default, alias = "pickuptime", deserialize_with = "de::optional_text")]
    pub pickup_time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSleepover {
    pub child_id: String,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub host_name: Option<String>,
    pub notes: Option<String>,
    pub pickup_time: Option<String>,
}

impl NewSleepover {
    pub fn new(child_id: impl Into<String>, date: NaiveDate) -> Self {
        NewSleepover {
            child_id: child_id.into(),
            date,
            location: None,
            host_name: None,
            notes: None,
            pickup_time: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SleepoverPatch {
    pub child_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<Option<String>>,
    pub host_name: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub pickup_time: Option<Option<String>>,
}

impl Entity for Sleepover {
    const COLLECTION: Collection = Collection::Sleepovers;
    type Draft = NewSleepover;
    type Patch = SleepoverPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewSleepover, _now: DateTime<Utc>) -> Self {
        Sleepover {
            id,
            child_id: draft.child_id,
            date: draft.date,
            location: draft.location,
            host_name: draft.host_name,
            notes: draft.notes,
            pickup_time: draft.pickup_time,
        }
    }

    fn apply_patch(&mut self, p: SleepoverPatch, _now: DateTime<Utc>) {
        patch(&mut self.child_id, p.child_id);
        patch(&mut self.date, p.date);
        patch_opt(&mut self.location, p.location);
        patch_opt(&mut self.host_name, p.host_name);
        patch_opt(&mut self.notes, p.notes);
        patch_opt(&mut self.pickup_time, p.pickup_time);
    }

    fn validate(&self) -> GezinResult<()> {
        require("child", &self.child_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn decodes_lowercase_columns_and_blank_text() {
        let sleepover: Sleepover = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "childid": "m1",
            "date": "2025-06-14",
            "hostname": "Oma",
            "pickuptime": "10:00",
            "location": "",
            "notes": null
        }))
        .unwrap();

        assert_eq!(sleepover.child_id, "m1");
        assert_eq!(sleepover.date, date(6, 14));
        assert_eq!(sleepover.host_name.as_deref(), Some("Oma"));
        assert_eq!(sleepover.pickup_time.as_deref(), Some("10:00"));
        assert_eq!(sleepover.location, None);
        assert_eq!(sleepover.notes, None);
    }

    #[test]
    fn patch_sets_and_clears_optional_fields() {
        let mut draft = NewSleepover::new("m1", date(6, 14));
        draft.location = Some("Utrecht".into());
        draft.notes = Some("Bring pajamas".into());
        let mut sleepover = Sleepover::from_draft("s1".into(), draft, Utc::now());

        sleepover.apply_patch(
            SleepoverPatch {
                date: Some(date(6, 21)),
                location: Some(None),
                pickup_time: Some(Some("09:30".into())),
                ..Default::default()
            },
            Utc::now(),
        );

        assert_eq!(sleepover.child_id, "m1");
        assert_eq!(sleepover.date, date(6, 21));
        assert_eq!(sleepover.location, None);
        assert_eq!(sleepover.notes.as_deref(), Some("Bring pajamas"));
        assert_eq!(sleepover.pickup_time.as_deref(), Some("09:30"));
    }

    #[test]
    fn child_is_required() {
        let sleepover = Sleepover::from_draft("s1".into(), NewSleepover::new(" ", date(6, 14)), Utc::now());
        assert!(sleepover.validate().is_err());
    }
}
