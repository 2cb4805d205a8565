use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity, de, patch, patch_opt, require};
use crate::error::{GezinError, GezinResult};

wire_enum! {
    MealType {
        Breakfast => "breakfast",
        Lunch => "lunch",
        Dinner => "dinner",
        Snack => "snack",
    }
}

wire_enum! {
    MealLocation {
        Home => "home",
        Restaurant => "restaurant",
        School => "school",
        Work => "work",
        Other => "other",
    }
}

wire_enum! {
    Frequency {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
}

impl Frequency {
    /// Days between two occurrences. Monthly repeats every 30 days.
    pub fn step(self) -> Days {
        match self {
            Frequency::Daily => Days::new(1),
            Frequency::Weekly => Days::new(7),
            Frequency::Monthly => Days::new(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecurrence {
    pub frequency: Frequency,
    #[serde(default, alias = "enddate", deserialize_with = "de::optional_date")]
    pub end_date: Option<NaiveDate>,
}

impl MealRecurrence {
    /// All dates from `start` through the end date (inclusive), stepping by
    /// the frequency. Without an end date only `start` is produced.
    pub fn dates_from(&self, start: NaiveDate) -> GezinResult<Vec<NaiveDate>> {
        let Some(end) = self.end_date else {
            return Ok(vec![start]);
        };

        if end < start {
            return Err(GezinError::Validation(format!(
                "recurrence end date {end} is before start date {start}"
            )));
        }

        let mut dates = Vec::new();
        let mut current = start;
        while current <= end {
            dates.push(current);
            current = match current.checked_add_days(self.frequency.step()) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(dates)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub date: NaiveDate,
    #[serde(alias = "mealtype")]
    pub meal_type: MealType,
    pub dish: String,
    pub location: MealLocation,
    #[serde(default, alias = "locationdetails", deserialize_with = "de::optional_text")]
    pub location_details: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub participants: Vec<String>,
    #[serde(default, deserialize_with = "de::object_or_json_string")]
    pub recurring: Option<MealRecurrence>,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub dish: String,
    pub location: MealLocation,
    pub location_details: Option<String>,
    pub participants: Vec<String>,
    pub recurring: Option<MealRecurrence>,
}

impl NewMeal {
    pub fn new(date: NaiveDate, meal_type: MealType, dish: impl Into<String>) -> Self {
        NewMeal {
            date,
            meal_type,
            dish: dish.into(),
            location: MealLocation::Home,
            location_details: None,
            participants: Vec::new(),
            recurring: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MealPatch {
    pub date: Option<NaiveDate>,
    pub meal_type: Option<MealType>,
    pub dish: Option<String>,
    pub location: Option<MealLocation>,
    pub location_details: Option<Option<String>>,
    pub participants: Option<Vec<String>>,
    pub recurring: Option<Option<MealRecurrence>>,
}

impl Entity for Meal {
    const COLLECTION: Collection = Collection::Meals;
    type Draft = NewMeal;
    type Patch = MealPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewMeal, _now: DateTime<Utc>) -> Self {
        Meal {
            id,
            date: draft.date,
            meal_type: draft.meal_type,
            dish: draft.dish.trim().to_string(),
            location: draft.location,
            location_details: draft.location_details,
            participants: draft.participants,
            recurring: draft.recurring,
        }
    }

    fn apply_patch(&mut self, p: MealPatch, _now: DateTime<Utc>) {
        patch(&mut self.date, p.date);
        patch(&mut self.meal_type, p.meal_type);
        patch(&mut self.dish, p.dish);
        patch(&mut self.location, p.location);
        patch_opt(&mut self.location_details, p.location_details);
        patch(&mut self.participants, p.participants);
        patch_opt(&mut self.recurring, p.recurring);
    }

    fn validate(&self) -> GezinResult<()> {
        require("dish", &self.dish)
    }
}
