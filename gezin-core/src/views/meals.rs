use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::entity::{Meal, MealType};

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The seven days of the week containing `date`, Monday first.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..7).map(|offset| start + Days::new(offset)).collect()
}

/// Meals for one day, keyed by type.
pub type DayPlan<'a> = BTreeMap<MealType, Vec<&'a Meal>>;

/// Every day of the week containing `date`, each with a slot per meal type.
pub fn week_plan(meals: &[Meal], date: NaiveDate) -> Vec<(NaiveDate, DayPlan<'_>)> {
    week_days(date)
        .into_iter()
        .map(|day| {
            let plan = MealType::ALL
                .iter()
                .map(|&meal_type| {
                    let slot = meals
                        .iter()
                        .filter(|m| m.date == day && m.meal_type == meal_type)
                        .collect();
                    (meal_type, slot)
                })
                .collect();
            (day, plan)
        })
        .collect()
}

/// All meals, newest first.
pub fn sorted_meals(meals: &[Meal]) -> Vec<&Meal> {
    let mut sorted: Vec<_> = meals.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, NewMeal};
    use chrono::Utc;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn meal(id: &str, on: NaiveDate, meal_type: MealType) -> Meal {
        Meal::from_draft(id.into(), NewMeal::new(on, meal_type, "Stamppot"), Utc::now())
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2025-01-01 is a Wednesday.
        assert_eq!(week_start(date(1, 1)), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_eq!(week_start(date(1, 6)), date(1, 6));
        assert_eq!(week_days(date(1, 12)).last(), Some(&date(1, 12)));
    }

    #[test]
    fn plan_slots_meals_by_day_and_type() {
        let meals = [
            meal("1", date(1, 6), MealType::Dinner),
            meal("2", date(1, 6), MealType::Breakfast),
            meal("3", date(1, 13), MealType::Dinner),
        ];

        let plan = week_plan(&meals, date(1, 8));
        assert_eq!(plan.len(), 7);

        let (monday, slots) = &plan[0];
        assert_eq!(*monday, date(1, 6));
        assert_eq!(slots[&MealType::Dinner][0].id, "1");
        assert_eq!(slots[&MealType::Breakfast][0].id, "2");
        assert!(slots[&MealType::Lunch].is_empty());
        assert!(plan.iter().all(|(_, s)| s.values().flatten().all(|m| m.id != "3")));
    }

    #[test]
    fn list_is_newest_first() {
        let meals = [meal("old", date(1, 1), MealType::Lunch), meal("new", date(2, 1), MealType::Lunch)];
        assert_eq!(sorted_meals(&meals)[0].id, "new");
    }
}
