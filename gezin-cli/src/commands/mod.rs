pub mod calendar;
pub mod family;
pub mod login;
pub mod logout;
pub mod meals;
pub mod shopping;
pub mod sleepovers;
pub mod status;
pub mod tasks;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Value for a clearable text field: an empty argument clears it.
pub fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let v = v.trim().to_string();
        (!v.is_empty()).then_some(v)
    })
}

/// Same as [`clearable`] for `YYYY-MM-DD` dates.
pub fn clearable_date(value: Option<String>) -> Result<Option<Option<NaiveDate>>> {
    clearable(value)
        .map(|date| {
            date.map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date '{d}', expected YYYY-MM-DD"))
            })
            .transpose()
        })
        .transpose()
}

/// Fail with a readable message when an id doesn't resolve.
pub fn not_found(kind: &str, id: &str) -> anyhow::Error {
    anyhow::anyhow!("No {kind} with id '{id}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argument_clears() {
        assert_eq!(clearable(None), None);
        assert_eq!(clearable(Some("  ".into())), Some(None));
        assert_eq!(clearable(Some("Gym".into())), Some(Some("Gym".into())));
    }

    #[test]
    fn clearable_dates_parse() {
        assert_eq!(clearable_date(Some(String::new())).unwrap(), Some(None));
        assert_eq!(
            clearable_date(Some("2025-03-14".into())).unwrap(),
            Some(NaiveDate::from_ymd_opt(2025, 3, 14))
        );
        assert!(clearable_date(Some("14-03-2025".into())).is_err());
    }
}
