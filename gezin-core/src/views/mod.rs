//! Read-only projections over loaded collections: filtering, sorting,
//! grouping and the summary counts each feature shows.
//!
//! Everything here is a pure function over slices. "Today" is always passed
//! in by the caller.

pub mod calendar;
pub mod family;
pub mod meals;
pub mod shopping;
pub mod sleepovers;
pub mod tasks;

/// Case-insensitive substring match against any of `fields`. An empty
/// query matches everything.
pub(crate) fn matches_search<'a>(query: &str, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ignores_case_and_missing_fields() {
        assert!(matches_search("MELK", [Some("Halfvolle melk"), None]));
        assert!(matches_search("", [None]));
        assert!(!matches_search("brood", [Some("Kaas"), None]));
    }
}
