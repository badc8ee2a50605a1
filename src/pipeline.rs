//! Filter and sort of the note list for display.
//!
//! Pure and deterministic: the list view re-runs it on every frame.

use feruca::Collator;
use std::cmp::Ordering;

use crate::models::{MenuState, Note, SortKey};

/// Notes that pass the menu filters, in display order
pub fn filter_and_sort<'a>(notes: &'a [Note], menu: &MenuState) -> Vec<&'a Note> {
    let query = menu.search.to_lowercase();

    let mut visible: Vec<&Note> = notes
        .iter()
        .filter(|note| !menu.show_favorites_only || note.favorite)
        .filter(|note| query.is_empty() || note.matches_search(&query))
        .collect();

    // sort_by is stable, so list order breaks ties
    let mut collator = Collator::default();
    visible.sort_by(|a, b| compare(a, b, menu.sort_by, &mut collator));
    visible
}

/// Ids of the display sequence, for callers that must not hold borrows
pub fn display_ids(notes: &[Note], menu: &MenuState) -> Vec<String> {
    filter_and_sort(notes, menu)
        .into_iter()
        .map(|note| note.id.clone())
        .collect()
}

fn compare(a: &Note, b: &Note, key: SortKey, collator: &mut Collator) -> Ordering {
    match key {
        // Unparsable timestamps order as the oldest instant
        SortKey::Updated => b.updated().cmp(&a.updated()),
        SortKey::Created => b.created().cmp(&a.created()),
        SortKey::Title => collator.collate(a.title.as_str(), b.title.as_str()),
        SortKey::Favorite => b.favorite.cmp(&a.favorite),
    }
}

/// Unicode collation (CLDR root): accents and case are secondary to the
/// base letters, and lowercase sorts before uppercase on a tie.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    Collator::default().collate(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
            ..Note::default()
        }
    }

    fn titles(notes: &[&Note]) -> Vec<String> {
        notes.iter().map(|n| n.title.clone()).collect()
    }

    #[test]
    fn search_matches_title_content_or_tag_case_insensitively() {
        let mut shopping = note("1", "Shopping");
        shopping.tags = vec!["home".to_string()];
        let mut work = note("2", "Work");
        work.content = "buy milk".to_string();
        let notes = vec![shopping, work];

        let menu = MenuState {
            search: "milk".to_string(),
            ..MenuState::default()
        };
        assert_eq!(titles(&filter_and_sort(&notes, &menu)), vec!["Work"]);

        let menu = MenuState {
            search: "HOME".to_string(),
            ..MenuState::default()
        };
        assert_eq!(titles(&filter_and_sort(&notes, &menu)), vec!["Shopping"]);
    }

    #[test]
    fn favorites_only_composes_with_search() {
        let mut a = note("1", "alpha plan");
        a.favorite = true;
        let b = note("2", "beta plan");
        let mut c = note("3", "gamma");
        c.favorite = true;
        let notes = vec![a, b, c];

        let menu = MenuState {
            search: "plan".to_string(),
            show_favorites_only: true,
            ..MenuState::default()
        };
        assert_eq!(titles(&filter_and_sort(&notes, &menu)), vec!["alpha plan"]);
    }

    #[test]
    fn title_sort_is_locale_style_ascending() {
        let notes = vec![note("1", "banana"), note("2", "Apple"), note("3", "cherry")];
        let menu = MenuState {
            sort_by: SortKey::Title,
            ..MenuState::default()
        };
        assert_eq!(titles(&filter_and_sort(&notes, &menu)), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn title_sort_collates_accented_letters() {
        let notes = vec![note("1", "Zebra"), note("2", "éclair"), note("3", "apple"), note("4", "Eclair")];
        let menu = MenuState {
            sort_by: SortKey::Title,
            ..MenuState::default()
        };
        assert_eq!(
            titles(&filter_and_sort(&notes, &menu)),
            vec!["apple", "Eclair", "éclair", "Zebra"]
        );
    }

    #[test]
    fn title_tie_puts_lowercase_first() {
        assert_eq!(compare_titles("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_titles("Apple", "apple"), Ordering::Greater);
        assert_eq!(compare_titles("", "a"), Ordering::Less);
    }

    #[test]
    fn updated_sort_is_descending() {
        let mut old = note("1", "old");
        old.updated_at = "2024-01-01T00:00:00.000Z".to_string();
        let mut new = note("2", "new");
        new.updated_at = "2024-03-01T00:00:00.000Z".to_string();
        let mut broken = note("3", "broken");
        broken.updated_at = "...".to_string();
        let notes = vec![old, broken, new];

        let menu = MenuState::default();
        assert_eq!(titles(&filter_and_sort(&notes, &menu)), vec!["new", "old", "broken"]);
    }

    #[test]
    fn created_sort_is_descending() {
        let mut first = note("1", "first");
        first.created_at = "2023-06-01T00:00:00.000Z".to_string();
        let mut second = note("2", "second");
        second.created_at = "2024-06-01T00:00:00.000Z".to_string();
        let notes = vec![first, second];

        let menu = MenuState {
            sort_by: SortKey::Created,
            ..MenuState::default()
        };
        assert_eq!(titles(&filter_and_sort(&notes, &menu)), vec!["second", "first"]);
    }

    #[test]
    fn favorite_sort_is_stable() {
        let a = note("1", "a");
        let mut b = note("2", "b");
        b.favorite = true;
        let c = note("3", "c");
        let mut d = note("4", "d");
        d.favorite = true;
        let notes = vec![a, b, c, d];

        let menu = MenuState {
            sort_by: SortKey::Favorite,
            ..MenuState::default()
        };
        assert_eq!(titles(&filter_and_sort(&notes, &menu)), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let mut notes = vec![note("1", "pear"), note("2", "Fig"), note("3", "apple")];
        notes[1].favorite = true;
        notes[2].updated_at = "2025-01-01T00:00:00.000Z".to_string();

        for sort_by in SortKey::ALL {
            let menu = MenuState {
                sort_by,
                search: "e".to_string(),
                ..MenuState::default()
            };
            let once: Vec<Note> = filter_and_sort(&notes, &menu).into_iter().cloned().collect();
            let twice: Vec<Note> = filter_and_sort(&once, &menu).into_iter().cloned().collect();
            assert_eq!(once, twice, "not idempotent for {sort_by:?}");
        }
    }

    #[test]
    fn empty_search_keeps_everything() {
        let notes = vec![note("1", ""), note("2", "x")];
        assert_eq!(filter_and_sort(&notes, &MenuState::default()).len(), 2);
        assert_eq!(display_ids(&notes, &MenuState::default()), vec!["1", "2"]);
    }
}
