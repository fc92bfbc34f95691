//! Property-based tests for the controller pipeline using proptest.

use proptest::prelude::*;
use viewdeck::viewdeck_seeker::{Dir, JsonRecord, SortKind};
use viewdeck::{recompute, ViewConfig, ViewState};

fn record_strategy() -> impl Strategy<Value = JsonRecord> {
    (
        0i64..20,
        prop::sample::select(vec!["Open", "Closed", "Pending"]),
        "[a-z]{0,6}",
    )
        .prop_map(|(points, status, title)| {
            JsonRecord::new()
                .with("points", points)
                .with("status", status)
                .with("title", title)
        })
}

fn config() -> ViewConfig {
    ViewConfig::new("title")
        .sort_key("points", SortKind::Numeric)
        .searchable(["title"])
        .filterable(["status"])
        .page_sizes([1, 3, 10], 3)
}

proptest! {
    /// The view always satisfies its window invariants.
    #[test]
    fn view_invariants_hold(
        records in prop::collection::vec(record_strategy(), 0..60),
        size in prop::sample::select(vec![1usize, 3, 10]),
        index in 0usize..30,
        status in prop::sample::select(vec!["All", "Open", "Closed"]),
    ) {
        let config = config();
        let mut state = ViewState::new(&config);
        state.set_field_filter("status", status);
        state.set_page_size(size).unwrap();
        state.set_page_index(index);

        let view = recompute(&records, &state, &config);
        prop_assert!(view.page_count >= 1);
        prop_assert!(view.current_page >= 1 && view.current_page <= view.page_count);
        prop_assert_eq!(view.window_end - view.window_start, view.items.len());
        prop_assert!(view.window_end <= view.total_count);
        prop_assert!(view.items.len() <= size);
        prop_assert!(view.total_count <= records.len());
    }

    /// Changing the sort never changes how many records match.
    #[test]
    fn sort_does_not_change_total(
        records in prop::collection::vec(record_strategy(), 0..60),
        query in "[a-z]{0,1}",
        desc in any::<bool>(),
    ) {
        let config = config();
        let mut state = ViewState::new(&config);
        state.set_query_text(query);
        let before = recompute(&records, &state, &config).total_count;

        state.set_sort_key("points");
        if desc {
            state.set_sort_direction(Dir::Desc);
        }
        prop_assert_eq!(recompute(&records, &state, &config).total_count, before);
    }

    /// Concatenating every page gives back the whole filtered sequence.
    #[test]
    fn pages_partition_the_result(
        records in prop::collection::vec(record_strategy(), 0..40),
        size in prop::sample::select(vec![1usize, 3, 10]),
    ) {
        let config = config();
        let mut state = ViewState::new(&config);
        state.set_page_size(size).unwrap();
        let pages = recompute(&records, &state, &config).page_count;

        let mut seen = 0;
        for index in 1..=pages {
            state.set_page_index(index);
            let view = recompute(&records, &state, &config);
            prop_assert_eq!(view.window_start, seen);
            seen += view.items.len();
        }
        prop_assert_eq!(seen, records.len());
    }
}
