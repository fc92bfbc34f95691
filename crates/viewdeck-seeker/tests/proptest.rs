//! Property-based tests for the seeker stages using proptest.

use proptest::prelude::*;
use viewdeck_seeker::{
    filter, page_count, paginate, sort_records, Dir, FilterSpec, FilterState, Number, PageNav,
    PageState, Record, SortKind, SortState, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
struct TestItem {
    value: i64,
    name: String,
    status: String,
}

impl Record for TestItem {
    fn field(&self, name: &str) -> Value<'_> {
        match name {
            "value" => Value::Number(Number::I64(self.value)),
            "name" => Value::String(&self.name),
            "status" => Value::String(&self.status),
            _ => Value::None,
        }
    }
}

fn test_item_strategy() -> impl Strategy<Value = TestItem> {
    (
        0i64..10,
        "[a-zA-Z]{1,8}",
        prop::sample::select(vec!["Open", "Closed", "open", "Pending"]),
    )
        .prop_map(|(value, name, status)| TestItem {
            value,
            name,
            status: status.to_string(),
        })
}

fn spec() -> FilterSpec {
    FilterSpec {
        searchable: vec!["name".into()],
        filterable: vec!["status".into()],
        date_field: None,
    }
}

fn filter_state_strategy() -> impl Strategy<Value = FilterState> {
    (
        "[a-z]{0,2}",
        prop::sample::select(vec!["", "All", "Open", "closed", "Pending"]),
    )
        .prop_map(|(query, status)| {
            let mut state = FilterState::new();
            state.query_text = query;
            state.set_field_filter("status", status);
            state
        })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Page count follows max(1, ceil(N / S)).
    #[test]
    fn page_count_formula(len in 0usize..10_000, size in 1usize..200) {
        let expected = std::cmp::max(1, (len + size - 1) / size);
        prop_assert_eq!(page_count(len, size), expected);
        prop_assert_eq!(paginate(len, &PageState { index: 1, size }).page_count, expected);
    }

    /// The current page is always clamped into [1, page_count].
    #[test]
    fn current_page_is_clamped(len in 0usize..500, size in 1usize..50, index in 0usize..1_000) {
        let window = paginate(len, &PageState { index, size });

        prop_assert!(window.current_page >= 1);
        prop_assert!(window.current_page <= window.page_count);
        if index > window.page_count {
            prop_assert_eq!(window.current_page, window.page_count);
        }
        if index < 1 {
            prop_assert_eq!(window.current_page, 1);
        }
    }

    /// The window is a valid half-open range no larger than a page.
    #[test]
    fn window_is_bounded(len in 0usize..500, size in 1usize..50, index in 0usize..100) {
        let window = paginate(len, &PageState { index, size });

        prop_assert!(window.start <= window.end);
        prop_assert!(window.end <= len);
        prop_assert!(window.len() <= size);
        prop_assert_eq!(window.start, (window.current_page - 1) * size);
    }

    /// Navigation never leaves [1, page_count].
    #[test]
    fn navigation_stays_in_range(current in 1usize..50, pages in 1usize..50) {
        for nav in [PageNav::First, PageNav::Prev, PageNav::Next, PageNav::Last] {
            let target = nav.resolve(current.min(pages), pages);
            prop_assert!(target >= 1 && target <= pages);
        }
    }

    /// Filtering never grows the collection.
    #[test]
    fn filter_never_grows_collection(
        items in prop::collection::vec(test_item_strategy(), 0..100),
        state in filter_state_strategy(),
    ) {
        let kept = filter(&items, &state, &spec());
        prop_assert!(kept.len() <= items.len());
    }

    /// Applying the same predicate twice is the same as applying it once.
    #[test]
    fn filter_is_idempotent(
        items in prop::collection::vec(test_item_strategy(), 0..100),
        state in filter_state_strategy(),
    ) {
        let once: Vec<TestItem> = filter(&items, &state, &spec()).into_iter().cloned().collect();
        let twice: Vec<TestItem> = filter(&once, &state, &spec()).into_iter().cloned().collect();

        prop_assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            prop_assert_eq!(a.value, b.value);
            prop_assert_eq!(&a.name, &b.name);
        }
    }

    /// Empty filter state keeps every record.
    #[test]
    fn empty_filter_keeps_all(items in prop::collection::vec(test_item_strategy(), 0..50)) {
        let kept = filter(&items, &FilterState::new(), &spec());
        prop_assert_eq!(kept.len(), items.len());
    }

    /// Records with equal sort keys keep their pre-sort order.
    #[test]
    fn ordering_is_stable(
        items in prop::collection::vec(test_item_strategy(), 0..40),
        desc in any::<bool>(),
    ) {
        let dir = if desc { Dir::Desc } else { Dir::Asc };
        let mut refs: Vec<&TestItem> = items.iter().collect();
        sort_records(&mut refs, &SortState::new("value", dir), SortKind::Numeric);

        for pair in refs.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            if prev.value == curr.value {
                let prev_pos = items.iter().position(|x| std::ptr::eq(x, prev));
                let curr_pos = items.iter().position(|x| std::ptr::eq(x, curr));
                prop_assert!(prev_pos < curr_pos, "Stable sort violated: equal items reordered");
            } else if desc {
                prop_assert!(prev.value > curr.value, "Sort order violated");
            } else {
                prop_assert!(prev.value < curr.value, "Sort order violated");
            }
        }
    }

    /// Text sort ignores case.
    #[test]
    fn text_sort_is_case_insensitive(items in prop::collection::vec(test_item_strategy(), 0..40)) {
        let mut refs: Vec<&TestItem> = items.iter().collect();
        sort_records(&mut refs, &SortState::asc("name"), SortKind::Text);

        for pair in refs.windows(2) {
            prop_assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
        }
    }
}

// ============================================================================
// Additional edge case tests
// ============================================================================

#[test]
fn empty_collection_yields_one_empty_page() {
    let items: Vec<TestItem> = vec![];
    let kept = filter(&items, &FilterState::new(), &spec());
    let window = paginate(kept.len(), &PageState::new(6));

    assert_eq!(window.page_count, 1);
    assert_eq!(window.current_page, 1);
    assert!(window.slice(&kept).is_empty());
}

#[test]
fn page_size_larger_than_collection() {
    let window = paginate(4, &PageState { index: 2, size: 50 });
    assert_eq!(window.page_count, 1);
    assert_eq!(window.current_page, 1);
    assert_eq!(window.len(), 4);
}
