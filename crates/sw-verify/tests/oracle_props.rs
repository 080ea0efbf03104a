use proptest::prelude::*;
use sw_core::{natural_less, Evict, SortedWindow};
use sw_verify::{replay, Op};

fn evict_strategy() -> impl Strategy<Value = Evict> {
    prop_oneof![Just(Evict::Front), Just(Evict::Back)]
}

fn op_strategy<T, S>(value: S) -> impl Strategy<Value = Op<T>>
where
    T: Clone + std::fmt::Debug + 'static,
    S: Strategy<Value = T> + Clone + 'static,
{
    prop_oneof![
        5 => value.clone().prop_map(Op::PushBack),
        3 => value.prop_map(Op::PushFront),
        1 => Just(Op::PopFront),
        1 => Just(Op::PopBack),
        1 => (0usize..10, evict_strategy())
            .prop_map(|(capacity, evict)| Op::Resize { capacity, evict }),
    ]
}

proptest! {
    #[test]
    fn window_matches_oracle(
        capacity in 0usize..10,
        ops in prop::collection::vec(op_strategy(-50i32..50), 0..200),
    ) {
        if let Err(divergence) = replay(capacity, natural_less::<i32>, &ops) {
            prop_assert!(false, "{}", divergence);
        }
    }

    #[test]
    fn ties_resolve_like_a_stable_sort(
        capacity in 1usize..8,
        ops in prop::collection::vec(op_strategy((0i8..3, any::<u16>())), 0..150),
    ) {
        let by_key = |a: &(i8, u16), b: &(i8, u16)| a.0 < b.0;
        if let Err(divergence) = replay(capacity, by_key, &ops) {
            prop_assert!(false, "{}", divergence);
        }
    }

    #[test]
    fn size_never_exceeds_capacity(
        capacity in 0usize..16,
        values in prop::collection::vec(any::<i64>(), 0..100),
    ) {
        let mut window = SortedWindow::new(capacity);
        for (pushed, value) in values.into_iter().enumerate() {
            let evicted = window.push_back(value);
            prop_assert!(window.len() <= window.max_size());
            // one eviction per push once the window is full
            prop_assert_eq!(evicted.is_some(), pushed >= capacity);
        }
    }

    #[test]
    fn shrink_then_grow_keeps_recent(
        values in prop::collection::vec(-100i32..100, 1..40),
        keep in 0usize..10,
    ) {
        let capacity = values.len();
        let mut window = SortedWindow::new(capacity);
        window.extend(values.iter().copied());

        window.set_max_size(keep, Evict::Front);
        window.set_max_size(capacity, Evict::Front);

        let start = values.len().saturating_sub(keep);
        let mut expected = values[start..].to_vec();
        expected.sort();
        let actual: Vec<i32> = window.iter().copied().collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(window.check_invariants().is_ok());
    }
}
