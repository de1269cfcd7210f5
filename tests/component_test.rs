//! Integration tests for composite trees: queries, removal, mapping.

use comptree::domain::{Component, CountPolicy, Cursor, DomainError, OptionalBox, Removal};
use rstest::{fixture, rstest};

/// C2 { C1 { 100, 200 }, 300 }
#[fixture]
fn pricing_tree() -> Component<i64> {
    let c1 = Component::composite()
        .with_child(Component::leaf(100))
        .unwrap()
        .with_child(Component::leaf(200))
        .unwrap();
    Component::composite()
        .with_child(c1)
        .unwrap()
        .with_child(Component::leaf(300))
        .unwrap()
}

/// Root { 1, Empty(5) {}, Empty {}, Inner(8) { 2 } }
#[fixture]
fn tree_with_empty_composites() -> Component<i64> {
    Component::composite()
        .with_child(Component::leaf(1))
        .unwrap()
        .with_child(Component::composite_with(5))
        .unwrap()
        .with_child(Component::composite())
        .unwrap()
        .with_child(Component::composite_with(8).with_child(Component::leaf(2)).unwrap())
        .unwrap()
}

#[rstest]
fn given_pricing_tree_when_summing_leaves_then_600(pricing_tree: Component<i64>) {
    comptree::util::testing::init_test_setup();
    assert_eq!(pricing_tree.sum::<i64>(), 600);
}

#[rstest]
fn given_pricing_tree_when_tripling_then_values_in_insertion_order(
    pricing_tree: Component<i64>,
) {
    let tripled = pricing_tree.map(|v| v * 3);
    let values: Vec<i64> = tripled.leaf_cursor().copied().collect();
    assert_eq!(values, vec![300, 600, 900]);
    assert_eq!(tripled.depth(), pricing_tree.depth());
}

#[rstest]
fn given_always_true_when_counting_leaf_only_then_number_of_leaves(
    tree_with_empty_composites: Component<i64>,
) {
    assert_eq!(tree_with_empty_composites.count(CountPolicy::LeafOnly, |_| true), 2);
}

#[rstest]
fn given_always_true_when_counting_self_counts_then_valued_empty_composites_added(
    tree_with_empty_composites: Component<i64>,
) {
    // Empty(5) counts, the valueless empty composite and Inner(8) with a child do not
    assert_eq!(
        tree_with_empty_composites.count(CountPolicy::SelfCountsIfChildless, |_| true),
        3
    );
}

#[rstest]
#[case(CountPolicy::LeafOnly, OptionalBox::of(2))]
#[case(CountPolicy::SelfCountsIfChildless, OptionalBox::of(5))]
fn given_policy_when_searching_first_above_one_then_policy_decides(
    tree_with_empty_composites: Component<i64>,
    #[case] policy: CountPolicy,
    #[case] expected: OptionalBox<i64>,
) {
    let found = tree_with_empty_composites.first(policy, |v| *v > 1).cloned();
    assert_eq!(found, expected);
}

#[rstest]
fn given_no_match_when_searching_first_then_empty(pricing_tree: Component<i64>) {
    assert!(!pricing_tree.first(CountPolicy::LeafOnly, |v| *v > 1000).has_value());
}

#[rstest]
fn given_missing_child_when_removing_then_nothing_to_remove_and_count_unchanged(
    mut pricing_tree: Component<i64>,
) {
    let before = pricing_tree.child_count();
    let result = pricing_tree.remove_child(&Component::leaf(999));
    assert_eq!(result, Removal::NothingToRemove);
    assert_eq!(pricing_tree.child_count(), before);
}

#[rstest]
fn given_existing_child_when_removing_then_removed_and_sum_drops(
    mut pricing_tree: Component<i64>,
) {
    let result = pricing_tree.remove_child(&Component::leaf(300));
    assert!(result.is_removed());
    assert_eq!(pricing_tree.child_count(), 1);
    assert_eq!(pricing_tree.sum::<i64>(), 300);
}

#[test]
fn given_leaf_when_adding_child_then_structural_violation() {
    let result = Component::leaf(1).with_child(Component::leaf(2));
    assert!(matches!(result, Err(DomainError::StructuralViolation(_))));
}

#[rstest]
fn given_composite_values_when_walking_pre_order_then_own_value_first() {
    let tree = Component::composite_with(10)
        .with_child(Component::composite_with(20).with_child(Component::leaf(21)).unwrap())
        .unwrap()
        .with_child(Component::leaf(30))
        .unwrap();
    let values: Vec<i32> = tree.cursor().copied().collect();
    assert_eq!(values, vec![10, 20, 21, 30]);
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.leaves(), vec![&21, &30]);
}

#[rstest]
fn given_exhausted_cursor_when_advancing_again_then_stays_empty(pricing_tree: Component<i64>) {
    let mut cursor = pricing_tree.cursor();
    let mut seen = 0;
    while cursor.has_next() {
        assert!(cursor.next_value().has_value());
        seen += 1;
    }
    assert_eq!(seen, 3);
    for _ in 0..3 {
        assert!(!cursor.has_next());
        assert_eq!(cursor.next_value(), OptionalBox::empty());
    }
}

#[rstest]
fn given_tree_when_folding_leaves_then_accumulates_in_order(pricing_tree: Component<i64>) {
    let joined = pricing_tree.fold_leaves(String::new(), |acc, v| format!("{acc}{v};"));
    assert_eq!(joined, "100;200;300;");
}

#[test]
fn given_very_deep_chain_when_querying_and_dropping_then_no_stack_overflow() {
    let mut tree = Component::leaf(7_i64);
    for _ in 0..200_000 {
        tree = Component::composite().with_child(tree).unwrap();
    }

    assert_eq!(tree.count(CountPolicy::LeafOnly, |_| true), 1);
    assert_eq!(tree.first(CountPolicy::LeafOnly, |v| *v == 7), OptionalBox::of(&7));
    assert_eq!(tree.depth(), 200_001);
    assert_eq!(tree.leaves(), vec![&7]);
    drop(tree);
}
