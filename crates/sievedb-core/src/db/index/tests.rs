use crate::{
    MAX_INDEX_COLUMNS,
    db::index::{ColumnDescriptor, Interval, IndexError, TableIndex},
    expr::{Expr, Var},
    value::{CanonicalOrder, Value, canonical_cmp},
};
use proptest::prelude::*;
use std::sync::Arc;

fn int(v: i64) -> Value {
    Value::Int(v)
}

#[test]
fn default_interval_is_universal() {
    let interval = Interval::<Value>::default();

    assert!(interval.is_universe());
    assert!(!interval.is_empty());
    assert!(interval.contains(&int(0), canonical_cmp));
}

#[test]
fn point_intersection() {
    let a = Interval::point(int(4));
    let b = Interval::point(int(4));
    let c = Interval::point(int(5));

    assert_eq!(a.intersect(&b, canonical_cmp), Interval::point(int(4)));
    assert!(a.intersect(&c, canonical_cmp).is_empty());
}

#[test]
fn coincident_bound_with_any_exclusivity_is_empty() {
    // [v, v] ∩ (v, +inf) has lower (v ..] upper [.. v], which crosses.
    let point = Interval::point(int(7));
    let above = Interval::lower_bounded(int(7), true);

    assert!(point.intersect(&above, canonical_cmp).is_empty());
    assert!(above.intersect(&point, canonical_cmp).is_empty());
}

#[test]
fn tie_on_a_side_takes_the_exclusive_flag() {
    let inclusive = Interval::lower_bounded(int(3), false);
    let exclusive = Interval::lower_bounded(int(3), true);
    let merged = inclusive.intersect(&exclusive, canonical_cmp);

    assert!(!merged.contains(&int(3), canonical_cmp));
    assert!(merged.contains(&int(4), canonical_cmp));
}

#[test]
fn two_sided_intersection_picks_the_tighter_bounds() {
    let a = Interval::lower_bounded(int(1), false).intersect(
        &Interval::upper_bounded(int(9), false),
        canonical_cmp,
    );
    let b = Interval::lower_bounded(int(3), false).intersect(
        &Interval::upper_bounded(int(7), true),
        canonical_cmp,
    );
    let merged = a.intersect(&b, canonical_cmp);

    assert!(!merged.contains(&int(2), canonical_cmp));
    assert!(merged.contains(&int(3), canonical_cmp));
    assert!(merged.contains(&int(6), canonical_cmp));
    assert!(!merged.contains(&int(7), canonical_cmp));
}

#[test]
fn crossed_bounds_collapse_to_empty() {
    let lower = Interval::lower_bounded(int(8), false);
    let upper = Interval::upper_bounded(int(3), false);

    assert!(lower.intersect(&upper, canonical_cmp).is_empty());
}

#[test]
fn intervals_round_trip_through_serde() {
    let interval = Interval::lower_bounded(int(3), true).intersect(
        &Interval::upper_bounded(int(9), false),
        canonical_cmp,
    );
    let json = serde_json::to_string(&interval).unwrap();
    assert_eq!(
        serde_json::from_str::<Interval<Value>>(&json).unwrap(),
        interval
    );
}

#[test]
fn erased_intersection_matches_typed() {
    let order = CanonicalOrder;
    let a = Interval::point(int(5));
    let b = Interval::lower_bounded(int(5), false);

    assert_eq!(
        a.intersect_with(&b, &order),
        a.intersect(&b, canonical_cmp)
    );
    assert!(a.contains_value(&int(5), &order));
}

fn arb_interval() -> impl Strategy<Value = Interval<Value>> {
    let value = (-5i64..6).prop_map(Value::Int);
    prop_oneof![
        Just(Interval::universe()),
        Just(Interval::empty()),
        value.clone().prop_map(Interval::point),
        (value.clone(), any::<bool>()).prop_map(|(v, e)| Interval::lower_bounded(v, e)),
        (value.clone(), any::<bool>()).prop_map(|(v, e)| Interval::upper_bounded(v, e)),
        (value.clone(), any::<bool>(), value, any::<bool>()).prop_map(|(lo, le, hi, he)| {
            Interval::lower_bounded(lo, le)
                .intersect(&Interval::upper_bounded(hi, he), canonical_cmp)
        }),
    ]
}

proptest! {
    #[test]
    fn intersect_is_commutative(a in arb_interval(), b in arb_interval()) {
        prop_assert_eq!(
            a.intersect(&b, canonical_cmp),
            b.intersect(&a, canonical_cmp)
        );
    }

    #[test]
    fn intersect_is_associative(
        a in arb_interval(),
        b in arb_interval(),
        c in arb_interval(),
    ) {
        let left = a.intersect(&b, canonical_cmp).intersect(&c, canonical_cmp);
        let right = a.intersect(&b.intersect(&c, canonical_cmp), canonical_cmp);
        prop_assert_eq!(left, right);
    }

    #[test]
    fn intersect_is_idempotent(a in arb_interval()) {
        prop_assert_eq!(a.intersect(&a, canonical_cmp), a);
    }

    #[test]
    fn universe_is_the_identity(a in arb_interval()) {
        prop_assert_eq!(a.intersect(&Interval::universe(), canonical_cmp), a);
    }

    #[test]
    fn empty_is_absorbing(a in arb_interval()) {
        prop_assert!(a.intersect(&Interval::empty(), canonical_cmp).is_empty());
    }

    #[test]
    fn intersection_membership_is_conjunction(
        a in arb_interval(),
        b in arb_interval(),
        v in -6i64..7,
    ) {
        let value = Value::Int(v);
        let merged = a.intersect(&b, canonical_cmp);
        prop_assert_eq!(
            merged.contains(&value, canonical_cmp),
            a.contains(&value, canonical_cmp) && b.contains(&value, canonical_cmp)
        );
    }
}

fn age_column(row: &Var) -> ColumnDescriptor {
    ColumnDescriptor::ordered(
        row.clone(),
        Expr::member(Expr::var(row), "age"),
        Arc::new(CanonicalOrder),
    )
}

#[test]
fn descriptor_matches_across_row_variables() {
    let stored_row = Var::new("row");
    let query_row = Var::new("r");
    let column = age_column(&stored_row);

    let probe = Expr::member(Expr::var(&query_row), "age");
    assert!(column.matches(&query_row, &probe));

    let other = Expr::member(Expr::var(&query_row), "name");
    assert!(!column.matches(&query_row, &other));
}

#[test]
fn descriptor_does_not_match_foreign_variables() {
    let stored_row = Var::new("row");
    let query_row = Var::new("r");
    let stranger = Var::new("s");
    let column = age_column(&stored_row);

    let probe = Expr::member(Expr::var(&stranger), "age");
    assert!(!column.matches(&query_row, &probe));
}

#[test]
fn hashed_columns_carry_no_order() {
    let row = Var::new("row");
    let column = ColumnDescriptor::hashed(
        row.clone(),
        Expr::member(Expr::var(&row), "tag"),
        Arc::new(CanonicalOrder),
    );

    assert!(!column.is_ordered());
    assert!(column.order().is_none());
}

#[test]
fn index_arity_is_bounded() {
    let row = Var::new("row");
    let columns: Vec<_> = (0..=MAX_INDEX_COLUMNS)
        .map(|i| {
            ColumnDescriptor::ordered(
                row.clone(),
                Expr::member(Expr::var(&row), format!("c{i}").as_str()),
                Arc::new(CanonicalOrder),
            )
        })
        .collect();

    assert_eq!(
        TableIndex::new(columns).unwrap_err(),
        IndexError::TooManyColumns {
            count: MAX_INDEX_COLUMNS + 1,
            max: MAX_INDEX_COLUMNS,
        }
    );
}

#[test]
fn index_orderedness_requires_every_column() {
    let row = Var::new("row");
    let ordered = age_column(&row);
    let hashed = ColumnDescriptor::hashed(
        row.clone(),
        Expr::member(Expr::var(&row), "tag"),
        Arc::new(CanonicalOrder),
    );

    let index = TableIndex::new(vec![ordered, hashed]).unwrap();
    assert!(!index.is_ordered());
}
