use pretty_assertions::assert_eq;
use tile_ir::{FunctionBuilder, ScalarTy, Ty};

use crate::math::ZERO_DIVISIBILITY;
use crate::test_helpers::{ka, known, t};

use super::{AxisInfo, KnownAxis};

#[test]
fn merge_with_unknown_returns_other_side() {
    let fact = known(&[4], &[16], &[1], None);
    assert_eq!(AxisInfo::merge(&fact, &AxisInfo::Unknown), fact);
    assert_eq!(AxisInfo::merge(&AxisInfo::Unknown, &fact), fact);
}

#[test]
fn merge_takes_gcd_per_dimension() {
    let lhs = known(&[128, 4], &[16, 8], &[1, 12], None);
    let rhs = known(&[64, 6], &[12, 8], &[1, 8], None);
    assert_eq!(
        AxisInfo::merge(&lhs, &rhs),
        known(&[64, 2], &[4, 8], &[1, 4], None)
    );
}

#[test]
fn merge_keeps_only_agreeing_constant() {
    let four = known(&[1], &[4], &[1], Some(4));
    let eight = known(&[1], &[8], &[1], Some(8));
    assert_eq!(AxisInfo::merge(&four, &four).constant(), Some(4));
    assert_eq!(AxisInfo::merge(&four, &eight), known(&[1], &[4], &[1], None));
}

#[test]
fn merge_with_zero_sentinel() {
    let zero = known(&[1], &[ZERO_DIVISIBILITY], &[1], Some(0));
    let sixteen = known(&[1], &[16], &[1], Some(16));
    assert_eq!(
        AxisInfo::merge(&zero, &sixteen),
        known(&[1], &[16], &[1], None)
    );
}

#[test]
fn pessimistic_uses_hint_in_every_dimension() {
    let mut b = FunctionBuilder::new("k");
    let hinted = b.param_with_divisibility(t(&[4, 8]), 16);
    let plain = b.param(Ty::Scalar(ScalarTy::Ptr));
    b.ret(&[]);
    let func = b.finish().unwrap();

    assert_eq!(
        AxisInfo::pessimistic(&func, hinted),
        known(&[1, 1], &[16, 16], &[1, 1], None)
    );
    assert_eq!(
        AxisInfo::pessimistic(&func, plain),
        AxisInfo::no_guarantees(1)
    );
}

#[test]
fn whole_extent_predicates() {
    let fact = ka(&[8, 1], &[1, 1], &[1, 4], None);
    let shape = [8, 4];
    assert!(fact.is_contiguous_dim(&shape, 0));
    assert!(!fact.is_contiguous_dim(&shape, 1));
    assert!(fact.is_constant_dim(&shape, 1));
    assert!(!fact.is_constant_dim(&shape, 0));
    assert!(!fact.is_constant_dim(&shape, 5));
}

#[test]
fn uniform_fact() {
    let fact = KnownAxis::uniform(3, 8);
    assert_eq!(fact.rank(), 3);
    assert_eq!(fact.divisibility.as_slice(), &[8, 8, 8]);
    assert_eq!(fact.contiguity.as_slice(), &[1, 1, 1]);
    assert_eq!(fact.constant(), None);
}

#[test]
fn display_format() {
    assert_eq!(
        known(&[128], &[16], &[1], None).to_string(),
        "contiguity = [128], divisibility = [16], constancy = [1], constant_value = <none>"
    );
    assert_eq!(
        known(&[1, 1], &[4, 4], &[2, 8], Some(4)).to_string(),
        "contiguity = [1, 1], divisibility = [4, 4], constancy = [2, 8], constant_value = 4"
    );
    assert_eq!(AxisInfo::Unknown.to_string(), "<unknown>");
}

#[test]
fn unknown_accessors() {
    assert!(!AxisInfo::Unknown.is_known());
    assert_eq!(AxisInfo::Unknown.rank(), None);
    assert_eq!(AxisInfo::Unknown.constant(), None);
    assert_eq!(AxisInfo::default(), AxisInfo::Unknown);
    assert_eq!(AxisInfo::from(ka(&[2], &[2], &[1], None)).rank(), Some(1));
}
