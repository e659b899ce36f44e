use pretty_assertions::assert_eq;
use smallvec::smallvec;
use tile_ir::{ConstValue, FunctionBuilder, OpCode, OpKind, ScalarTy, Ty};

use crate::lattice::AxisInfo;
use crate::math::ZERO_DIVISIBILITY;
use crate::options::AnalysisOptions;
use crate::registry::{Registry, RuleCtx};
use crate::test_helpers::{known, scalar, single_op_function, t, v};

use super::{analyze, AnalysisStats, AxisInfoAnalysis};

/// `splat(base) + make_range(0, 128)` with a 16-aligned base.
#[test]
fn straight_line_offsets() {
    let mut b = FunctionBuilder::new("offsets");
    let base = b.param_with_divisibility(scalar(), 16);
    let range = b.make_range(0, 128);
    let splat = b.splat(base, &[128]);
    let offsets = b.binary(OpKind::AddI, splat, range);
    b.ret(&[offsets]);
    let func = b.finish().unwrap();

    let facts = analyze(&func);
    assert_eq!(facts.get(base), &known(&[1], &[16], &[1], None));
    assert_eq!(facts.get(range), &known(&[128], &[ZERO_DIVISIBILITY], &[1], None));
    assert_eq!(facts.get(splat), &known(&[1], &[16], &[128], None));
    assert_eq!(facts.get(offsets), &known(&[128], &[16], &[1], None));
}

/// Two constants meeting at a join keep their common divisibility only.
#[test]
fn diamond_join() {
    let mut b = FunctionBuilder::new("diamond");
    let cond = b.param(Ty::Scalar(ScalarTy::I1));
    let then_bb = b.new_block();
    let else_bb = b.new_block();
    let join_bb = b.new_block();
    let joined = b.block_param(join_bb, scalar());
    b.branch(cond, then_bb, &[], else_bb, &[]);

    b.switch_to(then_bb);
    let sixteen = b.const_i32(16);
    b.jump(join_bb, &[sixteen]);

    b.switch_to(else_bb);
    let eight = b.const_i32(8);
    b.jump(join_bb, &[eight]);

    b.switch_to(join_bb);
    b.ret(&[joined]);
    let func = b.finish().unwrap();

    let facts = analyze(&func);
    assert_eq!(facts.get(sixteen).constant(), Some(16));
    assert_eq!(facts.get(joined), &known(&[1], &[8], &[1], None));
}

/// Agreeing constants survive the join.
#[test]
fn diamond_join_same_constant() {
    let mut b = FunctionBuilder::new("diamond");
    let cond = b.param(Ty::Scalar(ScalarTy::I1));
    let then_bb = b.new_block();
    let else_bb = b.new_block();
    let join_bb = b.new_block();
    let joined = b.block_param(join_bb, scalar());
    b.branch(cond, then_bb, &[], else_bb, &[]);

    b.switch_to(then_bb);
    let lhs = b.const_i32(4);
    b.jump(join_bb, &[lhs]);

    b.switch_to(else_bb);
    let rhs = b.const_i32(4);
    b.jump(join_bb, &[rhs]);

    b.switch_to(join_bb);
    b.ret(&[joined]);
    let func = b.finish().unwrap();

    assert_eq!(analyze(&func).get(joined).constant(), Some(4));
}

/// `i = range; loop { i = i + 64 }`: the induction variable keeps its
/// contiguity, and its divisibility drops to the step's.
#[test]
fn loop_carried_induction_variable() {
    crate::init_tracing();

    let mut b = FunctionBuilder::new("loop");
    let cond = b.param(Ty::Scalar(ScalarTy::I1));
    let header = b.new_block();
    let exit = b.new_block();
    let start = b.make_range(0, 64);
    let step = b.constant(ConstValue::Int(64), t(&[64]));
    b.jump(header, &[start]);

    b.switch_to(header);
    let i = b.block_param(header, t(&[64]));
    let next = b.binary(OpKind::AddI, i, step);
    b.branch(cond, header, &[next], exit, &[]);

    b.switch_to(exit);
    b.ret(&[]);
    let func = b.finish().unwrap();

    let facts = analyze(&func);
    assert_eq!(facts.get(i), &known(&[64], &[64], &[1], None));
    assert_eq!(facts.get(next), &known(&[64], &[64], &[1], None));

    // The second visit of `next` reproduces its fact, so neither the
    // back edge nor the add runs a third productive time.
    assert_eq!(
        facts.stats(),
        AnalysisStats {
            op_visits: 5,
            edge_visits: 3,
            value_updates: 5,
        }
    );
}

#[test]
fn unmodeled_op_is_pessimistic() {
    let mut b = FunctionBuilder::new("load");
    let ptr = b.param_with_divisibility(Ty::tensor(&[64], ScalarTy::Ptr), 16);
    let loaded = b.load(ptr, None, t(&[64]));
    let range = b.make_range(0, 64);
    let sum = b.binary(OpKind::AddI, loaded, range);
    b.ret(&[sum]);
    let func = b.finish().unwrap();

    let facts = analyze(&func);
    assert_eq!(facts.get(ptr), &known(&[1], &[16], &[1], None));
    assert_eq!(facts.get(loaded), &AxisInfo::no_guarantees(1));
    assert_eq!(facts.get(sum), &AxisInfo::no_guarantees(1));
}

fn aligned_alloc(_: &RuleCtx<'_>) -> AxisInfo {
    AxisInfo::known(smallvec![1], smallvec![32], smallvec![1], None)
}

fn wrong_rank(_: &RuleCtx<'_>) -> AxisInfo {
    AxisInfo::no_guarantees(2)
}

fn opaque_kernel() -> (tile_ir::Function, tile_ir::ValueId) {
    let mut b = FunctionBuilder::new("opaque");
    let out = b.push(
        OpKind::Opaque {
            name: "aligned_alloc".to_owned(),
        },
        &[],
        vec![t(&[64])],
    );
    b.ret(&out);
    (b.finish().unwrap(), out[0])
}

#[test]
fn custom_rule_is_used() {
    let (func, value) = opaque_kernel();
    assert_eq!(analyze(&func).get(value), &AxisInfo::no_guarantees(1));

    let mut analysis = AxisInfoAnalysis::new();
    analysis.registry_mut().register(OpCode::Opaque, aligned_alloc);
    assert_eq!(
        analysis.analyze(&func).get(value),
        &known(&[1], &[32], &[1], None)
    );
}

#[test]
fn rule_with_wrong_rank_is_pessimistic() {
    let (func, value) = opaque_kernel();
    let mut registry = Registry::empty();
    registry.register(OpCode::Opaque, wrong_rank);
    let facts = AxisInfoAnalysis::with_registry(registry).analyze(&func);
    assert_eq!(facts.get(value), &AxisInfo::no_guarantees(1));
}

/// Unverified IR with range bounds that overflow or disagree with the
/// result type degrades to no guarantees instead of panicking.
#[test]
fn malformed_range_is_pessimistic() {
    for (start, end) in [(0, 0), (8, 4), (0, 1024), (i64::MIN, i64::MAX)] {
        let func = single_op_function(
            OpKind::MakeRange { start, end },
            std::iter::empty(),
            t(&[4]),
        );
        assert_eq!(
            analyze(&func).get(v(0)),
            &AxisInfo::no_guarantees(1),
            "make_range({start}, {end})"
        );
    }
}

#[test]
fn unreachable_block_param_stays_unknown() {
    let mut b = FunctionBuilder::new("dead");
    let dead = b.new_block();
    let param = b.block_param(dead, t(&[8]));
    b.ret(&[]);

    b.switch_to(dead);
    let range = b.make_range(0, 8);
    let sum = b.binary(OpKind::AddI, param, range);
    b.ret(&[sum]);
    let func = b.finish().unwrap();

    let facts = analyze(&func);
    assert_eq!(facts.get(param), &AxisInfo::Unknown);
    assert_eq!(facts.get(sum), &AxisInfo::Unknown);
    assert!(facts.get(range).is_known());
}

#[test]
fn options_reach_the_rules() {
    let mut b = FunctionBuilder::new("cast");
    let range = b.make_range(0, 8);
    let reshaped = b.cast(OpKind::Bitcast, range, t(&[2, 4]));
    b.ret(&[reshaped]);
    let func = b.finish().unwrap();

    assert_eq!(analyze(&func).get(reshaped), &AxisInfo::no_guarantees(2));

    // Without validation the rank-1 fact no longer fits the rank-2 result,
    // and the driver pins the result instead.
    let lenient = AxisInfoAnalysis::new()
        .with_options(AnalysisOptions::default().with_validate_casts(false));
    assert!(!lenient.options().validate_casts);
    assert_eq!(
        lenient.analyze(&func).get(reshaped),
        &AxisInfo::no_guarantees(2)
    );
}

#[test]
fn analysis_is_deterministic() {
    let mut b = FunctionBuilder::new("offsets");
    let base = b.param_with_divisibility(scalar(), 8);
    let range = b.make_range(0, 32);
    let splat = b.splat(base, &[32]);
    let offsets = b.binary(OpKind::AddI, splat, range);
    b.ret(&[offsets]);
    let func = b.finish().unwrap();

    let analysis = AxisInfoAnalysis::default();
    assert_eq!(analysis.analyze(&func), analysis.analyze(&func));
    assert_eq!(analysis.registry().len(), Registry::with_default_rules().len());
}
