//! Shared test utilities for the lattice, rules, driver, and queries.
//! Only compiled in test builds.

#![allow(clippy::unwrap_used)]

use tile_ir::{
    Block, BlockId, Function, OpKind, Operation, Param, ScalarTy, Terminator, Ty, ValueId,
};

use crate::lattice::{AxisInfo, KnownAxis};
use crate::options::AnalysisOptions;
use crate::registry::{Registry, RuleCtx};

/// Shorthand for `ValueId::new(n)`.
pub(crate) fn v(n: u32) -> ValueId {
    ValueId::new(n)
}

/// A scalar `i32`.
pub(crate) fn scalar() -> Ty {
    Ty::Scalar(ScalarTy::I32)
}

/// An `i32` tensor without a layout.
pub(crate) fn t(shape: &[i64]) -> Ty {
    Ty::tensor(shape, ScalarTy::I32)
}

/// Build a `KnownAxis` from slices.
pub(crate) fn ka(
    contiguity: &[i64],
    divisibility: &[i64],
    constancy: &[i64],
    constant: Option<i64>,
) -> KnownAxis {
    KnownAxis::new(
        contiguity.into(),
        divisibility.into(),
        constancy.into(),
        constant,
    )
}

/// Build a known `AxisInfo` from slices.
pub(crate) fn known(
    contiguity: &[i64],
    divisibility: &[i64],
    constancy: &[i64],
    constant: Option<i64>,
) -> AxisInfo {
    AxisInfo::Known(ka(contiguity, divisibility, constancy, constant))
}

/// Run the default rule for `kind` on operands of the given types and
/// facts, producing a result of type `result`.
pub(crate) fn apply_rule(kind: OpKind, operands: &[(Ty, AxisInfo)], result: Ty) -> AxisInfo {
    apply_rule_with(&AnalysisOptions::default(), kind, operands, result)
}

/// [`apply_rule`] with explicit options.
///
/// The one-op function is assembled by hand and never verified, so rules
/// can be fed shapes the verifier would reject.
pub(crate) fn apply_rule_with(
    options: &AnalysisOptions,
    kind: OpKind,
    operands: &[(Ty, AxisInfo)],
    result: Ty,
) -> AxisInfo {
    let func = single_op_function(kind, operands.iter().map(|(ty, _)| ty.clone()), result);
    let facts: Vec<AxisInfo> = operands.iter().map(|(_, fact)| fact.clone()).collect();
    let ctx = RuleCtx {
        func: &func,
        op: &func.blocks[0].ops[0],
        operands: &facts,
        options,
    };
    Registry::with_default_rules().apply(&ctx)
}

/// A function holding one `kind` op over fresh parameters, built without
/// verification.
pub(crate) fn single_op_function(
    kind: OpKind,
    operand_tys: impl Iterator<Item = Ty>,
    result: Ty,
) -> Function {
    let mut value_types: Vec<Ty> = operand_tys.collect();
    let n = u32::try_from(value_types.len()).unwrap();
    let params: Vec<ValueId> = (0..n).map(ValueId::new).collect();
    let out = ValueId::new(n);
    value_types.push(result);

    Function {
        name: "rule".to_owned(),
        params: params
            .iter()
            .map(|&value| Param {
                value,
                divisibility: None,
            })
            .collect(),
        blocks: vec![Block {
            id: BlockId::new(0),
            params,
            ops: vec![Operation {
                kind,
                operands: (0..n).map(ValueId::new).collect(),
                results: vec![out],
            }],
            terminator: Terminator::Return { values: vec![out] },
        }],
        entry: BlockId::new(0),
        value_types,
    }
}
