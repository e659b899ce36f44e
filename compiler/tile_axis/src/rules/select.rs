//! `select(cond, on_true, on_false)`.

use crate::lattice::{AxisInfo, DimVec};
use crate::math::gcd;
use crate::registry::{RuleCtx, TransferRule};

/// Elementwise choice between two values.
///
/// A condition with a known constant picks one side exactly. Otherwise a
/// run survives only where the condition itself is constant, so each
/// side's contiguity and constancy are cut by the condition's constancy.
pub struct Select;

impl TransferRule for Select {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        let (Some(cond), Some(on_true), Some(on_false)) =
            (ctx.operand(0), ctx.operand(1), ctx.operand(2))
        else {
            return AxisInfo::Unknown;
        };

        if let Some(c) = cond.constant() {
            let chosen = if c == 0 { on_false } else { on_true };
            return AxisInfo::Known(chosen.clone());
        }

        let shape = ctx.result_shape();
        let rank = shape.len();
        if on_true.rank() != rank || on_false.rank() != rank {
            tracing::warn!(
                on_true = on_true.rank(),
                on_false = on_false.rank(),
                result = rank,
                "select branches disagree on rank"
            );
            return AxisInfo::Unknown;
        }

        // A scalar condition is uniform over the whole result.
        let uniform_cond = ctx.operand_type(0).is_some_and(|ty| !ty.is_tensor());
        let cond_constancy: DimVec = if uniform_cond {
            shape.iter().copied().collect()
        } else if cond.rank() == rank {
            cond.constancy.clone()
        } else {
            tracing::warn!(cond = cond.rank(), result = rank, "select condition rank mismatch");
            return AxisInfo::Unknown;
        };

        let mut contiguity = DimVec::with_capacity(rank);
        let mut divisibility = DimVec::with_capacity(rank);
        let mut constancy = DimVec::with_capacity(rank);
        for (d, &ccst) in cond_constancy.iter().enumerate() {
            let cut = |t: i64, f: i64| gcd(t, ccst).min(gcd(f, ccst));
            constancy.push(cut(on_true.constancy(d), on_false.constancy(d)));
            divisibility.push(on_true.divisibility(d).min(on_false.divisibility(d)));
            contiguity.push(cut(on_true.contiguity(d), on_false.contiguity(d)));
        }
        let constant = match (on_true.constant(), on_false.constant()) {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        };
        AxisInfo::known(contiguity, divisibility, constancy, constant)
    }
}
