//! Integer comparison.

use tile_ir::{CmpPredicate, OpKind};

use crate::lattice::KnownAxis;
use crate::math::gcd;
use crate::registry::RuleCtx;

use super::{both_constant, BinaryTransfer};

/// `cmpi <predicate>`.
///
/// Comparing a contiguous run against a value constant over the same
/// extent flips at most once per aligned block, so the result is constant
/// over runs of `gcd(contiguity, divisibility)`. `sge`/`uge` with the
/// contiguous side on the left (and `sle`/`ule` with it on the right) can
/// flip inside the block and are excluded.
pub struct Compare;

fn predicate(ctx: &RuleCtx<'_>) -> Option<CmpPredicate> {
    match ctx.op.kind {
        OpKind::CmpI { predicate } => Some(predicate),
        _ => None,
    }
}

impl BinaryTransfer for Compare {
    fn constancy(&self, ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        if both_constant(lhs, rhs).is_some() {
            return lhs.constancy(dim);
        }
        let base = gcd(lhs.constancy(dim), rhs.constancy(dim));
        let Some(pred) = predicate(ctx) else {
            return base;
        };

        let shape = ctx.result_shape();
        let contiguous_vs_constant = !pred.is_greater_or_equal()
            && lhs.is_contiguous_dim(&shape, dim)
            && rhs.is_constant_dim(&shape, dim);
        let constant_vs_contiguous = !pred.is_less_or_equal()
            && lhs.is_constant_dim(&shape, dim)
            && rhs.is_contiguous_dim(&shape, dim);
        if contiguous_vs_constant || constant_vs_contiguous {
            base.max(gcd(
                lhs.contiguity(dim),
                gcd(lhs.divisibility(dim), rhs.divisibility(dim)),
            ))
        } else {
            base
        }
    }

    fn constant(&self, ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis) -> Option<i64> {
        let pred = predicate(ctx)?;
        let (l, r) = both_constant(lhs, rhs)?;
        Some(i64::from(pred.evaluate(l, r)))
    }
}
