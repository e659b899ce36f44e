//! Value-preserving casts.

use crate::lattice::AxisInfo;
use crate::registry::{RuleCtx, TransferRule};

/// Forwards the operand's fact unchanged.
///
/// Extensions, truncations, pointer/integer conversions, bitcasts, and
/// layout conversions keep every element's value (or its address) intact,
/// so every guarantee carries over.
pub struct IdentityCast;

impl TransferRule for IdentityCast {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        let Some(operand) = ctx.operand(0) else {
            return AxisInfo::Unknown;
        };
        if ctx.options.validate_casts {
            let expected = ctx.result_type().map_or(1, |ty| ty.rank());
            if operand.rank() != expected {
                tracing::warn!(
                    op = %ctx.op.kind.code(),
                    operand_rank = operand.rank(),
                    result_rank = expected,
                    "cast changes rank; giving up"
                );
                return AxisInfo::Unknown;
            }
        }
        AxisInfo::Known(operand.clone())
    }
}
