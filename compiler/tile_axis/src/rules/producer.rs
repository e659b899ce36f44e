//! Operations that create values from nothing: ranges and constants.

use smallvec::smallvec;
use tile_ir::OpKind;

use crate::lattice::{AxisInfo, DimVec};
use crate::math::highest_pow2_divisor;
use crate::registry::{RuleCtx, TransferRule};

/// `make_range(start, end)`: one contiguous run of `end - start` integers
/// starting at `start`.
///
/// Gives up unless the run is non-empty and exactly fills the 1-D result.
pub struct MakeRange;

impl TransferRule for MakeRange {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        let OpKind::MakeRange { start, end } = ctx.op.kind else {
            return AxisInfo::Unknown;
        };
        let Some(len) = end.checked_sub(start).filter(|&len| len > 0) else {
            tracing::warn!(start, end, "empty or overflowing range");
            return AxisInfo::Unknown;
        };
        let fits = ctx
            .result_type()
            .and_then(|ty| ty.as_tensor())
            .is_some_and(|t| t.shape.as_slice() == [len]);
        if !fits {
            tracing::warn!(start, end, "range length disagrees with its result type");
            return AxisInfo::Unknown;
        }
        AxisInfo::known(
            smallvec![len],
            smallvec![highest_pow2_divisor(start)],
            smallvec![1],
            None,
        )
    }
}

/// Integer and boolean constants, scalar or splatted across a tensor.
///
/// Float constants carry nothing integral and give up.
pub struct Constant;

impl TransferRule for Constant {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        let OpKind::Constant(value) = ctx.op.kind else {
            return AxisInfo::Unknown;
        };
        let Some(c) = value.as_int() else {
            return AxisInfo::Unknown;
        };

        let divisibility = highest_pow2_divisor(c);
        match ctx.result_type().and_then(|ty| ty.as_tensor()) {
            Some(tensor) => {
                let rank = tensor.shape.len();
                AxisInfo::known(
                    smallvec![1; rank],
                    smallvec![divisibility; rank],
                    tensor.shape.iter().copied().collect::<DimVec>(),
                    Some(c),
                )
            }
            None => AxisInfo::known(smallvec![1], smallvec![divisibility], smallvec![1], Some(c)),
        }
    }
}
