//! Shape manipulation: broadcast, splat, expand-dims.

use smallvec::smallvec;
use tile_ir::OpKind;

use crate::lattice::{AxisInfo, DimVec, KnownAxis};
use crate::registry::{RuleCtx, TransferRule};

/// Stretch size-1 dimensions to the result extents.
///
/// A stretched dimension repeats one element, so it becomes constant over
/// the whole extent and loses contiguity. Other dimensions pass through.
pub struct Broadcast;

impl TransferRule for Broadcast {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        let Some(operand) = ctx.operand(0) else {
            return AxisInfo::Unknown;
        };
        let Some(source) = ctx.operand_type(0).map(|ty| ty.shape()) else {
            return AxisInfo::Unknown;
        };
        let result = ctx.result_shape();
        if source.len() != result.len() || operand.rank() != result.len() {
            tracing::warn!(
                source_rank = source.len(),
                result_rank = result.len(),
                "broadcast changes rank; giving up"
            );
            return AxisInfo::Unknown;
        }

        let mut contiguity = DimVec::with_capacity(result.len());
        let mut constancy = DimVec::with_capacity(result.len());
        for (d, (&src, &dst)) in source.iter().zip(&result).enumerate() {
            if src == 1 {
                contiguity.push(1);
                constancy.push(dst);
            } else {
                contiguity.push(operand.contiguity(d));
                constancy.push(operand.constancy(d));
            }
        }
        AxisInfo::known(
            contiguity,
            operand.divisibility.clone(),
            constancy,
            operand.constant(),
        )
    }
}

/// Scalar to tensor: every element is the scalar.
pub struct Splat;

impl TransferRule for Splat {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        let Some(operand) = ctx.operand(0) else {
            return AxisInfo::Unknown;
        };
        let shape = ctx.result_shape();
        let rank = shape.len();
        AxisInfo::known(
            smallvec![1; rank],
            smallvec![operand.divisibility.first().copied().unwrap_or(1); rank],
            shape.iter().copied().collect(),
            operand.constant(),
        )
    }
}

/// Insert a size-1 dimension at `axis`. The new dimension guarantees
/// nothing; the others are unchanged.
pub struct ExpandDims;

impl TransferRule for ExpandDims {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        let OpKind::ExpandDims { axis } = ctx.op.kind else {
            return AxisInfo::Unknown;
        };
        let Some(operand) = ctx.operand(0) else {
            return AxisInfo::Unknown;
        };
        let axis = axis as usize;
        if axis > operand.rank() {
            tracing::warn!(axis, rank = operand.rank(), "expand_dims axis out of range");
            return AxisInfo::Unknown;
        }

        let insert = |dims: &DimVec| -> DimVec {
            let mut dims = dims.clone();
            dims.insert(axis, 1);
            dims
        };
        AxisInfo::Known(KnownAxis::new(
            insert(&operand.contiguity),
            insert(&operand.divisibility),
            insert(&operand.constancy),
            operand.constant(),
        ))
    }
}
