//! Built-in transfer rules, one per operation category.
//!
//! Elementwise binary operations share the [`Binary`] adapter: each rule
//! supplies per-dimension contiguity, divisibility, and constancy plus the
//! folded constant, and the adapter assembles the fact. Every hook
//! defaults to "no guarantee" (1, or no constant).

mod arith;
mod bitwise;
mod cast;
mod cmp;
mod producer;
mod select;
mod shape;

use tile_ir::OpCode;

use crate::lattice::{AxisInfo, DimVec, KnownAxis};
use crate::registry::{Registry, RuleCtx, TransferRule};

pub use arith::{Add, Div, Mul, Rem, Sub};
pub use bitwise::{BitOp, Bitwise};
pub use cast::IdentityCast;
pub use cmp::Compare;
pub use producer::{Constant, MakeRange};
pub use select::Select;
pub use shape::{Broadcast, ExpandDims, Splat};

/// Install the built-in rules into `registry`.
pub(crate) fn register_defaults(registry: &mut Registry) {
    for code in [
        OpCode::ExtSI,
        OpCode::ExtUI,
        OpCode::TruncI,
        OpCode::IndexCast,
        OpCode::PtrToInt,
        OpCode::IntToPtr,
        OpCode::ConvertLayout,
        OpCode::Bitcast,
        OpCode::UnrealizedCast,
    ] {
        registry.register(code, IdentityCast);
    }
    registry
        .register(OpCode::MakeRange, MakeRange)
        .register(OpCode::Constant, Constant)
        .register(OpCode::AddI, Binary(Add))
        .register(OpCode::AddPtr, Binary(Add))
        .register(OpCode::SubI, Binary(Sub))
        .register(OpCode::MulI, Binary(Mul))
        .register(OpCode::DivSI, Binary(Div { unsigned: false }))
        .register(OpCode::DivUI, Binary(Div { unsigned: true }))
        .register(OpCode::RemSI, Binary(Rem { unsigned: false }))
        .register(OpCode::RemUI, Binary(Rem { unsigned: true }))
        .register(OpCode::Broadcast, Broadcast)
        .register(OpCode::Splat, Splat)
        .register(OpCode::ExpandDims, ExpandDims)
        .register(OpCode::CmpI, Binary(Compare))
        .register(OpCode::AndI, Binary(Bitwise(BitOp::And)))
        .register(OpCode::OrI, Binary(Bitwise(BitOp::Or)))
        .register(OpCode::XorI, Binary(Bitwise(BitOp::Xor)))
        .register(OpCode::Select, Select);
}

/// Per-dimension hooks of an elementwise binary rule.
pub trait BinaryTransfer: Send + Sync {
    fn contiguity(
        &self,
        _ctx: &RuleCtx<'_>,
        _lhs: &KnownAxis,
        _rhs: &KnownAxis,
        _dim: usize,
    ) -> i64 {
        1
    }

    fn divisibility(
        &self,
        _ctx: &RuleCtx<'_>,
        _lhs: &KnownAxis,
        _rhs: &KnownAxis,
        _dim: usize,
    ) -> i64 {
        1
    }

    fn constancy(
        &self,
        _ctx: &RuleCtx<'_>,
        _lhs: &KnownAxis,
        _rhs: &KnownAxis,
        _dim: usize,
    ) -> i64 {
        1
    }

    fn constant(&self, _ctx: &RuleCtx<'_>, _lhs: &KnownAxis, _rhs: &KnownAxis) -> Option<i64> {
        None
    }
}

/// Adapts a [`BinaryTransfer`] into a [`TransferRule`].
pub struct Binary<T>(pub T);

impl<T: BinaryTransfer> TransferRule for Binary<T> {
    fn transfer(&self, ctx: &RuleCtx<'_>) -> AxisInfo {
        let (Some(lhs), Some(rhs)) = (ctx.operand(0), ctx.operand(1)) else {
            return AxisInfo::Unknown;
        };
        if lhs.rank() != rhs.rank() {
            tracing::warn!(
                op = %ctx.op.kind.code(),
                lhs_rank = lhs.rank(),
                rhs_rank = rhs.rank(),
                "binary operands disagree on rank"
            );
            return AxisInfo::Unknown;
        }

        let rank = lhs.rank();
        let mut contiguity = DimVec::with_capacity(rank);
        let mut divisibility = DimVec::with_capacity(rank);
        let mut constancy = DimVec::with_capacity(rank);
        for d in 0..rank {
            contiguity.push(self.0.contiguity(ctx, lhs, rhs, d));
            divisibility.push(self.0.divisibility(ctx, lhs, rhs, d));
            constancy.push(self.0.constancy(ctx, lhs, rhs, d));
        }
        let constant = self.0.constant(ctx, lhs, rhs);
        AxisInfo::known(contiguity, divisibility, constancy, constant)
    }
}

/// Both operands carry exact constants.
fn both_constant(lhs: &KnownAxis, rhs: &KnownAxis) -> Option<(i64, i64)> {
    Some((lhs.constant()?, rhs.constant()?))
}
