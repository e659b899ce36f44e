//! Bitwise `and`, `or`, `xor`.

use crate::lattice::KnownAxis;
use crate::math::gcd;
use crate::registry::RuleCtx;

use super::{both_constant, BinaryTransfer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
}

impl BitOp {
    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            BitOp::And => lhs & rhs,
            BitOp::Or => lhs | rhs,
            BitOp::Xor => lhs ^ rhs,
        }
    }
}

/// Only constancy survives a bitwise operation: equal inputs give equal
/// outputs. Contiguity and divisibility are not tracked through bits.
pub struct Bitwise(pub BitOp);

impl BinaryTransfer for Bitwise {
    fn constancy(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        gcd(lhs.constancy(dim), rhs.constancy(dim))
    }

    fn constant(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis) -> Option<i64> {
        both_constant(lhs, rhs).map(|(l, r)| self.0.apply(l, r))
    }
}
