//! Integer arithmetic: add, sub, mul, div, rem.

use crate::lattice::KnownAxis;
use crate::math::{gcd, mul_divisibility};
use crate::registry::RuleCtx;

use super::{both_constant, BinaryTransfer};

/// Contiguity of `lhs ± rhs`.
///
/// A contiguous run plus a constant run stays contiguous over their
/// common length; take whichever pairing is longer.
fn additive_contiguity(lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
    gcd(lhs.constancy(dim), rhs.contiguity(dim))
        .max(gcd(lhs.contiguity(dim), rhs.constancy(dim)))
}

/// `lhs` is contiguous over the whole extent of `dim` and `rhs` is constant
/// over it. Integer division and remainder then have runs of length
/// `gcd(contiguity_l, gcd(div_l, div_r))`.
fn contiguous_by_constant(
    ctx: &RuleCtx<'_>,
    lhs: &KnownAxis,
    rhs: &KnownAxis,
    dim: usize,
) -> Option<i64> {
    let shape = ctx.result_shape();
    if lhs.is_contiguous_dim(&shape, dim) && rhs.is_constant_dim(&shape, dim) {
        Some(gcd(
            lhs.contiguity(dim),
            gcd(lhs.divisibility(dim), rhs.divisibility(dim)),
        ))
    } else {
        None
    }
}

fn is_one(fact: &KnownAxis) -> bool {
    fact.constant() == Some(1)
}

/// `addi` and `addptr`.
pub struct Add;

impl BinaryTransfer for Add {
    fn contiguity(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        additive_contiguity(lhs, rhs, dim)
    }

    fn divisibility(
        &self,
        _ctx: &RuleCtx<'_>,
        lhs: &KnownAxis,
        rhs: &KnownAxis,
        dim: usize,
    ) -> i64 {
        // k * d_l + p * d_r is a multiple of gcd(d_l, d_r).
        gcd(lhs.divisibility(dim), rhs.divisibility(dim))
    }

    fn constancy(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        gcd(lhs.constancy(dim), rhs.constancy(dim))
    }

    fn constant(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis) -> Option<i64> {
        both_constant(lhs, rhs).map(|(l, r)| l.wrapping_add(r))
    }
}

/// `subi`.
pub struct Sub;

impl BinaryTransfer for Sub {
    fn contiguity(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        additive_contiguity(lhs, rhs, dim)
    }

    fn divisibility(
        &self,
        _ctx: &RuleCtx<'_>,
        lhs: &KnownAxis,
        rhs: &KnownAxis,
        dim: usize,
    ) -> i64 {
        gcd(lhs.divisibility(dim), rhs.divisibility(dim))
    }

    fn constancy(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        gcd(lhs.constancy(dim), rhs.constancy(dim))
    }

    fn constant(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis) -> Option<i64> {
        both_constant(lhs, rhs).map(|(l, r)| l.wrapping_sub(r))
    }
}

/// `muli`.
pub struct Mul;

impl BinaryTransfer for Mul {
    fn contiguity(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        // x * 1 = x, 1 * x = x
        let from_lhs = if is_one(rhs) { lhs.contiguity(dim) } else { 1 };
        let from_rhs = if is_one(lhs) { rhs.contiguity(dim) } else { 1 };
        from_lhs.max(from_rhs)
    }

    fn divisibility(
        &self,
        _ctx: &RuleCtx<'_>,
        lhs: &KnownAxis,
        rhs: &KnownAxis,
        dim: usize,
    ) -> i64 {
        mul_divisibility(lhs.divisibility(dim), rhs.divisibility(dim))
    }

    fn constancy(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        gcd(lhs.constancy(dim), rhs.constancy(dim))
    }

    fn constant(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis) -> Option<i64> {
        both_constant(lhs, rhs).map(|(l, r)| l.wrapping_mul(r))
    }
}

/// `divsi` and `divui`.
pub struct Div {
    pub unsigned: bool,
}

impl BinaryTransfer for Div {
    fn contiguity(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        // x / 1 = x
        if is_one(rhs) {
            lhs.contiguity(dim)
        } else {
            1
        }
    }

    fn divisibility(
        &self,
        _ctx: &RuleCtx<'_>,
        lhs: &KnownAxis,
        rhs: &KnownAxis,
        dim: usize,
    ) -> i64 {
        let l = lhs.divisibility(dim);
        let r = rhs.divisibility(dim);
        let g = gcd(l, r);
        gcd(l / g, r / g)
    }

    fn constancy(&self, ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        let base = gcd(lhs.constancy(dim), rhs.constancy(dim));
        match contiguous_by_constant(ctx, lhs, rhs, dim) {
            Some(run) => base.max(run),
            None => base,
        }
    }

    #[expect(
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap,
        reason = "unsigned division reinterprets bits"
    )]
    fn constant(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis) -> Option<i64> {
        let (l, r) = both_constant(lhs, rhs)?;
        if self.unsigned {
            (l as u64).checked_div(r as u64).map(|q| q as i64)
        } else {
            l.checked_div(r)
        }
    }
}

/// `remsi` and `remui`.
pub struct Rem {
    pub unsigned: bool,
}

impl BinaryTransfer for Rem {
    fn contiguity(&self, ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        contiguous_by_constant(ctx, lhs, rhs, dim).map_or(1, |run| run.max(1))
    }

    fn divisibility(
        &self,
        _ctx: &RuleCtx<'_>,
        lhs: &KnownAxis,
        rhs: &KnownAxis,
        dim: usize,
    ) -> i64 {
        // x - q * y is a multiple of gcd(d_x, d_y).
        gcd(lhs.divisibility(dim), rhs.divisibility(dim))
    }

    fn constancy(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis, dim: usize) -> i64 {
        gcd(lhs.constancy(dim), rhs.constancy(dim))
    }

    #[expect(
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap,
        reason = "unsigned remainder reinterprets bits"
    )]
    fn constant(&self, _ctx: &RuleCtx<'_>, lhs: &KnownAxis, rhs: &KnownAxis) -> Option<i64> {
        let (l, r) = both_constant(lhs, rhs)?;
        if self.unsigned {
            (l as u64).checked_rem(r as u64).map(|q| q as i64)
        } else {
            l.checked_rem(r)
        }
    }
}
