//! The axis-info lattice.
//!
//! Every program value gets an [`AxisInfo`]: either `Unknown` (nothing
//! derived yet) or a [`KnownAxis`] holding three per-dimension guarantees
//! and an optional exact constant:
//!
//! - **contiguity[d]**: split dimension `d` into aligned runs of this
//!   length; each run holds consecutive integers (`x, x+1, x+2, ...`).
//! - **divisibility[d]**: the first element of every contiguous run is a
//!   multiple of this (with contiguity 1, every element is).
//! - **constancy[d]**: aligned runs of this length hold one repeated value.
//!
//! All entries are at least 1 (1 means "no guarantee"). The join
//! ([`AxisInfo::merge`]) takes the per-dimension `gcd`: whatever holds on
//! both incoming paths holds with their greatest common stride. Since `gcd`
//! never grows a positive integer, repeated merges descend and the fixpoint
//! driver terminates.

use std::fmt;

use smallvec::{smallvec, SmallVec};
use tile_ir::{Function, ValueId};

use crate::math::gcd;

/// One entry per tensor dimension.
pub type DimVec = SmallVec<[i64; 4]>;

/// Facts derived for one value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KnownAxis {
    pub contiguity: DimVec,
    pub divisibility: DimVec,
    pub constancy: DimVec,
    /// Present only when every element is this exact integer.
    pub constant: Option<i64>,
}

impl KnownAxis {
    pub fn new(
        contiguity: DimVec,
        divisibility: DimVec,
        constancy: DimVec,
        constant: Option<i64>,
    ) -> Self {
        debug_assert!(
            contiguity.len() == divisibility.len() && divisibility.len() == constancy.len(),
            "axis vectors disagree on rank: {} / {} / {}",
            contiguity.len(),
            divisibility.len(),
            constancy.len(),
        );
        Self {
            contiguity,
            divisibility,
            constancy,
            constant,
        }
    }

    /// No guarantees beyond `divisibility` in every dimension.
    pub fn uniform(rank: usize, divisibility: i64) -> Self {
        Self::new(
            smallvec![1; rank],
            smallvec![divisibility; rank],
            smallvec![1; rank],
            None,
        )
    }

    pub fn rank(&self) -> usize {
        self.contiguity.len()
    }

    pub fn contiguity(&self, dim: usize) -> i64 {
        self.contiguity[dim]
    }

    pub fn divisibility(&self, dim: usize) -> i64 {
        self.divisibility[dim]
    }

    pub fn constancy(&self, dim: usize) -> i64 {
        self.constancy[dim]
    }

    pub fn constant(&self) -> Option<i64> {
        self.constant
    }

    /// Contiguity spans the whole extent of `dim`.
    pub fn is_contiguous_dim(&self, shape: &[i64], dim: usize) -> bool {
        shape.get(dim).is_some_and(|&e| self.contiguity(dim) == e)
    }

    /// Constancy spans the whole extent of `dim`.
    pub fn is_constant_dim(&self, shape: &[i64], dim: usize) -> bool {
        shape.get(dim).is_some_and(|&e| self.constancy(dim) == e)
    }

    /// Join of two known facts of equal rank.
    fn join(&self, other: &KnownAxis) -> KnownAxis {
        if self.rank() != other.rank() {
            debug_assert_eq!(self.rank(), other.rank(), "merging facts of different rank");
            return KnownAxis::uniform(self.rank().min(other.rank()), 1);
        }
        let zip_gcd = |a: &DimVec, b: &DimVec| -> DimVec {
            a.iter().zip(b).map(|(&x, &y)| gcd(x, y)).collect()
        };
        let constant = match (self.constant, other.constant) {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        };
        KnownAxis::new(
            zip_gcd(&self.contiguity, &other.contiguity),
            zip_gcd(&self.divisibility, &other.divisibility),
            zip_gcd(&self.constancy, &other.constancy),
            constant,
        )
    }
}

/// The lattice element attached to a value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisInfo {
    /// Nothing derived yet. Never read per dimension, only merged against.
    /// As a transfer-rule output it means "give up on this operation".
    #[default]
    Unknown,
    Known(KnownAxis),
}

impl AxisInfo {
    /// Shorthand for `AxisInfo::Known(KnownAxis::new(..))`.
    pub fn known(
        contiguity: DimVec,
        divisibility: DimVec,
        constancy: DimVec,
        constant: Option<i64>,
    ) -> Self {
        AxisInfo::Known(KnownAxis::new(contiguity, divisibility, constancy, constant))
    }

    /// All-ones fact of the given rank: known, but guaranteeing nothing.
    pub fn no_guarantees(rank: usize) -> Self {
        AxisInfo::Known(KnownAxis::uniform(rank, 1))
    }

    /// The starting fact for `value`.
    ///
    /// Rank comes from the value's type. Hinted kernel parameters get the
    /// hint as divisibility in every dimension; everything else gets 1.
    /// Contiguity and constancy are always 1.
    pub fn pessimistic(func: &Function, value: ValueId) -> Self {
        let rank = func.value_type(value).rank();
        let divisibility = func.param_hint(value).unwrap_or(1);
        AxisInfo::Known(KnownAxis::uniform(rank, divisibility))
    }

    pub fn is_known(&self) -> bool {
        matches!(self, AxisInfo::Known(_))
    }

    pub fn as_known(&self) -> Option<&KnownAxis> {
        match self {
            AxisInfo::Known(k) => Some(k),
            AxisInfo::Unknown => None,
        }
    }

    /// Rank of a known fact.
    pub fn rank(&self) -> Option<usize> {
        self.as_known().map(KnownAxis::rank)
    }

    /// Exact constant, if known.
    pub fn constant(&self) -> Option<i64> {
        self.as_known().and_then(KnownAxis::constant)
    }

    /// Join two facts reaching the same value along different paths.
    ///
    /// An unknown side contributes nothing, so the other side is returned
    /// unchanged. Two known sides combine per dimension by `gcd`; the
    /// constant survives only if both sides agree on it. Merging two
    /// unknowns is a caller bug.
    pub fn merge(lhs: &AxisInfo, rhs: &AxisInfo) -> AxisInfo {
        debug_assert!(
            lhs.is_known() || rhs.is_known(),
            "merging two unknown axis facts"
        );
        match (lhs, rhs) {
            (AxisInfo::Known(l), AxisInfo::Known(r)) => AxisInfo::Known(l.join(r)),
            (AxisInfo::Known(_) | AxisInfo::Unknown, AxisInfo::Unknown) => lhs.clone(),
            (AxisInfo::Unknown, AxisInfo::Known(_)) => rhs.clone(),
        }
    }
}

impl From<KnownAxis> for AxisInfo {
    fn from(known: KnownAxis) -> Self {
        AxisInfo::Known(known)
    }
}

impl fmt::Display for KnownAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "contiguity = {:?}, divisibility = {:?}, constancy = {:?}, constant_value = ",
            self.contiguity.as_slice(),
            self.divisibility.as_slice(),
            self.constancy.as_slice(),
        )?;
        match self.constant {
            Some(c) => write!(f, "{c}"),
            None => f.write_str("<none>"),
        }
    }
}

impl fmt::Display for AxisInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisInfo::Known(k) => k.fmt(f),
            AxisInfo::Unknown => f.write_str("<unknown>"),
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;
