//! Converged facts and the alignment queries code generation asks of them.

use std::borrow::Cow;
use std::fmt::Write as _;

use tile_ir::{Function, Layout, TensorTy, ValueId};

use crate::driver::AnalysisStats;
use crate::lattice::{AxisInfo, KnownAxis};

/// The fact of every value in one analyzed function, indexed by
/// `ValueId::index()`. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisFacts {
    facts: Vec<AxisInfo>,
    stats: AnalysisStats,
}

impl AxisFacts {
    pub(crate) fn new(facts: Vec<AxisInfo>, stats: AnalysisStats) -> Self {
        Self { facts, stats }
    }

    /// Fact of `value`. Out-of-range ids and values never reached read as
    /// `Unknown`.
    pub fn get(&self, value: ValueId) -> &AxisInfo {
        const UNKNOWN: &AxisInfo = &AxisInfo::Unknown;
        self.facts.get(value.index()).unwrap_or(UNKNOWN)
    }

    /// `(value, fact)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ValueId, &AxisInfo)> + '_ {
        self.facts.iter().enumerate().map(|(i, fact)| {
            let raw = u32::try_from(i).unwrap_or_else(|_| panic!("value count exceeds u32::MAX"));
            (ValueId::new(raw), fact)
        })
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn stats(&self) -> AnalysisStats {
        self.stats
    }

    /// Largest alignment, in elements, guaranteed for accesses through
    /// `ptr` along its most contiguous dimension.
    pub fn pointer_alignment(&self, func: &Function, ptr: ValueId) -> u32 {
        self.along_preferred(func, ptr).map_or(1, |(fact, _, dim)| {
            saturate(fact.divisibility(dim).min(fact.contiguity(dim)))
        })
    }

    /// Widest vector access through `ptr` one thread can issue: the
    /// alignment, capped by the elements the thread owns and the extent.
    pub fn vector_size(&self, func: &Function, ptr: ValueId) -> u32 {
        let Some((fact, tensor, dim)) = self.along_preferred(func, ptr) else {
            return 1;
        };
        let alignment = saturate(fact.divisibility(dim).min(fact.contiguity(dim)));
        let per_thread = layout_of(tensor).elements_per_thread(dim);
        let extent = saturate(tensor.shape.get(dim).copied().unwrap_or(1));
        alignment.min(per_thread).min(extent).max(1)
    }

    /// Run length over which `mask` is guaranteed uniform along its most
    /// contiguous dimension.
    pub fn mask_alignment(&self, func: &Function, mask: ValueId) -> u32 {
        self.along_preferred(func, mask)
            .map_or(1, |(fact, _, dim)| saturate(fact.constancy(dim)).max(1))
    }

    /// Known fact, tensor type, and preferred dimension of `value`; `None`
    /// for scalars, unknown values, and layouts that name no usable
    /// dimension.
    fn along_preferred<'a>(
        &'a self,
        func: &'a Function,
        value: ValueId,
    ) -> Option<(&'a KnownAxis, &'a TensorTy, usize)> {
        let tensor = func.value_type(value).as_tensor()?;
        let fact = self.get(value).as_known()?;
        let dim = layout_of(tensor).preferred_dim()?;
        (dim < fact.rank()).then_some((fact, tensor, dim))
    }

    /// One line per value of `func`, `%N: <fact>`.
    pub fn dump(&self, func: &Function) -> String {
        let mut out = String::new();
        for i in 0..func.num_values() {
            let raw = u32::try_from(i).unwrap_or_else(|_| panic!("value count exceeds u32::MAX"));
            let value = ValueId::new(raw);
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{value}: {}", self.get(value));
        }
        out
    }
}

/// The tensor's layout, or the default one (last dimension fastest, one
/// element per thread) when it carries none.
fn layout_of(tensor: &TensorTy) -> Cow<'_, Layout> {
    match &tensor.layout {
        Some(layout) => Cow::Borrowed(layout),
        None => Cow::Owned(Layout::default_for_rank(tensor.shape.len())),
    }
}

fn saturate(n: i64) -> u32 {
    u32::try_from(n.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
