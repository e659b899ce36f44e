//! Value types: scalars, ranked tensors, and tensor layouts.

use smallvec::{smallvec, SmallVec};

/// Per-dimension extents of a tensor. Kernels rarely exceed rank 4.
pub type Shape = SmallVec<[i64; 4]>;

/// Element type of a scalar or tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarTy {
    /// Fixed-width integer. `bits == 1` is the boolean type.
    Int { bits: u8 },
    /// Target index type.
    Index,
    /// IEEE float.
    Float { bits: u8 },
    /// Global memory pointer.
    Ptr,
}

impl ScalarTy {
    pub const I1: ScalarTy = ScalarTy::Int { bits: 1 };
    pub const I32: ScalarTy = ScalarTy::Int { bits: 32 };
    pub const I64: ScalarTy = ScalarTy::Int { bits: 64 };
    pub const F32: ScalarTy = ScalarTy::Float { bits: 32 };

    /// Returns `true` for integer, boolean, and index types.
    pub fn is_integer(self) -> bool {
        matches!(self, ScalarTy::Int { .. } | ScalarTy::Index)
    }
}

/// Distribution of a tensor across threads.
///
/// `order` lists dimensions from fastest-varying to slowest (most
/// contiguous first). `size_per_thread[d]` is how many consecutive
/// elements along dimension `d` one thread owns. Code generation reads
/// both at `order[0]` to pick memory access widths.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    order: SmallVec<[u32; 4]>,
    size_per_thread: SmallVec<[u32; 4]>,
}

impl Layout {
    /// A blocked layout with explicit per-thread sizes and dimension order.
    pub fn blocked(size_per_thread: &[u32], order: &[u32]) -> Self {
        Self {
            order: SmallVec::from_slice(order),
            size_per_thread: SmallVec::from_slice(size_per_thread),
        }
    }

    /// Row-major order (last dimension fastest), one element per thread.
    pub fn default_for_rank(rank: usize) -> Self {
        #[expect(clippy::cast_possible_truncation, reason = "tensor rank fits u32")]
        let order = (0..rank).rev().map(|d| d as u32).collect();
        Self {
            order,
            size_per_thread: smallvec![1; rank],
        }
    }

    /// Dimension order, most contiguous first.
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    /// Elements owned by one thread, per dimension.
    pub fn size_per_thread(&self) -> &[u32] {
        &self.size_per_thread
    }

    /// The most contiguous dimension (`order[0]`), if the layout has any.
    pub fn preferred_dim(&self) -> Option<usize> {
        self.order.first().map(|&d| d as usize)
    }

    /// Elements one thread owns along `dim`; 1 when `dim` is out of range.
    pub fn elements_per_thread(&self, dim: usize) -> u32 {
        self.size_per_thread.get(dim).copied().unwrap_or(1)
    }

    /// Returns `true` if `order` is a permutation of `0..rank` and
    /// `size_per_thread` has one positive entry per dimension.
    pub fn is_valid_for_rank(&self, rank: usize) -> bool {
        if self.order.len() != rank || self.size_per_thread.len() != rank {
            return false;
        }
        let mut seen: SmallVec<[bool; 4]> = smallvec![false; rank];
        for &d in &self.order {
            let d = d as usize;
            if d >= rank || seen[d] {
                return false;
            }
            seen[d] = true;
        }
        self.size_per_thread.iter().all(|&n| n > 0)
    }
}

/// A ranked tensor type with fixed extents.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TensorTy {
    pub shape: Shape,
    pub elem: ScalarTy,
    pub layout: Option<Layout>,
}

/// The type of a program value.
///
/// Scalars behave like rank-1 values of extent 1 for every per-dimension
/// query, so analyses can treat both uniformly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ty {
    Scalar(ScalarTy),
    Tensor(TensorTy),
}

impl Ty {
    /// A tensor without a layout.
    pub fn tensor(shape: &[i64], elem: ScalarTy) -> Self {
        Ty::Tensor(TensorTy {
            shape: SmallVec::from_slice(shape),
            elem,
            layout: None,
        })
    }

    /// A tensor distributed with `layout`.
    pub fn tensor_with_layout(shape: &[i64], elem: ScalarTy, layout: Layout) -> Self {
        Ty::Tensor(TensorTy {
            shape: SmallVec::from_slice(shape),
            elem,
            layout: Some(layout),
        })
    }

    /// Number of dimensions. Scalars have rank 1.
    pub fn rank(&self) -> usize {
        match self {
            Ty::Scalar(_) => 1,
            Ty::Tensor(t) => t.shape.len(),
        }
    }

    /// Per-dimension extents. Scalars have shape `[1]`.
    pub fn shape(&self) -> Shape {
        match self {
            Ty::Scalar(_) => smallvec![1],
            Ty::Tensor(t) => t.shape.clone(),
        }
    }

    /// Extent of dimension `dim`, or 1 when out of range.
    pub fn extent(&self, dim: usize) -> i64 {
        match self {
            Ty::Scalar(_) => 1,
            Ty::Tensor(t) => t.shape.get(dim).copied().unwrap_or(1),
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, Ty::Tensor(_))
    }

    pub fn as_tensor(&self) -> Option<&TensorTy> {
        match self {
            Ty::Tensor(t) => Some(t),
            Ty::Scalar(_) => None,
        }
    }

    /// Element type (the scalar itself for scalars).
    pub fn elem(&self) -> ScalarTy {
        match self {
            Ty::Scalar(s) => *s,
            Ty::Tensor(t) => t.elem,
        }
    }

    /// The tensor layout, if this is a tensor that carries one.
    pub fn layout(&self) -> Option<&Layout> {
        self.as_tensor().and_then(|t| t.layout.as_ref())
    }
}
