//! Incremental construction of kernel functions.
//!
//! [`FunctionBuilder`] hands out fresh [`ValueId`]s and [`BlockId`]s,
//! infers result types for the common operation kinds, and verifies the
//! finished function. The entry block exists from the start and is the
//! current insertion block.

use smallvec::SmallVec;

use crate::error::IrError;
use crate::func::{Block, Function, Operation, Param, Terminator};
use crate::ids::{BlockId, ValueId};
use crate::op::{CmpPredicate, ConstValue, OpKind};
use crate::ty::{ScalarTy, TensorTy, Ty};
use crate::verify::verify;

struct PendingBlock {
    params: Vec<ValueId>,
    ops: Vec<Operation>,
    terminator: Option<Terminator>,
}

impl PendingBlock {
    fn new() -> Self {
        Self {
            params: Vec::new(),
            ops: Vec::new(),
            terminator: None,
        }
    }
}

/// Builder for a [`Function`].
pub struct FunctionBuilder {
    name: String,
    params: Vec<Param>,
    blocks: Vec<PendingBlock>,
    value_types: Vec<Ty>,
    current: BlockId,
}

impl FunctionBuilder {
    /// Start a function with an empty entry block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            blocks: vec![PendingBlock::new()],
            value_types: Vec::new(),
            current: BlockId::new(0),
        }
    }

    fn fresh_value(&mut self, ty: Ty) -> ValueId {
        let id = u32::try_from(self.value_types.len())
            .unwrap_or_else(|_| panic!("value count exceeds u32::MAX"));
        self.value_types.push(ty);
        ValueId::new(id)
    }

    /// Type of an already-created value.
    ///
    /// # Panics
    ///
    /// Panics if `value` was not created by this builder.
    pub fn value_type(&self, value: ValueId) -> &Ty {
        &self.value_types[value.index()]
    }

    /// Add a kernel parameter without hints.
    pub fn param(&mut self, ty: Ty) -> ValueId {
        self.add_param(ty, None)
    }

    /// Add a kernel parameter whose elements are all multiples of `divisibility`.
    pub fn param_with_divisibility(&mut self, ty: Ty, divisibility: i64) -> ValueId {
        self.add_param(ty, Some(divisibility))
    }

    fn add_param(&mut self, ty: Ty, divisibility: Option<i64>) -> ValueId {
        let value = self.fresh_value(ty);
        self.params.push(Param {
            value,
            divisibility,
        });
        self.blocks[0].params.push(value);
        value
    }

    /// Append a new, empty block. The insertion point does not move.
    pub fn new_block(&mut self) -> BlockId {
        let id = u32::try_from(self.blocks.len())
            .unwrap_or_else(|_| panic!("block count exceeds u32::MAX"));
        self.blocks.push(PendingBlock::new());
        BlockId::new(id)
    }

    /// Add a parameter to a non-entry block.
    pub fn block_param(&mut self, block: BlockId, ty: Ty) -> ValueId {
        debug_assert_ne!(block.index(), 0, "entry parameters are added with `param`");
        let value = self.fresh_value(ty);
        self.blocks[block.index()].params.push(value);
        value
    }

    /// Move the insertion point to the end of `block`.
    pub fn switch_to(&mut self, block: BlockId) {
        self.current = block;
    }

    pub fn current_block(&self) -> BlockId {
        self.current
    }

    /// Append an operation with explicit result types.
    pub fn push(
        &mut self,
        kind: OpKind,
        operands: &[ValueId],
        result_tys: Vec<Ty>,
    ) -> Vec<ValueId> {
        let results: Vec<ValueId> = result_tys
            .into_iter()
            .map(|ty| self.fresh_value(ty))
            .collect();
        self.blocks[self.current.index()].ops.push(Operation {
            kind,
            operands: operands.to_vec(),
            results: results.clone(),
        });
        results
    }

    /// Append a single-result operation.
    pub fn emit(&mut self, kind: OpKind, operands: &[ValueId], result_ty: Ty) -> ValueId {
        let value = self.fresh_value(result_ty);
        self.blocks[self.current.index()].ops.push(Operation {
            kind,
            operands: operands.to_vec(),
            results: vec![value],
        });
        value
    }

    // ── Typed helpers ───────────────────────────────────────────

    /// `[start, end)` as a 1-D `i32` tensor.
    ///
    /// Empty, reversed, or overflowing bounds still get a well-formed
    /// result type; `finish` rejects them with [`IrError::InvalidRange`].
    pub fn make_range(&mut self, start: i64, end: i64) -> ValueId {
        let len = end.saturating_sub(start).max(1);
        self.emit(
            OpKind::MakeRange { start, end },
            &[],
            Ty::tensor(&[len], ScalarTy::I32),
        )
    }

    /// A scalar or splat constant of type `ty`.
    pub fn constant(&mut self, value: ConstValue, ty: Ty) -> ValueId {
        self.emit(OpKind::Constant(value), &[], ty)
    }

    /// A scalar `i32` constant.
    pub fn const_i32(&mut self, value: i64) -> ValueId {
        self.constant(ConstValue::Int(value), Ty::Scalar(ScalarTy::I32))
    }

    /// A scalar `i1` constant.
    pub fn const_bool(&mut self, value: bool) -> ValueId {
        self.constant(ConstValue::Bool(value), Ty::Scalar(ScalarTy::I1))
    }

    /// A binary arithmetic or bitwise operation; the result has `lhs`'s type.
    pub fn binary(&mut self, kind: OpKind, lhs: ValueId, rhs: ValueId) -> ValueId {
        let ty = self.value_type(lhs).clone();
        self.emit(kind, &[lhs, rhs], ty)
    }

    /// Integer comparison; the result is `i1` with `lhs`'s shape and layout.
    pub fn cmp(&mut self, predicate: CmpPredicate, lhs: ValueId, rhs: ValueId) -> ValueId {
        let ty = with_elem(self.value_type(lhs), ScalarTy::I1);
        self.emit(OpKind::CmpI { predicate }, &[lhs, rhs], ty)
    }

    /// `select(cond, on_true, on_false)`; the result has `on_true`'s type.
    pub fn select(&mut self, cond: ValueId, on_true: ValueId, on_false: ValueId) -> ValueId {
        let ty = self.value_type(on_true).clone();
        self.emit(OpKind::Select, &[cond, on_true, on_false], ty)
    }

    /// Broadcast a scalar to a tensor of `shape`.
    pub fn splat(&mut self, value: ValueId, shape: &[i64]) -> ValueId {
        let ty = Ty::tensor(shape, self.value_type(value).elem());
        self.emit(OpKind::Splat, &[value], ty)
    }

    /// Insert a size-1 dimension at `axis`.
    pub fn expand_dims(&mut self, value: ValueId, axis: u32) -> ValueId {
        let src = self.value_type(value);
        let mut shape = src.shape();
        let at = (axis as usize).min(shape.len());
        shape.insert(at, 1);
        let ty = Ty::tensor(&shape, src.elem());
        self.emit(OpKind::ExpandDims { axis }, &[value], ty)
    }

    /// Broadcast size-1 dimensions of `value` to `shape`.
    pub fn broadcast(&mut self, value: ValueId, shape: &[i64]) -> ValueId {
        let ty = Ty::tensor(shape, self.value_type(value).elem());
        self.emit(OpKind::Broadcast, &[value], ty)
    }

    /// A value-preserving cast to `ty`.
    pub fn cast(&mut self, kind: OpKind, value: ValueId, ty: Ty) -> ValueId {
        debug_assert!(kind.is_identity_cast(), "{kind:?} is not a cast");
        self.emit(kind, &[value], ty)
    }

    /// `store(ptr, value [, mask])`.
    pub fn store(&mut self, ptr: ValueId, value: ValueId, mask: Option<ValueId>) {
        let mut operands: SmallVec<[ValueId; 3]> = SmallVec::from_slice(&[ptr, value]);
        operands.extend(mask);
        self.push(OpKind::Store, &operands, Vec::new());
    }

    /// `load(ptr [, mask])` producing a value of type `ty`.
    pub fn load(&mut self, ptr: ValueId, mask: Option<ValueId>, ty: Ty) -> ValueId {
        let mut operands: SmallVec<[ValueId; 3]> = SmallVec::from_slice(&[ptr]);
        operands.extend(mask);
        self.emit(OpKind::Load, &operands, ty)
    }

    // ── Terminators ─────────────────────────────────────────────

    fn terminate(&mut self, terminator: Terminator) {
        let block = &mut self.blocks[self.current.index()];
        debug_assert!(
            block.terminator.is_none(),
            "block {} is already terminated",
            self.current
        );
        block.terminator = Some(terminator);
    }

    pub fn ret(&mut self, values: &[ValueId]) {
        self.terminate(Terminator::Return {
            values: values.to_vec(),
        });
    }

    pub fn jump(&mut self, target: BlockId, args: &[ValueId]) {
        self.terminate(Terminator::Jump {
            target,
            args: args.to_vec(),
        });
    }

    pub fn branch(
        &mut self,
        cond: ValueId,
        then_block: BlockId,
        then_args: &[ValueId],
        else_block: BlockId,
        else_args: &[ValueId],
    ) {
        self.terminate(Terminator::Branch {
            cond,
            then_block,
            then_args: then_args.to_vec(),
            else_block,
            else_args: else_args.to_vec(),
        });
    }

    /// Assemble and verify the function.
    pub fn finish(self) -> Result<Function, IrError> {
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for (idx, pending) in self.blocks.into_iter().enumerate() {
            let raw =
                u32::try_from(idx).unwrap_or_else(|_| panic!("block count exceeds u32::MAX"));
            let id = BlockId::new(raw);
            let terminator = pending.terminator.ok_or(IrError::UnterminatedBlock(id))?;
            blocks.push(Block {
                id,
                params: pending.params,
                ops: pending.ops,
                terminator,
            });
        }

        let func = Function {
            name: self.name,
            params: self.params,
            blocks,
            entry: BlockId::new(0),
            value_types: self.value_types,
        };
        verify(&func)?;
        Ok(func)
    }
}

/// `ty` with its element type replaced, keeping shape and layout.
fn with_elem(ty: &Ty, elem: ScalarTy) -> Ty {
    match ty {
        Ty::Scalar(_) => Ty::Scalar(elem),
        Ty::Tensor(t) => Ty::Tensor(TensorTy {
            shape: t.shape.clone(),
            elem,
            layout: t.layout.clone(),
        }),
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;
