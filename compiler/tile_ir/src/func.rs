//! Functions, blocks, operations, and terminators.
//!
//! The structure follows the usual SSA basic-block shape: a function owns
//! blocks, a block owns a list of operations and exactly one terminator,
//! and values flowing across edges are passed as block arguments. Every
//! value is defined once, either as an operation result or as a block
//! parameter.

use smallvec::{smallvec, SmallVec};

use crate::ids::{BlockId, OpRef, ValueId};
use crate::op::OpKind;
use crate::ty::Ty;

/// A single operation: kind, ordered operands, ordered results.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operation {
    pub kind: OpKind,
    pub operands: Vec<ValueId>,
    pub results: Vec<ValueId>,
}

impl Operation {
    /// The first result, for single-result operations.
    pub fn result(&self) -> Option<ValueId> {
        self.results.first().copied()
    }
}

/// Block terminator: how control leaves a basic block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminator {
    /// Return from the kernel.
    Return { values: Vec<ValueId> },

    /// Unconditional jump, passing arguments to the target's parameters.
    Jump { target: BlockId, args: Vec<ValueId> },

    /// Conditional branch on a scalar boolean.
    Branch {
        cond: ValueId,
        then_block: BlockId,
        then_args: Vec<ValueId>,
        else_block: BlockId,
        else_args: Vec<ValueId>,
    },
}

impl Terminator {
    /// Returns all values read by this terminator.
    pub fn used_values(&self) -> Vec<ValueId> {
        match self {
            Terminator::Return { values } => values.clone(),
            Terminator::Jump { args, .. } => args.clone(),
            Terminator::Branch {
                cond,
                then_args,
                else_args,
                ..
            } => {
                let mut vals = Vec::with_capacity(1 + then_args.len() + else_args.len());
                vals.push(*cond);
                vals.extend_from_slice(then_args);
                vals.extend_from_slice(else_args);
                vals
            }
        }
    }

    /// Successor blocks paired with the arguments forwarded to each.
    ///
    /// A branch whose arms target the same block yields that block twice,
    /// once per edge.
    pub fn successors(&self) -> SmallVec<[(BlockId, &[ValueId]); 2]> {
        match self {
            Terminator::Return { .. } => SmallVec::new(),
            Terminator::Jump { target, args } => smallvec![(*target, args.as_slice())],
            Terminator::Branch {
                then_block,
                then_args,
                else_block,
                else_args,
                ..
            } => smallvec![
                (*then_block, then_args.as_slice()),
                (*else_block, else_args.as_slice()),
            ],
        }
    }
}

/// A basic block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub id: BlockId,
    /// Block parameters, bound from predecessor terminator arguments.
    pub params: Vec<ValueId>,
    pub ops: Vec<Operation>,
    pub terminator: Terminator,
}

/// A kernel parameter: an entry-block argument plus its hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub value: ValueId,
    /// Every element of the argument is a multiple of this (positive).
    pub divisibility: Option<i64>,
}

/// A complete kernel function.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    /// Parameters, in the same order as the entry block's `params`.
    pub params: Vec<Param>,
    /// Blocks in definition order. `blocks[entry.index()]` is the entry.
    pub blocks: Vec<Block>,
    pub entry: BlockId,
    /// Type of each value, indexed by `ValueId::index()`.
    pub value_types: Vec<Ty>,
}

impl Function {
    /// Look up the type of a value.
    ///
    /// # Panics
    ///
    /// Debug-panics if `value` is out of bounds.
    #[inline]
    pub fn value_type(&self, value: ValueId) -> &Ty {
        debug_assert!(
            value.index() < self.value_types.len(),
            "ValueId {} out of bounds (have {} values)",
            value.raw(),
            self.value_types.len(),
        );
        &self.value_types[value.index()]
    }

    /// Number of values defined in this function.
    pub fn num_values(&self) -> usize {
        self.value_types.len()
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn entry_block(&self) -> &Block {
        self.block(self.entry)
    }

    pub fn op(&self, at: OpRef) -> &Operation {
        &self.blocks[at.block.index()].ops[at.index as usize]
    }

    /// The parameter bound to `value`, if `value` is a kernel parameter.
    pub fn param(&self, value: ValueId) -> Option<&Param> {
        self.params.iter().find(|p| p.value == value)
    }

    /// The divisibility hint attached to `value`, if it is a hinted parameter.
    pub fn param_hint(&self, value: ValueId) -> Option<i64> {
        self.param(value).and_then(|p| p.divisibility)
    }

    /// Every operation position, in block order then body order.
    pub fn op_refs(&self) -> impl Iterator<Item = OpRef> + '_ {
        self.blocks.iter().flat_map(|block| {
            let len = u32::try_from(block.ops.len())
                .unwrap_or_else(|_| panic!("block body exceeds u32::MAX operations"));
            (0..len).map(move |i| OpRef::new(block.id, i))
        })
    }

    /// Compute the use lists of every value.
    pub fn users(&self) -> UseMap {
        let mut uses: Vec<SmallVec<[Use; 4]>> = vec![SmallVec::new(); self.num_values()];
        for at in self.op_refs() {
            for &operand in &self.op(at).operands {
                if let Some(list) = uses.get_mut(operand.index()) {
                    if !list.contains(&Use::Op(at)) {
                        list.push(Use::Op(at));
                    }
                }
            }
        }
        for block in &self.blocks {
            for value in block.terminator.used_values() {
                if let Some(list) = uses.get_mut(value.index()) {
                    let u = Use::Terminator(block.id);
                    if !list.contains(&u) {
                        list.push(u);
                    }
                }
            }
        }
        UseMap { uses }
    }
}

/// A place that reads a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Use {
    /// An operand of the operation at this position.
    Op(OpRef),
    /// An argument or condition of this block's terminator.
    Terminator(BlockId),
}

/// Deduplicated users of every value, indexed by `ValueId::index()`.
#[derive(Clone, Debug, Default)]
pub struct UseMap {
    uses: Vec<SmallVec<[Use; 4]>>,
}

impl UseMap {
    /// Users of `value`; empty for values nothing reads.
    pub fn get(&self, value: ValueId) -> &[Use] {
        self.uses.get(value.index()).map_or(&[], |u| u.as_slice())
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;
