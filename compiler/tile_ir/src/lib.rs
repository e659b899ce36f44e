//! Kernel IR for the Tile compiler.
//!
//! This crate provides the program representation that kernel analyses
//! (axis-info, alignment, vectorization) run on:
//!
//! - **Ids** ([`ValueId`], [`BlockId`], [`OpRef`]): dense indices for values,
//!   blocks, and operation positions.
//!
//! - **Types** ([`Ty`], [`TensorTy`], [`ScalarTy`], [`Layout`]): scalars and
//!   ranked tensors with fixed extents. Tensors may carry a [`Layout`] that
//!   tells code generation which dimension is fastest-varying and how many
//!   elements each thread owns along it.
//!
//! - **Operations** ([`OpKind`], [`OpCode`], [`ConstValue`], [`CmpPredicate`]) -
//!   a closed set of operation kinds with their payloads.
//!
//! - **Functions** ([`Function`], [`Block`], [`Operation`], [`Terminator`],
//!   [`Param`]): SSA basic blocks with block arguments. The entry block's
//!   arguments are the function parameters and may carry divisibility hints.
//!
//! Functions are assembled with [`FunctionBuilder`] and checked with
//! [`verify`]. Parsing and printing are not part of this crate.

mod builder;
mod error;
mod func;
mod ids;
mod op;
mod ty;
mod verify;

pub use builder::FunctionBuilder;
pub use error::IrError;
pub use func::{Block, Function, Operation, Param, Terminator, Use, UseMap};
pub use ids::{BlockId, OpRef, ValueId};
pub use op::{CmpPredicate, ConstValue, OpCode, OpKind};
pub use ty::{Layout, ScalarTy, Shape, TensorTy, Ty};
pub use verify::verify;
