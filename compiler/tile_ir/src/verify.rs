//! Structural verification of kernel functions.
//!
//! Checks the invariants analyses rely on without re-checking them at
//! every step: every referenced block and value exists, every value is
//! defined once, operand/result counts match the operation kind, edge
//! argument counts match block parameters, entry parameters line up
//! with the function signature, and range bounds match their result type.

use rustc_hash::FxHashSet;

use crate::error::IrError;
use crate::func::{Function, Operation};
use crate::ids::ValueId;
use crate::op::OpKind;
use crate::ty::Ty;

/// Verify `func`, returning the first structural error found.
pub fn verify(func: &Function) -> Result<(), IrError> {
    if func.entry.index() >= func.blocks.len() {
        return Err(IrError::MissingEntry);
    }

    for (idx, block) in func.blocks.iter().enumerate() {
        if block.id.index() != idx {
            return Err(IrError::UnknownBlock(block.id));
        }
    }

    check_types(func)?;
    check_definitions(func)?;

    let entry_params: Vec<ValueId> = func.params.iter().map(|p| p.value).collect();
    if func.entry_block().params != entry_params {
        return Err(IrError::ParamMismatch);
    }
    for param in &func.params {
        if let Some(hint) = param.divisibility {
            if hint <= 0 {
                return Err(IrError::InvalidHint {
                    value: param.value,
                    hint,
                });
            }
        }
    }

    for block in &func.blocks {
        for op in &block.ops {
            let code = op.kind.code();
            if !op.kind.accepts_operands(op.operands.len()) {
                return Err(IrError::OperandCount {
                    op: code,
                    found: op.operands.len(),
                });
            }
            if let Some(expected) = op.kind.result_count() {
                if op.results.len() != expected {
                    return Err(IrError::ResultCount {
                        op: code,
                        expected,
                        found: op.results.len(),
                    });
                }
            }
            for &operand in &op.operands {
                check_value(func, operand)?;
            }
            check_range(func, op)?;
        }

        for value in block.terminator.used_values() {
            check_value(func, value)?;
        }
        for (target, args) in block.terminator.successors() {
            let Some(succ) = func.blocks.get(target.index()) else {
                return Err(IrError::UnknownBlock(target));
            };
            if succ.params.len() != args.len() {
                return Err(IrError::ArgumentCount {
                    target,
                    expected: succ.params.len(),
                    found: args.len(),
                });
            }
        }
    }

    Ok(())
}

fn check_value(func: &Function, value: ValueId) -> Result<(), IrError> {
    if value.index() < func.num_values() {
        Ok(())
    } else {
        Err(IrError::UnknownValue(value))
    }
}

fn check_types(func: &Function) -> Result<(), IrError> {
    for (idx, ty) in func.value_types.iter().enumerate() {
        if let Ty::Tensor(t) = ty {
            let bad_extent = t.shape.is_empty() || t.shape.iter().any(|&e| e <= 0);
            let bad_layout = t
                .layout
                .as_ref()
                .is_some_and(|l| !l.is_valid_for_rank(t.shape.len()));
            if bad_extent || bad_layout {
                let raw = u32::try_from(idx)
                    .unwrap_or_else(|_| panic!("value count exceeds u32::MAX"));
                return Err(IrError::InvalidType(ValueId::new(raw)));
            }
        }
    }
    Ok(())
}

/// `make_range(start, end)` must produce a 1-D tensor of exactly
/// `end - start` elements.
fn check_range(func: &Function, op: &Operation) -> Result<(), IrError> {
    let OpKind::MakeRange { start, end } = op.kind else {
        return Ok(());
    };
    let Some(&value) = op.results.first() else {
        return Ok(());
    };
    let extent = match func.value_type(value).as_tensor() {
        Some(t) if t.shape.len() == 1 => Some(t.shape[0]),
        _ => None,
    };
    let len = end.checked_sub(start).filter(|&len| len > 0);
    if len.is_some() && len == extent {
        Ok(())
    } else {
        Err(IrError::InvalidRange { value, start, end })
    }
}

/// Every value must be defined exactly once, as a block parameter or an
/// operation result.
fn check_definitions(func: &Function) -> Result<(), IrError> {
    let mut defined = FxHashSet::default();
    let mut define = |value: ValueId| {
        check_value(func, value)?;
        if defined.insert(value) {
            Ok(())
        } else {
            Err(IrError::DuplicateDefinition(value))
        }
    };

    for block in &func.blocks {
        for &param in &block.params {
            define(param)?;
        }
        for op in &block.ops {
            for &result in &op.results {
                define(result)?;
            }
        }
    }
    Ok(())
}
