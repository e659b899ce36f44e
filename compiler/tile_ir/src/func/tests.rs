use pretty_assertions::assert_eq;

use crate::{BlockId, FunctionBuilder, OpKind, OpRef, ScalarTy, Terminator, Ty, Use, ValueId};

fn i32_ty() -> Ty {
    Ty::Scalar(ScalarTy::I32)
}

#[test]
fn users_cover_operands_and_terminators() {
    // entry(%0):
    //   %1 = const 4
    //   %2 = addi %0, %1
    //   jump ^bb1(%2)
    // ^bb1(%3):
    //   return %3
    let mut b = FunctionBuilder::new("users");
    let x = b.param(i32_ty());
    let four = b.const_i32(4);
    let sum = b.binary(OpKind::AddI, x, four);
    let exit = b.new_block();
    let p = b.block_param(exit, i32_ty());
    b.jump(exit, &[sum]);
    b.switch_to(exit);
    b.ret(&[p]);
    let func = b.finish().unwrap();

    let users = func.users();
    assert_eq!(users.get(x), &[Use::Op(OpRef::new(BlockId::new(0), 1))]);
    assert_eq!(users.get(four), &[Use::Op(OpRef::new(BlockId::new(0), 1))]);
    assert_eq!(users.get(sum), &[Use::Terminator(BlockId::new(0))]);
    assert_eq!(users.get(p), &[Use::Terminator(exit)]);
    assert!(users.get(ValueId::new(99)).is_empty());
}

#[test]
fn repeated_operand_is_one_use() {
    let mut b = FunctionBuilder::new("square");
    let x = b.param(i32_ty());
    let sq = b.binary(OpKind::MulI, x, x);
    b.ret(&[sq]);
    let func = b.finish().unwrap();

    assert_eq!(func.users().get(x).len(), 1);
}

#[test]
fn op_refs_walk_blocks_in_order() {
    let mut b = FunctionBuilder::new("walk");
    let c = b.const_i32(1);
    let next = b.new_block();
    b.jump(next, &[]);
    b.switch_to(next);
    let d = b.const_i32(2);
    let e = b.binary(OpKind::AddI, c, d);
    b.ret(&[e]);
    let func = b.finish().unwrap();

    let refs: Vec<OpRef> = func.op_refs().collect();
    assert_eq!(
        refs,
        vec![
            OpRef::new(BlockId::new(0), 0),
            OpRef::new(next, 0),
            OpRef::new(next, 1),
        ]
    );
    assert_eq!(func.op(refs[2]).result(), Some(e));
}

#[test]
fn branch_successors_carry_their_arguments() {
    let t = Terminator::Branch {
        cond: ValueId::new(0),
        then_block: BlockId::new(1),
        then_args: vec![ValueId::new(1)],
        else_block: BlockId::new(2),
        else_args: vec![],
    };
    let succs = t.successors();
    assert_eq!(succs.len(), 2);
    assert_eq!(succs[0], (BlockId::new(1), &[ValueId::new(1)][..]));
    assert_eq!(succs[1], (BlockId::new(2), &[][..]));
    assert_eq!(t.used_values(), vec![ValueId::new(0), ValueId::new(1)]);
}

#[test]
fn param_hints_are_looked_up_by_value() {
    let mut b = FunctionBuilder::new("hints");
    let ptr = b.param_with_divisibility(Ty::Scalar(ScalarTy::Ptr), 16);
    let n = b.param(i32_ty());
    b.ret(&[]);
    let func = b.finish().unwrap();

    assert_eq!(func.param_hint(ptr), Some(16));
    assert_eq!(func.param_hint(n), None);
    assert!(func.param(n).is_some());
    assert_eq!(func.entry_block().params, vec![ptr, n]);
}
