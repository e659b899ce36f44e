use pretty_assertions::assert_eq;

use crate::{
    BlockId, CmpPredicate, FunctionBuilder, IrError, Layout, OpKind, ScalarTy, Ty,
};

#[test]
fn entry_block_holds_params() {
    let mut b = FunctionBuilder::new("k");
    let p = b.param_with_divisibility(Ty::Scalar(ScalarTy::Ptr), 16);
    b.ret(&[]);
    let func = b.finish().unwrap();

    assert_eq!(func.entry, BlockId::new(0));
    assert_eq!(func.entry_block().params, vec![p]);
    assert_eq!(func.params[0].divisibility, Some(16));
}

#[test]
fn unterminated_block_fails_to_finish() {
    let mut b = FunctionBuilder::new("k");
    let dangling = b.new_block();
    b.jump(dangling, &[]);
    assert_eq!(b.finish().unwrap_err(), IrError::UnterminatedBlock(dangling));
}

#[test]
fn range_type_has_range_length() {
    let mut b = FunctionBuilder::new("k");
    let r = b.make_range(4, 12);
    b.ret(&[r]);
    let func = b.finish().unwrap();
    assert_eq!(func.value_type(r), &Ty::tensor(&[8], ScalarTy::I32));
}

#[test]
fn bad_range_bounds_fail_to_finish() {
    for (start, end) in [(0, 0), (8, 4), (i64::MIN, i64::MAX)] {
        let mut b = FunctionBuilder::new("k");
        let r = b.make_range(start, end);
        b.ret(&[r]);
        assert_eq!(
            b.finish().unwrap_err(),
            IrError::InvalidRange {
                value: r,
                start,
                end
            }
        );
    }
}

#[test]
fn cmp_keeps_shape_and_layout() {
    let layout = Layout::blocked(&[4], &[0]);
    let mut b = FunctionBuilder::new("k");
    let x = b.param(Ty::tensor_with_layout(&[64], ScalarTy::I32, layout.clone()));
    let y = b.param(Ty::tensor_with_layout(&[64], ScalarTy::I32, layout.clone()));
    let m = b.cmp(CmpPredicate::Slt, x, y);
    b.ret(&[m]);
    let func = b.finish().unwrap();
    assert_eq!(
        func.value_type(m),
        &Ty::tensor_with_layout(&[64], ScalarTy::I1, layout)
    );
}

#[test]
fn shape_helpers_compute_result_types() {
    let mut b = FunctionBuilder::new("k");
    let r = b.make_range(0, 32);
    let e = b.expand_dims(r, 0);
    let bc = b.broadcast(e, &[16, 32]);
    let s = b.const_i32(3);
    let sp = b.splat(s, &[16, 32]);
    let sum = b.binary(OpKind::AddI, bc, sp);
    b.ret(&[sum]);
    let func = b.finish().unwrap();

    assert_eq!(func.value_type(e), &Ty::tensor(&[1, 32], ScalarTy::I32));
    assert_eq!(func.value_type(bc), &Ty::tensor(&[16, 32], ScalarTy::I32));
    assert_eq!(func.value_type(sp), &Ty::tensor(&[16, 32], ScalarTy::I32));
    assert_eq!(func.value_type(sum), &Ty::tensor(&[16, 32], ScalarTy::I32));
}

#[test]
fn store_and_load_operands() {
    let mut b = FunctionBuilder::new("k");
    let p = b.param(Ty::tensor(&[8], ScalarTy::Ptr));
    let m = b.const_bool(true);
    let x = b.load(p, Some(m), Ty::tensor(&[8], ScalarTy::F32));
    b.store(p, x, None);
    b.ret(&[]);
    let func = b.finish().unwrap();

    let ops = &func.entry_block().ops;
    assert_eq!(ops[1].operands, vec![p, m]);
    assert_eq!(ops[2].operands, vec![p, x]);
    assert!(ops[2].results.is_empty());
}

#[test]
fn loop_with_block_params_verifies() {
    let mut b = FunctionBuilder::new("loop");
    let n = b.param(Ty::Scalar(ScalarTy::I32));
    let zero = b.const_i32(0);
    let header = b.new_block();
    let exit = b.new_block();
    let i = b.block_param(header, Ty::Scalar(ScalarTy::I32));
    b.jump(header, &[zero]);

    b.switch_to(header);
    let one = b.const_i32(1);
    let next = b.binary(OpKind::AddI, i, one);
    let cond = b.cmp(CmpPredicate::Slt, next, n);
    b.branch(cond, header, &[next], exit, &[]);

    b.switch_to(exit);
    b.ret(&[]);
    assert!(b.finish().is_ok());
}
