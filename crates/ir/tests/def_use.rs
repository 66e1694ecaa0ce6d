use basalt_ir::{
    builder::test_util::{dump_func, test_func},
    inst::{Add, PhiAlt},
    is_terminating, DataFlowGraph, FunctionBuilder, Type, ValueId, ValueKind,
};
use cranelift_entity::EntityRef;
use proptest::prelude::*;
use rustc_hash::FxHashMap;

/// Every operand reference must have exactly one use record and vice versa.
fn assert_use_symmetry(dfg: &DataFlowGraph) {
    let mut expected: FxHashMap<(ValueId, ValueId), usize> = FxHashMap::default();
    for (_, block) in dfg.blocks() {
        for &inst in block.insts() {
            if let Some(data) = dfg.inst_data(inst) {
                data.for_each_operand(|value| *expected.entry((value, inst)).or_default() += 1);
            }
        }
    }

    let mut recorded: FxHashMap<(ValueId, ValueId), usize> = FxHashMap::default();
    for (value, data) in dfg.values() {
        for u in data.uses() {
            assert_eq!(u.value, value);
            *recorded.entry((value, u.user)).or_default() += 1;
        }
    }

    assert_eq!(expected, recorded);
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize, usize),
    Mul(usize, usize),
    Tup(Vec<usize>),
    Replace(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Add(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Mul(a, b)),
        prop::collection::vec(any::<usize>(), 0..4).prop_map(Op::Tup),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Replace(a, b)),
    ]
}

proptest! {
    #[test]
    fn uses_stay_symmetric(ops in prop::collection::vec(op(), 1..24)) {
        let (mut ctx, mut func) = test_func();
        let mut builder = FunctionBuilder::new(&mut ctx, &mut func);
        let ty = Type::new(0);

        let b0 = builder.append_block();
        let mut defs = vec![builder.append_arg(ty, None), builder.append_arg(ty, None)];
        let mut replace_plan = Vec::new();

        for op in ops {
            let pick = |idx: usize| defs[idx % defs.len()];
            match op {
                Op::Add(a, b) => {
                    let (a, b) = (pick(a), pick(b));
                    defs.push(builder.add(b0, None, a, b).value());
                }
                Op::Mul(a, b) => {
                    let (a, b) = (pick(a), pick(b));
                    defs.push(builder.mul(b0, None, a, b).value());
                }
                Op::Tup(fields) => {
                    let tup = builder.tup(b0, None, ty, fields.len());
                    for (idx, field) in fields.iter().enumerate() {
                        builder.set_arg(tup, idx, pick(*field)).unwrap();
                    }
                    defs.push(tup.value());
                }
                Op::Replace(a, b) => replace_plan.push((pick(a), pick(b))),
            }
        }
        builder.ret(b0, defs.last().copied());

        assert_use_symmetry(&func.dfg);
        for (old, new) in replace_plan {
            func.dfg.replace_all_uses(old, new).unwrap();
            assert_use_symmetry(&func.dfg);
        }
    }
}

#[test]
fn replace_all_uses_redirects_every_user() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);
    let ty = Type::new(0);

    let a = builder.append_arg(ty, None);
    let b = builder.append_arg(ty, None);
    let b0 = builder.append_block();
    let v2 = builder.add(b0, None, a, a).value();
    let v3 = builder.sub(b0, None, v2, a).value();
    builder.ret(b0, Some(v3));

    assert_eq!(func.dfg.replace_all_uses(a, b), Ok(3));
    assert_eq!(func.dfg.users_num(a), 0);
    assert_eq!(func.dfg.users(b).collect::<Vec<_>>(), [v2, v2, v3]);
    assert_eq!(
        dump_func(&ctx, &func),
        "func %test_func(v0.t0, v1.t0):
    block0:
        v2.t0 = add v1 v1
        v3.t0 = sub v2 v1
        ret v3
"
    );
}

#[test]
fn phi_block_uses_follow_replacement() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);
    let ty = Type::new(0);

    let entry = builder.append_block();
    let merge = builder.append_block();
    let v0 = builder.const_int(entry, ty, 1);
    let v1 = builder.const_int(entry, ty, 2);
    builder.jmp(entry, merge);
    let phi = builder.phi(merge, None, ty, vec![PhiAlt::new(entry, v0)]).value();
    builder.ret(merge, Some(phi));

    assert_eq!(func.dfg.block_users(v0), &[entry]);
    assert_eq!(func.dfg.replace_operand(phi, v0, v1), Ok(1));
    assert!(func.dfg.block_users(v0).is_empty());
    assert_eq!(func.dfg.block_users(v1), &[entry]);
    assert_use_symmetry(&func.dfg);
}

#[test]
fn blocks_end_in_exactly_one_terminator() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);
    let ty = Type::new(0);

    let arg = builder.append_arg(ty, None);
    let entry = builder.append_block();
    let exit = builder.append_block();
    let sum = builder.add(entry, None, arg, arg).value();
    builder.je(entry, sum, exit, exit);
    builder.ret(exit, Some(sum));

    assert_eq!(func.dfg.block(exit).preds(), &[entry, entry]);
    for block in func.blocks() {
        let insts = func.dfg.block(block).insts();
        let kinds: Vec<ValueKind> = insts.iter().map(|v| func.dfg.value_kind(*v)).collect();
        let (last, body) = kinds.split_last().unwrap();
        assert!(is_terminating(*last));
        assert!(body.iter().all(|kind| !is_terminating(*kind)));
    }

    assert!(func.dfg.downcast::<Add>(sum).is_some());
}
