use basalt_ir::{
    builder::test_util::test_func, inst::PhiAlt, BlockId, FuncRef, FunctionBuilder, Type,
};
use basalt_verifier::{
    debug_verify_func, verify_function, verify_function_or_panic, DiagnosticCode,
    VerificationLevel, VerifierConfig,
};
use cranelift_entity::EntityRef;

fn full() -> VerifierConfig {
    VerifierConfig::for_level(VerificationLevel::Full)
}

fn t(n: usize) -> Type {
    Type::new(n)
}

#[test]
fn valid_function_is_ok() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let arg0 = builder.append_arg(t(0), None);
    let entry = builder.append_block();
    let then_block = builder.append_block();
    let else_block = builder.append_block();
    let merge = builder.append_block();

    builder.je(entry, arg0, then_block, else_block);
    let v1 = builder.const_int(then_block, t(0), 1);
    builder.jmp(then_block, merge);
    let v2 = builder.const_int(else_block, t(0), 2);
    builder.jmp(else_block, merge);

    let alts = vec![PhiAlt::new(then_block, v1), PhiAlt::new(else_block, v2)];
    let phi = builder.phi(merge, None, t(0), alts).value();
    let call = builder.call(merge, None, FuncRef::new(0), t(0), 2);
    builder.set_arg(call, 0, phi).unwrap();
    builder.set_arg(call, 1, arg0).unwrap();
    builder.ret(merge, Some(call.value()));

    let report = verify_function(&ctx, &func, &full());
    assert!(report.is_ok(), "expected no verifier errors, got {report}");
    assert_eq!(report.to_string(), "verification succeeded");
}

#[test]
fn missing_terminator_is_reported() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let b0 = builder.append_block();
    let v0 = builder.const_int(b0, t(0), 1);
    builder.add(b0, None, v0, v0);

    let cfg = VerifierConfig::for_level(VerificationLevel::Standard);
    let report = verify_function(&ctx, &func, &cfg);
    assert!(
        report.has_code(DiagnosticCode::NonTerminatorAtEnd),
        "expected IR0203, got {report}"
    );
}

#[test]
fn empty_block_and_early_terminator() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let b0 = builder.append_block();
    let b1 = builder.append_block();
    builder.jmp(b0, b1);
    builder.ret(b0, None);

    let report = verify_function(&ctx, &func, &full());
    assert_eq!(
        report.codes(),
        [DiagnosticCode::TerminatorNotLast, DiagnosticCode::EmptyBlock]
    );
}

#[test]
fn phi_after_non_phi_is_reported() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let entry = builder.append_block();
    let body = builder.append_block();
    let v0 = builder.const_int(entry, t(0), 0);
    builder.jmp(entry, body);

    let v2 = builder.const_int(body, t(0), 7);
    let alts = vec![PhiAlt::new(entry, v0)];
    let phi = builder.phi(body, None, t(0), alts).value();
    builder.ret(body, Some(phi));

    let report = verify_function(&ctx, &func, &full());
    assert_eq!(report.codes(), [DiagnosticCode::PhiNotAtBlockTop]);

    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.primary.to_string(), format!("block1:{phi}"));
    assert_eq!(diagnostic.notes[0].message, format!("preceded by {v2}"));
    let context = diagnostic.context.as_ref().unwrap();
    assert_eq!(context.function_name.as_deref(), Some("%test_func"));
    assert_eq!(context.inst_text.as_deref(), Some("v3.t0 = phi (v0 block0)"));
}

#[test]
fn phi_incoming_must_match_preds() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let entry = builder.append_block();
    let other = builder.append_block();
    let merge = builder.append_block();
    let v0 = builder.const_int(entry, t(0), 0);
    builder.jmp(entry, merge);
    let v2 = builder.const_int(other, t(0), 1);
    builder.ret(other, None);

    let alts = vec![
        PhiAlt::new(entry, v0),
        PhiAlt::new(entry, v0),
        PhiAlt::new(other, v2),
    ];
    let phi = builder.phi(merge, None, t(0), alts).value();
    builder.ret(merge, Some(phi));

    let report = verify_function(&ctx, &func, &full());
    assert_eq!(
        report.codes(),
        [
            DiagnosticCode::PhiDuplicateIncomingBlock,
            DiagnosticCode::PhiHasNonPredIncoming,
            DiagnosticCode::PhiArgCountMismatchPreds,
        ]
    );
}

#[test]
fn phi_incoming_type_is_checked_above_fast() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let entry = builder.append_block();
    let merge = builder.append_block();
    let v0 = builder.const_int(entry, t(1), 0);
    builder.jmp(entry, merge);
    let phi = builder
        .phi(merge, None, t(0), vec![PhiAlt::new(entry, v0)])
        .value();
    builder.ret(merge, Some(phi));

    let report = verify_function(&ctx, &func, &full());
    assert!(
        report.has_code(DiagnosticCode::PhiIncomingTypeMismatch),
        "expected IR0405, got {report}"
    );

    let fast = VerifierConfig::for_level(VerificationLevel::Fast);
    assert!(verify_function(&ctx, &func, &fast).is_ok());
}

#[test]
fn unset_slots_depend_on_level() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let b0 = builder.append_block();
    let v0 = builder.const_int(b0, t(0), 3);
    let tup = builder.tup(b0, None, t(2), 3);
    builder.set_arg(tup, 1, v0).unwrap();
    builder.ret(b0, Some(tup.value()));

    let standard = VerifierConfig::for_level(VerificationLevel::Standard);
    let report = verify_function(&ctx, &func, &standard);
    assert_eq!(
        report.codes(),
        [DiagnosticCode::UnsetArgSlot, DiagnosticCode::UnsetArgSlot]
    );
    let notes: Vec<_> = report
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.notes[0].message.as_str())
        .collect();
    assert_eq!(notes, ["slot 0", "slot 2"]);

    let fast = VerifierConfig::for_level(VerificationLevel::Fast);
    assert!(verify_function(&ctx, &func, &fast).is_ok());
}

#[test]
fn broken_use_records_are_reported_at_full() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let b0 = builder.append_block();
    let v0 = builder.const_int(b0, t(0), 3);
    let v1 = builder.mul(b0, None, v0, v0).value();
    builder.ret(b0, Some(v1));

    func.dfg.remove_use(v0, v1).unwrap();

    let standard = VerifierConfig::for_level(VerificationLevel::Standard);
    assert!(verify_function(&ctx, &func, &standard).is_ok());

    let report = verify_function(&ctx, &func, &full());
    assert_eq!(report.codes(), [DiagnosticCode::UsersSetMismatch]);
    assert_eq!(
        report.diagnostics[0].notes[0].message,
        "v1 references v0 2 time(s), 1 record(s) found"
    );
}

#[test]
fn dangling_block_refs_stop_verification() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let b0 = builder.append_block();
    let v0 = builder.const_int(b0, t(0), 3);
    builder.phi(b0, None, t(0), vec![PhiAlt::new(BlockId::new(9), v0)]);

    let report = verify_function(&ctx, &func, &full());
    assert_eq!(report.codes(), [DiagnosticCode::InvalidBlockRef]);
    assert_eq!(report.diagnostics[0].notes[0].message, "target block9");
}

#[test]
fn diagnostics_are_capped() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);
    for _ in 0..5 {
        builder.append_block();
    }

    let mut cfg = full();
    cfg.max_diagnostics = 3;
    let report = verify_function(&ctx, &func, &cfg);
    assert_eq!(report.diagnostics.len(), 3);
    assert_eq!(report.omitted, 2);
    assert!(report
        .to_string()
        .ends_with("\n... 2 more diagnostic(s) omitted"));

    cfg.max_diagnostics = 0;
    let report = verify_function(&ctx, &func, &cfg);
    assert_eq!(report.errors().count(), 5);
    assert_eq!(report.omitted, 0);
    assert_eq!(report.with_code(DiagnosticCode::EmptyBlock).count(), 5);
}

#[test]
fn check_flags_toggle_passes() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let entry = builder.append_block();
    let merge = builder.append_block();
    let v0 = builder.const_int(entry, t(0), 0);
    let tup = builder.tup(entry, None, t(1), 1);
    builder.jmp(entry, merge);
    let alts = vec![PhiAlt::new(entry, v0), PhiAlt::new(entry, v0)];
    let phi = builder.phi(merge, None, t(0), alts).value();
    builder.ret(merge, Some(phi));
    let tup = tup.value();

    let mut cfg = full();
    let report = verify_function(&ctx, &func, &cfg);
    assert!(report.has_code(DiagnosticCode::UnsetArgSlot), "{report}");
    assert!(report.has_code(DiagnosticCode::PhiDuplicateIncomingBlock));
    assert_eq!(report.with_code(DiagnosticCode::UnsetArgSlot).count(), 1);
    let unset = report.with_code(DiagnosticCode::UnsetArgSlot).next().unwrap();
    assert_eq!(unset.primary.to_string(), format!("block0:{tup}"));

    cfg.check_slots = false;
    cfg.check_phis = false;
    assert!(verify_function(&ctx, &func, &cfg).is_ok());

    let mut fast = VerifierConfig::for_level(VerificationLevel::Fast);
    assert!(!fast.should_check_slots());
    fast.check_slots = true;
    let report = verify_function(&ctx, &func, &fast);
    assert!(report.has_code(DiagnosticCode::UnsetArgSlot));
}

#[test]
fn or_panic_accepts_valid_function() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let arg = builder.append_arg(t(0), None);
    let b0 = builder.append_block();
    let sum = builder.add(b0, None, arg, arg).value();
    builder.ret(b0, Some(sum));

    verify_function_or_panic(&ctx, &func, &full());
    debug_verify_func!(&ctx, &func);
}

#[test]
#[should_panic(expected = "BASALT_IR_VERIFY_FAILURE")]
fn or_panic_rejects_missing_terminator() {
    let (mut ctx, mut func) = test_func();
    let mut builder = FunctionBuilder::new(&mut ctx, &mut func);

    let b0 = builder.append_block();
    builder.const_int(b0, t(0), 1);

    verify_function_or_panic(&ctx, &func, &full());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "BASALT_IR_VERIFY_FAILURE")]
fn debug_verify_func_panics_on_empty_block() {
    let (mut ctx, mut func) = test_func();
    FunctionBuilder::new(&mut ctx, &mut func).append_block();

    debug_verify_func!(&ctx, &func);
}
