use basalt_ir::{BlockId, Context, FuncWriter, Function, ValueId};
use tracing::debug;

use crate::{
    diagnostic::{Diagnostic, DiagnosticContext, Location},
    report::VerificationReport,
    VerifierConfig,
};

mod layout;
mod phi;
mod slots;
mod users;

pub fn verify_function(ctx: &Context, func: &Function, cfg: &VerifierConfig) -> VerificationReport {
    let mut verifier = FunctionVerifier::new(ctx, func, cfg);
    verifier.run();
    debug!(
        func = %func.name,
        diagnostics = verifier.report.diagnostics.len(),
        "verified function"
    );
    verifier.report
}

pub fn verify_function_or_panic(ctx: &Context, func: &Function, cfg: &VerifierConfig) {
    let report = verify_function(ctx, func, cfg);
    if report.has_errors() {
        eprintln!("BASALT_IR_VERIFY_FAILURE: function {}", func.name);
        eprintln!("{report}");
        panic!("BASALT_IR_VERIFY_FAILURE");
    }
}

pub(super) struct FunctionVerifier<'a> {
    pub(super) ctx: &'a Context,
    pub(super) func: &'a Function,
    pub(super) cfg: &'a VerifierConfig,
    pub(super) report: VerificationReport,

    /// Set once an operand or branch target refers outside the graph. Passes
    /// that index through operands are skipped afterwards.
    pub(super) has_dangling_refs: bool,
}

trait FunctionPass {
    fn enabled(_cfg: &VerifierConfig) -> bool {
        true
    }

    fn run(verifier: &mut FunctionVerifier<'_>);
}

struct ReferentialPass;
struct BlockPass;
struct PhiPass;
struct SlotPass;
struct UserPass;

impl FunctionPass for ReferentialPass {
    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_referential_integrity();
    }
}

impl FunctionPass for BlockPass {
    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_block_rules();
    }
}

impl FunctionPass for PhiPass {
    fn enabled(cfg: &VerifierConfig) -> bool {
        cfg.should_check_phis()
    }

    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_phi_rules();
    }
}

impl FunctionPass for SlotPass {
    fn enabled(cfg: &VerifierConfig) -> bool {
        cfg.should_check_slots()
    }

    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_slots();
    }
}

impl FunctionPass for UserPass {
    fn enabled(cfg: &VerifierConfig) -> bool {
        cfg.should_check_users()
    }

    fn run(verifier: &mut FunctionVerifier<'_>) {
        verifier.check_users();
    }
}

impl<'a> FunctionVerifier<'a> {
    fn new(ctx: &'a Context, func: &'a Function, cfg: &'a VerifierConfig) -> Self {
        Self {
            ctx,
            func,
            cfg,
            report: VerificationReport::default(),
            has_dangling_refs: false,
        }
    }

    fn run(&mut self) {
        self.run_pass::<ReferentialPass>();
        if self.has_dangling_refs {
            return;
        }

        self.run_pass::<BlockPass>();
        self.run_pass::<PhiPass>();
        self.run_pass::<SlotPass>();
        self.run_pass::<UserPass>();
    }

    fn run_pass<P: FunctionPass>(&mut self) {
        if P::enabled(self.cfg) {
            P::run(self);
        }
    }

    pub(super) fn emit(&mut self, diagnostic: Diagnostic) {
        let diagnostic = self.with_diagnostic_context(diagnostic);
        self.report.push(diagnostic, self.cfg.max_diagnostics);
    }

    pub(super) fn value_location(&self, value: ValueId) -> Location {
        Location::Value {
            block: self.func.dfg.value_block(value),
            value,
        }
    }

    /// Blocks in layout order together with a copy of their instruction list.
    pub(super) fn block_insts(&self) -> Vec<(BlockId, Vec<ValueId>)> {
        self.func
            .dfg
            .blocks()
            .map(|(block, data)| (block, data.insts().to_vec()))
            .collect()
    }

    fn with_diagnostic_context(&self, mut diagnostic: Diagnostic) -> Diagnostic {
        let mut context = diagnostic.context.take().unwrap_or(DiagnosticContext {
            function_name: None,
            inst_text: None,
        });

        if context.function_name.is_none() {
            context.function_name = self
                .ctx
                .find(self.func.name)
                .map(|name| format!("%{name}"));
        }

        if context.inst_text.is_none() {
            if let Location::Value { value, .. } = &diagnostic.primary {
                context.inst_text = FuncWriter::new(self.func, self.ctx).dump_value(*value).ok();
            }
        }

        if context.function_name.is_some() || context.inst_text.is_some() {
            diagnostic.context = Some(context);
        }

        diagnostic
    }
}
