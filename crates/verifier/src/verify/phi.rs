use basalt_ir::inst::InstData;
use rustc_hash::FxHashSet;

use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::FunctionVerifier;

impl FunctionVerifier<'_> {
    pub(super) fn check_phi_rules(&mut self) {
        let func = self.func;
        let dfg = &func.dfg;
        for (block, insts) in self.block_insts() {
            let preds = dfg.block(block).preds();
            let pred_set: FxHashSet<_> = preds.iter().copied().collect();

            let mut first_non_phi = None;
            for inst in insts {
                let Some(InstData::Phi(phi)) = dfg.inst_data(inst) else {
                    first_non_phi.get_or_insert(inst);
                    continue;
                };

                if let Some(before) = first_non_phi {
                    self.emit(
                        Diagnostic::error(
                            DiagnosticCode::PhiNotAtBlockTop,
                            "phi instruction must appear at the beginning of the block",
                            self.value_location(inst),
                        )
                        .with_note(format!("preceded by {before}")),
                    );
                }

                let mut seen_incomings = FxHashSet::default();
                let result_ty = dfg.value_ty(inst);

                for alt in phi.alts() {
                    if !pred_set.contains(&alt.from) {
                        self.emit(
                            Diagnostic::error(
                                DiagnosticCode::PhiHasNonPredIncoming,
                                "phi incoming block is not a predecessor",
                                self.value_location(inst),
                            )
                            .with_note(format!("incoming from {}", alt.from)),
                        );
                    }

                    if !seen_incomings.insert(alt.from) {
                        self.emit(
                            Diagnostic::error(
                                DiagnosticCode::PhiDuplicateIncomingBlock,
                                "phi contains duplicate incoming block",
                                self.value_location(inst),
                            )
                            .with_note(format!("duplicate predecessor {}", alt.from)),
                        );
                    }

                    let arg_ty = dfg.value_ty(alt.value);
                    if self.cfg.should_check_types() && arg_ty != result_ty {
                        self.emit(
                            Diagnostic::error(
                                DiagnosticCode::PhiIncomingTypeMismatch,
                                "phi incoming value type differs from phi result type",
                                self.value_location(inst),
                            )
                            .with_note(format!("expected {result_ty:?}, found {arg_ty:?}")),
                        );
                    }
                }

                if seen_incomings.len() != pred_set.len() {
                    self.emit(
                        Diagnostic::error(
                            DiagnosticCode::PhiArgCountMismatchPreds,
                            "phi incoming blocks do not match predecessor set",
                            self.value_location(inst),
                        )
                        .with_note(format!(
                            "expected {} predecessor(s), found {} incoming block(s)",
                            pred_set.len(),
                            seen_incomings.len()
                        )),
                    );
                }
            }
        }
    }
}
