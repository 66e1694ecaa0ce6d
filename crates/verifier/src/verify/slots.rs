use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::FunctionVerifier;

impl FunctionVerifier<'_> {
    /// Every variable-arity slot of a placed instruction must be set.
    pub(super) fn check_slots(&mut self) {
        for (_, insts) in self.block_insts() {
            for inst in insts {
                let Some(slots) = self.func.dfg.inst_data(inst).and_then(|data| data.slots()) else {
                    continue;
                };

                let unset: Vec<_> = slots
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, slot)| slot.is_none().then_some(idx))
                    .collect();
                for index in unset {
                    self.emit(
                        Diagnostic::error(
                            DiagnosticCode::UnsetArgSlot,
                            "argument slot was never set",
                            self.value_location(inst),
                        )
                        .with_note(format!("slot {index}")),
                    );
                }
            }
        }
    }
}
