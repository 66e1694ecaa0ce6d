use basalt_ir::{
    inst::InstData,
    visitor::{Visitable, Visitor},
    BlockId, ValueId,
};
use cranelift_entity::EntityRef;

use crate::diagnostic::{Diagnostic, DiagnosticCode, Location};

use super::FunctionVerifier;

/// Collects every value and block an instruction refers to.
#[derive(Default)]
struct RefCollector {
    values: Vec<ValueId>,
    blocks: Vec<BlockId>,
}

impl Visitor for RefCollector {
    fn visit_value_id(&mut self, item: ValueId) {
        self.values.push(item);
    }

    fn visit_block_id(&mut self, item: BlockId) {
        self.blocks.push(item);
    }
}

fn collect_refs(inst: &InstData) -> RefCollector {
    let mut collector = RefCollector::default();
    inst.accept(&mut collector);
    collector
}

impl FunctionVerifier<'_> {
    pub(super) fn check_referential_integrity(&mut self) {
        let func = self.func;
        let dfg = &func.dfg;
        let value_num = dfg.value_num();
        let block_num = dfg.block_num();

        let mut diagnostics = Vec::new();
        for (value, data) in dfg.values() {
            let Some(inst) = data.inst() else {
                continue;
            };

            let refs = collect_refs(inst);
            for operand in refs.values {
                if operand.index() >= value_num {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::InvalidValueRef,
                            "operand refers to a value outside the function",
                            self.value_location(value),
                        )
                        .with_note(format!("operand {operand}")),
                    );
                }
            }
            for block in refs.blocks {
                if block.index() >= block_num {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::InvalidBlockRef,
                            "instruction refers to a block outside the function",
                            self.value_location(value),
                        )
                        .with_note(format!("target {block}")),
                    );
                }
            }
        }

        for (block, data) in dfg.blocks() {
            for &pred in data.preds() {
                if pred.index() >= block_num {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::InvalidBlockRef,
                            "predecessor list refers to a block outside the function",
                            Location::Block(block),
                        )
                        .with_note(format!("predecessor {pred}")),
                    );
                }
            }
        }

        if !diagnostics.is_empty() {
            self.has_dangling_refs = true;
        }
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    pub(super) fn check_block_rules(&mut self) {
        for (block, insts) in self.block_insts() {
            let Some((&last, body)) = insts.split_last() else {
                self.emit(Diagnostic::error(
                    DiagnosticCode::EmptyBlock,
                    "block must contain at least one instruction",
                    Location::Block(block),
                ));
                continue;
            };

            for &inst in body {
                if self.func.dfg.is_terminator(inst) {
                    self.emit(Diagnostic::error(
                        DiagnosticCode::TerminatorNotLast,
                        "terminator must be the last instruction of its block",
                        self.value_location(inst),
                    ));
                }
            }

            if !self.func.dfg.is_terminator(last) {
                self.emit(
                    Diagnostic::error(
                        DiagnosticCode::NonTerminatorAtEnd,
                        "block must end with a terminator",
                        self.value_location(last),
                    )
                    .with_note(format!("last instruction is a `{}`", self.func.dfg.value_kind(last))),
                );
            }

            for &inst in &insts {
                let recorded = self.func.dfg.value_block(inst);
                if recorded != Some(block) {
                    let recorded = recorded.map_or_else(|| "none".to_string(), |b| b.to_string());
                    self.emit(
                        Diagnostic::error(
                            DiagnosticCode::InstBlockMismatch,
                            "instruction is listed in a block other than the one it records",
                            Location::Value {
                                block: Some(block),
                                value: inst,
                            },
                        )
                        .with_note(format!("recorded block is {recorded}")),
                    );
                }
            }
        }
    }
}
