use basalt_ir::ValueId;
use rustc_hash::FxHashMap;

use crate::diagnostic::{Diagnostic, DiagnosticCode};

use super::FunctionVerifier;

impl FunctionVerifier<'_> {
    /// Compares the use records against the operands of placed instructions.
    ///
    /// Both sides are counted as multisets of `(value, user)` pairs, so an
    /// instruction referencing a value twice needs two records.
    pub(super) fn check_users(&mut self) {
        let func = self.func;
        let dfg = &func.dfg;

        let mut expected: FxHashMap<(ValueId, ValueId), usize> = FxHashMap::default();
        for (_, insts) in self.block_insts() {
            for inst in insts {
                if let Some(data) = dfg.inst_data(inst) {
                    data.for_each_operand(|value| *expected.entry((value, inst)).or_default() += 1);
                }
            }
        }

        let mut recorded: FxHashMap<(ValueId, ValueId), usize> = FxHashMap::default();
        let mut misfiled = Vec::new();
        for (value, data) in dfg.values() {
            for u in data.uses() {
                if u.value != value {
                    misfiled.push((value, u.user, u.value));
                }
                *recorded.entry((value, u.user)).or_default() += 1;
            }
        }

        let mut mismatches: Vec<_> = expected
            .iter()
            .map(|(key, &count)| (*key, count, recorded.get(key).copied().unwrap_or(0)))
            .chain(
                recorded
                    .iter()
                    .filter(|(key, _)| !expected.contains_key(*key))
                    .map(|(key, &count)| (*key, 0, count)),
            )
            .filter(|(_, expected, recorded)| expected != recorded)
            .collect();
        mismatches.sort_by_key(|((value, user), _, _)| (*user, *value));

        for ((value, user), expected, recorded) in mismatches {
            self.emit(
                Diagnostic::error(
                    DiagnosticCode::UsersSetMismatch,
                    "use records do not match instruction operands",
                    self.value_location(user),
                )
                .with_note(format!(
                    "{user} references {value} {expected} time(s), {recorded} record(s) found"
                )),
            );
        }

        for (owner, user, value) in misfiled {
            self.emit(
                Diagnostic::error(
                    DiagnosticCode::UsersSetMismatch,
                    "use record is filed under the wrong value",
                    self.value_location(owner),
                )
                .with_note(format!("record of {user} using {value}")),
            );
        }
    }
}
