use std::fmt;

use crate::diagnostic::{Diagnostic, DiagnosticCode};

/// Diagnostics collected for one function, in the order the passes found
/// them.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics dropped after `max_diagnostics` was reached.
    pub omitted: usize,
}

impl VerificationReport {
    pub fn is_ok(&self) -> bool {
        !self.has_errors()
    }

    /// Dropped diagnostics count as errors, since every check the verifier
    /// runs reports at error severity.
    pub fn has_errors(&self) -> bool {
        self.omitted > 0 || self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diag| diag.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diag| !diag.is_error())
    }

    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diag| diag.code == code)
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.with_code(code).next().is_some()
    }

    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.diagnostics.iter().map(|diag| diag.code).collect()
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic, max_diagnostics: usize) {
        if max_diagnostics == 0 || self.diagnostics.len() < max_diagnostics {
            self.diagnostics.push(diagnostic);
        } else {
            self.omitted += 1;
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return "verification succeeded".fmt(f);
        }

        for (index, diagnostic) in self.diagnostics.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        if self.omitted > 0 {
            write!(f, "\n... {} more diagnostic(s) omitted", self.omitted)?;
        }

        Ok(())
    }
}
