use std::fmt;

use basalt_ir::{BlockId, ValueId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    InvalidValueRef,
    InvalidBlockRef,
    InstBlockMismatch,
    EmptyBlock,
    TerminatorNotLast,
    NonTerminatorAtEnd,
    PhiNotAtBlockTop,
    PhiArgCountMismatchPreds,
    PhiHasNonPredIncoming,
    PhiDuplicateIncomingBlock,
    PhiIncomingTypeMismatch,
    UnsetArgSlot,
    UsersSetMismatch,
}

impl DiagnosticCode {
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::InvalidValueRef => 1,
            Self::InvalidBlockRef => 2,
            Self::InstBlockMismatch => 102,
            Self::EmptyBlock => 200,
            Self::TerminatorNotLast => 202,
            Self::NonTerminatorAtEnd => 203,
            Self::PhiNotAtBlockTop => 400,
            Self::PhiArgCountMismatchPreds => 402,
            Self::PhiHasNonPredIncoming => 403,
            Self::PhiDuplicateIncomingBlock => 404,
            Self::PhiIncomingTypeMismatch => 405,
            Self::UnsetArgSlot => 603,
            Self::UsersSetMismatch => 700,
        }
    }

    pub fn as_str(self) -> String {
        format!("IR{:04}", self.as_u16())
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => "error".fmt(f),
            Self::Warning => "warning".fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Function,
    Block(BlockId),
    Value {
        block: Option<BlockId>,
        value: ValueId,
    },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => "func".fmt(f),
            Self::Block(block) => write!(f, "{block}"),
            Self::Value { block, value } => {
                if let Some(block) = block {
                    write!(f, "{block}:{value}")
                } else {
                    write!(f, "{value}")
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticContext {
    pub function_name: Option<String>,
    pub inst_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub primary: Location,
    pub notes: Vec<Note>,
    pub context: Option<DiagnosticContext>,
}

impl Diagnostic {
    pub fn new(
        code: DiagnosticCode,
        severity: Severity,
        message: impl Into<String>,
        primary: Location,
    ) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            primary,
            notes: Vec::new(),
            context: None,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>, primary: Location) -> Self {
        Self::new(code, Severity::Error, message, primary)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, primary: Location) -> Self {
        Self::new(code, Severity::Warning, message, primary)
    }

    pub fn with_note(mut self, message: impl Into<String>) -> Self {
        self.notes.push(Note {
            message: message.into(),
        });
        self
    }

    pub fn with_context(mut self, context: DiagnosticContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} @ {}",
            self.severity, self.code, self.message, self.primary
        )?;

        if let Some(context) = &self.context {
            match (&context.function_name, &context.inst_text) {
                (Some(function_name), Some(inst_text)) => {
                    write!(f, " ({function_name}, {inst_text})")?;
                }
                (Some(function_name), None) => {
                    write!(f, " ({function_name})")?;
                }
                (None, Some(inst_text)) => {
                    write!(f, " ({inst_text})")?;
                }
                (None, None) => {}
            }
        }

        writeln!(f)?;

        for note in &self.notes {
            writeln!(f, "  note: {}", note.message)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cranelift_entity::EntityRef;

    use super::*;

    #[test]
    fn display() {
        let diag = Diagnostic::error(
            DiagnosticCode::PhiNotAtBlockTop,
            "phi instruction must appear at the beginning of the block",
            Location::Value {
                block: Some(BlockId::new(1)),
                value: ValueId::new(4),
            },
        )
        .with_note("preceded by v3");

        assert_eq!(
            diag.to_string(),
            "error [IR0400] phi instruction must appear at the beginning of the block @ block1:v4
  note: preceded by v3
"
        );
    }
}
