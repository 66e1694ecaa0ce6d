mod config;
mod diagnostic;
mod report;
mod verify;

pub use config::{VerificationLevel, VerifierConfig};
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticContext, Location, Note, Severity};
pub use report::VerificationReport;
pub use verify::{verify_function, verify_function_or_panic};

/// Runs [`verify_function_or_panic`] at [`VerificationLevel::Full`] in
/// builds with debug assertions, and does nothing otherwise.
#[macro_export]
macro_rules! debug_verify_func {
    ($ctx:expr, $func:expr) => {{
        if cfg!(debug_assertions) {
            let cfg = $crate::VerifierConfig::for_level($crate::VerificationLevel::Full);
            $crate::verify_function_or_panic($ctx, $func, &cfg);
        }
    }};
}
