#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationLevel {
    Fast,
    Standard,
    Full,
}

/// Which checks to run. [`Self::for_level`] picks the flags for a level; they
/// can be toggled afterwards.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub level: VerificationLevel,
    /// `0` means unlimited.
    pub max_diagnostics: usize,
    pub check_phis: bool,
    pub check_slots: bool,
    pub check_users: bool,
}

impl VerifierConfig {
    pub fn for_level(level: VerificationLevel) -> Self {
        match level {
            VerificationLevel::Fast => Self {
                level,
                max_diagnostics: 200,
                check_phis: true,
                check_slots: false,
                check_users: false,
            },
            VerificationLevel::Standard => Self {
                level,
                max_diagnostics: 200,
                check_phis: true,
                check_slots: true,
                check_users: false,
            },
            VerificationLevel::Full => Self {
                level,
                max_diagnostics: 500,
                check_phis: true,
                check_slots: true,
                check_users: true,
            },
        }
    }

    pub fn should_check_types(&self) -> bool {
        !matches!(self.level, VerificationLevel::Fast)
    }

    pub fn should_check_phis(&self) -> bool {
        self.check_phis
    }

    pub fn should_check_slots(&self) -> bool {
        self.check_slots
    }

    pub fn should_check_users(&self) -> bool {
        self.check_users
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::for_level(VerificationLevel::Standard)
    }
}
