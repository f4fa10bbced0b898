//! RISC-V privilege modes.

/// Privilege level of the hart.
///
/// Machine mode is the highest level; the ordering of the variants follows the
/// architectural encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivilegeMode {
    /// User mode (U-mode).
    User = 0,
    /// Supervisor mode (S-mode).
    Supervisor = 1,
    /// Machine mode (M-mode).
    #[default]
    Machine = 3,
}

impl PrivilegeMode {
    /// Converts the two-bit encoding to a privilege mode, defaulting to `Machine`
    /// for the reserved value.
    pub const fn from_bits(val: u64) -> Self {
        match val & 3 {
            0 => Self::User,
            1 => Self::Supervisor,
            _ => Self::Machine,
        }
    }

    /// Returns the two-bit architectural encoding.
    pub const fn bits(self) -> u64 {
        self as u64
    }

    /// Returns the human-readable name of the privilege mode.
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Supervisor => "Supervisor",
            Self::Machine => "Machine",
        }
    }
}

impl std::fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
