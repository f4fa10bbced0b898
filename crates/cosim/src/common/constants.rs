//! Fixed names and defaults.
//!
//! The artifact names are part of the contract with the mutator and the
//! signature comparator; both sides derive them from the same output directory.

/// File name of the program image consumed by both simulators.
pub const TARGET_PROGRAM_NAME: &str = ".input_0.elf";

/// File name of the signature dump produced by the RTL side.
pub const SIGNATURE_FILE_NAME: &str = ".rtl_sig_0.txt";

/// Plusarg prefix selecting the trial's output directory (`+output=<dir>`).
pub const OUTPUT_PLUSARG: &str = "+output=";

/// Default location the trial driver writes the coverage sum to.
pub const DEFAULT_COVSUM_PATH: &str = "/tmp/.covsum_0.txt";

/// Slot index of the reference-simulator turn.
pub const REFERENCE_SLOT: i32 = 0;

/// Slot index of the RTL turn.
pub const RTL_SLOT: i32 = 1;

/// Width of the interrupt assertion field in a schedule entry.
pub const ASSERTION_BITS: u32 = 4;
