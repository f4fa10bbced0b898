//! Interrupt schedule.
//!
//! The schedule is produced by the mutator before the reference run starts and is
//! read-only afterwards. Its text form is one entry per line:
//!
//! ```text
//! 0000000080001000:0001
//! 0000000080002004:0100
//! ```
//!
//! The PC is hexadecimal (an optional `0x` prefix is accepted) and the value is the
//! binary assertion field (an optional `0b` prefix is accepted). Blank lines and
//! lines starting with `#` are ignored.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::assertion::InterruptAssertion;
use crate::common::error::ScheduleError;

/// Immutable map from program counter to interrupt assertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterruptSchedule {
    entries: BTreeMap<u64, InterruptAssertion>,
}

impl InterruptSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from `(pc, assertion)` pairs.
    ///
    /// # Returns
    ///
    /// The schedule, or `ScheduleError::DuplicatePc` if a PC repeats.
    pub fn from_entries<I>(entries: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = (u64, InterruptAssertion)>,
    {
        let mut map = BTreeMap::new();
        for (pc, assertion) in entries {
            match map.entry(pc) {
                Entry::Occupied(_) => return Err(ScheduleError::DuplicatePc { pc }),
                Entry::Vacant(slot) => {
                    let _ = slot.insert(assertion);
                }
            }
        }
        Ok(Self { entries: map })
    }

    /// Builds a schedule from per-instruction slots starting at `base`.
    ///
    /// Slot `i` targets `base + 4 * i`; zero slots are skipped. This is the layout the
    /// mutator emits relative to the `_fuzz_main` symbol.
    ///
    /// # Arguments
    ///
    /// * `base` - Address of the first instruction slot.
    /// * `slots` - Raw four-bit values, one per instruction.
    pub fn from_slots(base: u64, slots: &[u8]) -> Result<Self, ScheduleError> {
        let mut entries = BTreeMap::new();
        let mut pc = base;
        for &bits in slots {
            let assertion = InterruptAssertion::new(bits)?;
            if !assertion.is_empty() {
                let _ = entries.insert(pc, assertion);
            }
            pc = pc.wrapping_add(4);
        }
        Ok(Self { entries })
    }

    /// Parses the text form.
    pub fn parse(text: &str) -> Result<Self, ScheduleError> {
        let mut entries = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (pc_text, bits_text) =
                trimmed
                    .split_once(':')
                    .ok_or_else(|| ScheduleError::Malformed {
                        line,
                        text: trimmed.to_owned(),
                    })?;
            let pc_text = pc_text.trim();
            let bits_text = bits_text.trim();

            let pc_digits = pc_text
                .strip_prefix("0x")
                .or_else(|| pc_text.strip_prefix("0X"))
                .unwrap_or(pc_text);
            let pc = u64::from_str_radix(pc_digits, 16).map_err(|_| ScheduleError::InvalidPc {
                line,
                text: pc_text.to_owned(),
            })?;

            let bits_digits = bits_text.strip_prefix("0b").unwrap_or(bits_text);
            let value = u64::from_str_radix(bits_digits, 2).map_err(|_| {
                ScheduleError::InvalidValue {
                    line,
                    text: bits_text.to_owned(),
                }
            })?;
            let bits = u8::try_from(value).map_err(|_| ScheduleError::ValueTooWide { value })?;
            entries.push((pc, InterruptAssertion::new(bits)?));
        }
        Self::from_entries(entries)
    }

    /// Reads and parses a schedule file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Looks up the assertion scheduled at `pc`.
    #[inline]
    pub fn get(&self, pc: u64) -> Option<InterruptAssertion> {
        self.entries.get(&pc).copied()
    }

    /// Number of scheduled PCs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in ascending PC order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, InterruptAssertion)> + '_ {
        self.entries.iter().map(|(&pc, &assertion)| (pc, assertion))
    }
}

impl fmt::Display for InterruptSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, assertion) in self.iter() {
            writeln!(f, "{pc:016x}:{assertion}")?;
        }
        Ok(())
    }
}

impl FromStr for InterruptSchedule {
    type Err = ScheduleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}
