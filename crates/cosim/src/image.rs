//! Program image loading.
//!
//! Both simulators run the same ELF image from the trial's output directory. The
//! driver parses it before reloading the design so that a truncated or foreign file
//! fails the trial up front. The schedule builder also needs the `_fuzz_main`
//! symbol to place per-instruction interrupt slots.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use object::{Object, ObjectSymbol};
use tracing::debug;

use crate::common::error::ImageError;

/// Symbol marking the first fuzzed instruction.
pub const FUZZ_MAIN_SYMBOL: &str = "_fuzz_main";

/// A parsed ELF program image.
#[derive(Clone, Debug)]
pub struct ProgramImage {
    path: PathBuf,
    data: Vec<u8>,
    entry: u64,
    symbols: HashMap<String, u64>,
}

impl ProgramImage {
    /// Reads and parses the ELF file at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the image, usually `TrialPaths::target_program`.
    ///
    /// # Returns
    ///
    /// The parsed image, or `ImageError` if the file is unreadable or not ELF.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, data)
    }

    /// Parses an image already in memory. `path` is used for diagnostics only.
    pub fn parse(path: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self, ImageError> {
        let path = path.into();
        let file = object::File::parse(data.as_slice()).map_err(|err| ImageError::Parse {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        if file.format() != object::BinaryFormat::Elf {
            return Err(ImageError::Parse {
                path,
                reason: format!("unsupported format {:?}", file.format()),
            });
        }

        let entry = file.entry();
        let symbols: HashMap<String, u64> = file
            .symbols()
            .filter_map(|sym| {
                let name = sym.name().ok()?;
                (!name.is_empty()).then(|| (name.to_owned(), sym.address()))
            })
            .collect();

        debug!(
            path = %path.display(),
            entry = format_args!("{entry:#x}"),
            symbols = symbols.len(),
            "program image parsed"
        );
        Ok(Self {
            path,
            data,
            entry,
            symbols,
        })
    }

    /// Where the image was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// ELF entry point.
    pub const fn entry(&self) -> u64 {
        self.entry
    }

    /// Address of the symbol `name`, if present.
    pub fn symbol(&self, name: &str) -> Option<u64> {
        self.symbols.get(name).copied()
    }
}
