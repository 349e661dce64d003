// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::PathBuf;

use crate::category::GeneralCategory;
use crate::emit::EmitOptions;
use crate::width::WidthPolicy;

pub const DEFAULT_UCD_VERSION: &str = "14.0.0";

/// Which table a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Display widths from `UnicodeData.txt` and `EastAsianWidth.txt`.
    Widths,
    /// The intervals of one general category from `UnicodeData.txt`.
    Category(GeneralCategory),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command: Command,
    /// Selects the UCD release, e.g. `14.0.0`.
    pub version: String,
    /// Reads the UCD files from this directory instead of downloading them.
    pub ucd_dir: Option<PathBuf>,
    pub policy: WidthPolicy,
    /// Rejects width tables with overlapping intervals instead of warning about them.
    pub strict: bool,
    pub emit: EmitOptions,
}

impl Config {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            version: DEFAULT_UCD_VERSION.to_string(),
            ucd_dir: None,
            policy: WidthPolicy::standard(),
            strict: false,
            emit: EmitOptions::default(),
        }
    }
}
