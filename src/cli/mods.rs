// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the commands that edit the mod catalog.
//!
//! ```text
//! <MOD> is a GUID or an exact display name
//!
//! move <MOD> up | down | <N>       N is a 0-based position, clamped
//! select <MOD> <INDEX>             legacy mods
//! toggle <MOD> <OPTION> on | off   v1 mods
//! choose <MOD> <OPTION> <SUB>      v1 mods
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, ValueEnum};

/// Arguments for `add`.
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Archives to install (.zip or .7z).
    #[arg(value_name = "ARCHIVE", required = true)]
    pub archives: Vec<PathBuf>,
}

/// A single mod reference, for `remove`, `enable` and `disable`.
#[derive(Debug, Clone, Args)]
pub struct ModArgs {
    /// Mod GUID or display name.
    #[arg(value_name = "MOD")]
    pub target: String,
}

/// Where `move` puts a mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePosition {
    Up,
    Down,
    To(usize),
}

impl FromStr for MovePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => other
                .parse()
                .map(Self::To)
                .map_err(|_| format!("expected 'up', 'down' or a position, got '{s}'")),
        }
    }
}

impl fmt::Display for MovePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::To(index) => write!(f, "{index}"),
        }
    }
}

/// Arguments for `move`.
#[derive(Debug, Clone, Args)]
pub struct MoveArgs {
    /// Mod GUID or display name.
    #[arg(value_name = "MOD")]
    pub target: String,

    /// 'up', 'down' or a 0-based position in the deployment order.
    #[arg(value_name = "POSITION")]
    pub position: MovePosition,
}

/// Arguments for `select`.
#[derive(Debug, Clone, Args)]
pub struct SelectArgs {
    /// Mod GUID or display name.
    #[arg(value_name = "MOD")]
    pub target: String,

    /// 0-based index of the option to use.
    #[arg(value_name = "INDEX")]
    pub index: usize,
}

/// On/off switch for `toggle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Arguments for `toggle`.
#[derive(Debug, Clone, Args)]
pub struct ToggleArgs {
    /// Mod GUID or display name.
    #[arg(value_name = "MOD")]
    pub target: String,

    /// 0-based option index.
    #[arg(value_name = "OPTION")]
    pub option: usize,

    #[arg(value_name = "STATE", value_enum)]
    pub state: Switch,
}

/// Arguments for `choose`.
#[derive(Debug, Clone, Args)]
pub struct ChooseArgs {
    /// Mod GUID or display name.
    #[arg(value_name = "MOD")]
    pub target: String,

    /// 0-based option index.
    #[arg(value_name = "OPTION")]
    pub option: usize,

    /// 0-based sub-option index.
    #[arg(value_name = "SUB")]
    pub sub: usize,
}
