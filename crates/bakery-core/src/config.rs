//! Parser options and persistent configuration.
//!
//! [`ParserOptions`] is the bundle of compatibility switches the parser
//! consults. [`BakeryConfig`] persists it in `~/.bakery/config.json`.
//!
//! # Example
//!
//! ```no_run
//! use bakery_core::config::BakeryConfig;
//!
//! // Load (returns defaults if file doesn't exist)
//! let config = BakeryConfig::load();
//! if config.parser.optimize_code {
//!     println!("optimizer enabled");
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "config.json";

/// Returns `~/.bakery`, the directory holding the persistent config.
pub fn bakery_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".bakery")
}

/// Compatibility switches consulted while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Merge runs of same-resource commands into batched commands.
    pub optimize_code: bool,
    /// Accept `NotExistFile`-style negated predicates.
    pub allow_legacy_branch_condition: bool,
    /// Accept the free-form `RegWrite` form with a non-constant hive.
    pub allow_legacy_reg_write: bool,
    /// Treat `Visible` as a command instead of a macro.
    pub allow_legacy_interface_command: bool,
    /// Treat `PackParam` as a command instead of a macro.
    pub allow_legacy_section_param_command: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            optimize_code: true,
            allow_legacy_branch_condition: false,
            allow_legacy_reg_write: false,
            allow_legacy_interface_command: false,
            allow_legacy_section_param_command: false,
        }
    }
}

impl ParserOptions {
    /// Options with every compatibility switch turned on.
    pub fn legacy() -> Self {
        Self {
            optimize_code: true,
            allow_legacy_branch_condition: true,
            allow_legacy_reg_write: true,
            allow_legacy_interface_command: true,
            allow_legacy_section_param_command: true,
        }
    }
}

/// Persistent bakery configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BakeryConfig {
    #[serde(default)]
    pub parser: ParserOptions,
}

impl BakeryConfig {
    pub fn path() -> PathBuf {
        bakery_dir().join(CONFIG_FILENAME)
    }

    /// Load config from `~/.bakery/config.json`.
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        std::fs::read_to_string(Self::path())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to `~/.bakery/config.json`.
    pub fn save(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(bakery_dir())?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(Self::path(), json)
    }
}
