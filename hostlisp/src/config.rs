//! Compiler options.
//!
//! Options come from the environment ([`CompilerOptions::from_env`]) or a
//! TOML document ([`CompilerOptions::from_toml_str`]):
//!
//! ```toml
//! unchecked_math = true
//! warn_on_reflection = true
//! catalog_path = "host.toml"
//! source_name = "main.hl"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::types::OverflowMode;

pub const ENV_UNCHECKED_MATH: &str = "HOSTLISP_UNCHECKED_MATH";
pub const ENV_WARN_ON_REFLECTION: &str = "HOSTLISP_WARN_ON_REFLECTION";
pub const ENV_CATALOG: &str = "HOSTLISP_CATALOG";

const DEFAULT_SOURCE_NAME: &str = "NO_SOURCE_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    pub unchecked_math: bool,
    pub warn_on_reflection: bool,
    /// Extra catalog loaded on top of the built-in one
    pub catalog_path: Option<PathBuf>,
    pub source_name: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            unchecked_math: false,
            warn_on_reflection: false,
            catalog_path: None,
            source_name: DEFAULT_SOURCE_NAME.to_string(),
        }
    }
}

impl CompilerOptions {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).is_some_and(|v| parse_flag(&v));
        Self {
            unchecked_math: flag(ENV_UNCHECKED_MATH),
            warn_on_reflection: flag(ENV_WARN_ON_REFLECTION),
            catalog_path: lookup(ENV_CATALOG)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, CompileError> {
        Ok(toml::from_str(source)?)
    }

    pub fn overflow_mode(&self) -> OverflowMode {
        OverflowMode::from_unchecked_flag(self.unchecked_math)
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
