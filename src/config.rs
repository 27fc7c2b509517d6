//! Project configuration (`helix.toml`).
//!
//! Every section and key is optional:
//!
//! ```toml
//! [formatter]
//! indent_size = 4
//! use_tabs = false
//!
//! [transpiler]
//! warnings = true
//!
//! [keywords]
//! function = "fn"
//! async = "async"
//! ```

use std::path::Path;

use helix_ast::{KeywordTable, Modifier};
use serde::Deserialize;

use crate::error::{DriverError, DriverResult};

pub const CONFIG_FILE_NAME: &str = "helix.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HelixConfig {
    pub formatter: FormatterConfig,
    pub transpiler: TranspilerConfig,
    pub keywords: KeywordConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub indent_size: usize,
    pub use_tabs: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranspilerConfig {
    /// Report warnings (e.g. shadowed functions) alongside errors.
    pub warnings: bool,
}

impl Default for TranspilerConfig {
    fn default() -> Self {
        Self { warnings: true }
    }
}

/// Keyword spelling overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub function: Option<String>,
    #[serde(rename = "async")]
    pub async_: Option<String>,
    #[serde(rename = "static")]
    pub static_: Option<String>,
    #[serde(rename = "unsafe")]
    pub unsafe_: Option<String>,
    pub private: Option<String>,
    pub protected: Option<String>,
    #[serde(rename = "final")]
    pub final_: Option<String>,
}

impl HelixConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> DriverResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
        Self::from_toml(&text).map_err(|source| DriverError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `helix.toml` from `dir`, falling back to defaults when absent.
    pub fn discover(dir: &Path) -> DriverResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading configuration");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// One level of indentation in emitted text.
    pub fn indent_unit(&self) -> String {
        if self.formatter.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.formatter.indent_size)
        }
    }

    pub fn keyword_table(&self) -> KeywordTable {
        let k = &self.keywords;
        let overrides = [
            (Modifier::Async, &k.async_),
            (Modifier::Static, &k.static_),
            (Modifier::Unsafe, &k.unsafe_),
            (Modifier::Private, &k.private),
            (Modifier::Protected, &k.protected),
            (Modifier::Final, &k.final_),
        ];

        let mut table = KeywordTable::default();
        if let Some(function) = &k.function {
            table = table.with_function_keyword(function.as_str());
        }
        for (modifier, text) in overrides {
            if let Some(text) = text {
                table = table.with_modifier(modifier, text.as_str());
            }
        }
        table
    }
}
