//! Keyword spellings carried by the root scope.
//!
//! Helix lets a project rename its keywords, so the compiler never compares
//! against string literals directly. A [`KeywordTable`] maps each keyword
//! identity to its spelling, and [`RecognizedModifiers`] is the lookup set
//! derived from it once per compilation pass.

use std::collections::HashMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The closed set of declaration modifiers.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    #[display("async")]
    Async,
    #[display("private")]
    Private,
    #[display("protected")]
    Protected,
    #[display("final")]
    Final,
    #[display("unsafe")]
    Unsafe,
    #[display("static")]
    Static,
}

impl Modifier {
    pub const ALL: [Modifier; 6] = [
        Modifier::Async,
        Modifier::Private,
        Modifier::Protected,
        Modifier::Final,
        Modifier::Unsafe,
        Modifier::Static,
    ];

    /// Spelling used when the project does not override it.
    pub fn default_keyword(self) -> &'static str {
        match self {
            Modifier::Async => "async",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Final => "final",
            Modifier::Unsafe => "unsafe",
            Modifier::Static => "static",
        }
    }
}

/// Keyword identity → spelling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordTable {
    function: String,
    modifiers: HashMap<Modifier, String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            function: "fn".to_string(),
            modifiers: Modifier::ALL
                .iter()
                .map(|m| (*m, m.default_keyword().to_string()))
                .collect(),
        }
    }
}

impl KeywordTable {
    pub fn with_function_keyword(mut self, text: impl Into<String>) -> Self {
        self.function = text.into();
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier, text: impl Into<String>) -> Self {
        self.modifiers.insert(modifier, text.into());
        self
    }

    pub fn function_keyword(&self) -> &str {
        &self.function
    }

    pub fn modifier_keyword(&self, modifier: Modifier) -> &str {
        self.modifiers
            .get(&modifier)
            .map(String::as_str)
            .unwrap_or_else(|| modifier.default_keyword())
    }

    /// Every modifier, under its configured spelling.
    pub fn recognized_modifiers(&self) -> RecognizedModifiers {
        self.recognized_subset(&Modifier::ALL)
    }

    /// Only the given modifiers, under their configured spellings.
    pub fn recognized_subset(&self, modifiers: &[Modifier]) -> RecognizedModifiers {
        modifiers
            .iter()
            .map(|m| (self.modifier_keyword(*m).to_string(), *m))
            .collect()
    }
}

/// Spelling → modifier lookup for one compilation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecognizedModifiers {
    by_text: HashMap<String, Modifier>,
}

impl RecognizedModifiers {
    pub fn lookup(&self, text: &str) -> Option<Modifier> {
        self.by_text.get(text).copied()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.by_text.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.by_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_text.is_empty()
    }
}

impl FromIterator<(String, Modifier)> for RecognizedModifiers {
    fn from_iter<I: IntoIterator<Item = (String, Modifier)>>(iter: I) -> Self {
        Self {
            by_text: iter.into_iter().collect(),
        }
    }
}
