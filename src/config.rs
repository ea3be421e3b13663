//! Read options and label decoding policy.
//!
//! Controls which categorical variables are rendered as labels when a
//! schema is compiled into a layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which variables with categories are decoded into labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelDecoding {
    /// Decode every variable that has categories and no decimal scaling
    #[default]
    All,
    /// Never decode; variables with categories are read as integers
    Disabled,
    /// Decode everything except the named variables
    Except(BTreeSet<String>),
}

impl LabelDecoding {
    /// Build an exclusion policy from variable names
    pub fn except<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Except(names.into_iter().map(Into::into).collect())
    }

    /// Whether labels should be decoded for the given variable
    pub fn decodes(&self, name: &str) -> bool {
        match self {
            LabelDecoding::All => true,
            LabelDecoding::Disabled => false,
            LabelDecoding::Except(excluded) => !excluded.contains(name),
        }
    }
}

impl From<bool> for LabelDecoding {
    fn from(enabled: bool) -> Self {
        if enabled {
            LabelDecoding::All
        } else {
            LabelDecoding::Disabled
        }
    }
}

/// Options passed to [`crate::Table::open`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Label decoding policy applied while compiling the schema
    pub label_decoding: LabelDecoding,
}

impl ReadOptions {
    /// Create options with custom label decoding
    pub fn with_label_decoding(mut self, label_decoding: impl Into<LabelDecoding>) -> Self {
        self.label_decoding = label_decoding.into();
        self
    }

    /// Read every categorical variable as its raw integer code
    pub fn without_labels(mut self) -> Self {
        self.label_decoding = LabelDecoding::Disabled;
        self
    }
}
