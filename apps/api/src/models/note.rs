use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selects which fixed markdown template a note is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteKind {
    Book,
}

impl NoteKind {
    /// Wire identifier, as sent by clients and echoed back in responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Book => "book",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNoteKind(pub String);

impl fmt::Display for UnknownNoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown note kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownNoteKind {}

impl FromStr for NoteKind {
    type Err = UnknownNoteKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(NoteKind::Book),
            _ => Err(UnknownNoteKind(s.to_string())),
        }
    }
}

/// The topic a note is written about (e.g. a book title). Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    /// Returns `None` for blank input so an empty subject can never be built.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Wraps a template placeholder such as `[Book Title]`.
    pub fn placeholder(value: &'static str) -> Self {
        debug_assert!(!value.trim().is_empty(), "placeholder must not be blank");
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully assembled instruction text for the generation model.
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
