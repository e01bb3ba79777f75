//! Note templates: pluggable, trait-based prompt skeletons keyed by `NoteKind`.
//!
//! Adding a note kind: add a `NoteKind` variant, implement `NoteTemplate`
//! and register it in `TemplateRegistry::with_defaults`. Subject extraction
//! and the generation client stay untouched.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::note::{NoteKind, Prompt, Subject};
use crate::notes::prompts::{BOOK_NOTE_PROMPT_TEMPLATE, BOOK_TITLE_PLACEHOLDER};

/// A fixed prompt skeleton for one note kind.
pub trait NoteTemplate: Send + Sync {
    fn kind(&self) -> NoteKind;

    /// Subject used when none can be extracted from the request.
    fn placeholder_subject(&self) -> &'static str;

    /// Builds the full prompt. Must be deterministic for a given subject.
    fn render(&self, subject: &Subject) -> Prompt;
}

/// Book notes for an Obsidian vault.
pub struct BookNoteTemplate;

impl NoteTemplate for BookNoteTemplate {
    fn kind(&self) -> NoteKind {
        NoteKind::Book
    }

    fn placeholder_subject(&self) -> &'static str {
        BOOK_TITLE_PLACEHOLDER
    }

    fn render(&self, subject: &Subject) -> Prompt {
        Prompt::new(BOOK_NOTE_PROMPT_TEMPLATE.replace("{subject}", subject.as_str()))
    }
}

/// Dispatch table from note kind to template. Built once at startup, read-only afterwards.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<NoteKind, Arc<dyn NoteTemplate>>,
}

impl TemplateRegistry {
    /// Registry with every built-in template.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(Arc::new(BookNoteTemplate));
        registry
    }

    /// Registers a template under its own kind, replacing any previous one.
    pub fn register(&mut self, template: Arc<dyn NoteTemplate>) {
        self.templates.insert(template.kind(), template);
    }

    pub fn get(&self, kind: NoteKind) -> Option<&dyn NoteTemplate> {
        self.templates.get(&kind).map(|t| t.as_ref())
    }

    /// Registered kinds as wire identifiers, sorted for stable error messages.
    pub fn supported_kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<&'static str> = self.templates.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        kinds
    }
}
