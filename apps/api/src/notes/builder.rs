//! Prompt Builder: turns raw request text plus a note kind into a subject and prompt.
//!
//! Pure: no I/O, no logging side effects beyond what the caller adds.

use crate::errors::AppError;
use crate::models::note::{NoteKind, Prompt, Subject};
use crate::notes::subject::extract_subject;
use crate::notes::templates::{NoteTemplate, TemplateRegistry};

/// Output of `PromptBuilder::prepare`, ready to hand to the generation client.
#[derive(Debug, Clone)]
pub struct PreparedNote {
    pub kind: NoteKind,
    pub subject: Subject,
    pub prompt: Prompt,
}

#[derive(Clone)]
pub struct PromptBuilder {
    registry: TemplateRegistry,
}

impl PromptBuilder {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    /// Resolves a wire identifier to a kind that has a registered template.
    pub fn resolve_kind(&self, raw_kind: &str) -> Result<NoteKind, AppError> {
        raw_kind
            .parse::<NoteKind>()
            .ok()
            .filter(|kind| self.registry.get(*kind).is_some())
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unsupported note kind '{}'. Supported kinds: {}",
                    raw_kind,
                    self.registry.supported_kinds().join(", ")
                ))
            })
    }

    /// Extracts the subject using the placeholder of `kind`'s template.
    pub fn extract_subject(&self, raw_text: &str, kind: NoteKind) -> Result<Subject, AppError> {
        let template = self.template(kind)?;
        Ok(extract_subject(raw_text, template.placeholder_subject()))
    }

    pub fn build_prompt(&self, subject: &Subject, kind: NoteKind) -> Result<Prompt, AppError> {
        Ok(self.template(kind)?.render(subject))
    }

    /// Subject extraction followed by prompt rendering.
    pub fn prepare(&self, raw_text: &str, kind: NoteKind) -> Result<PreparedNote, AppError> {
        let subject = self.extract_subject(raw_text, kind)?;
        let prompt = self.build_prompt(&subject, kind)?;
        Ok(PreparedNote {
            kind,
            subject,
            prompt,
        })
    }

    fn template(&self, kind: NoteKind) -> Result<&dyn NoteTemplate, AppError> {
        self.registry.get(kind).ok_or_else(|| {
            AppError::Validation(format!("No template registered for note kind '{kind}'"))
        })
    }
}
