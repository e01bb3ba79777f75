// Shared prompt constants that are not tied to a note template.
// Note templates live in `notes::templates`.

/// Fixed prompt used by the connectivity smoke test endpoint.
pub const CONNECTIVITY_CHECK_PROMPT: &str = "Write a haiku about backend development";
