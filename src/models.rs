//! These models represent the objects passed between the generation loop,
//! the completion providers, and the tools.
//!
//! The completion API speaks in content blocks (text, tool use, tool result)
//! and the loop replays those blocks verbatim on every call within a query,
//! so the internal structs mirror that wire shape directly. Conversion to
//! the provider payload format lives in `providers::utils`.
pub mod message;
pub mod role;
pub mod tool;
