//! Outbound integrations.

pub mod gemini;
