//! Completion-service client implementations for FreightDesk.
//!
//! The reference deployment talks to Groq, but any endpoint exposing an
//! OpenAI-compatible `/chat/completions` route works through the same client.

pub mod groq;

pub use groq::GroqProvider;
