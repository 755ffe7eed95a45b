//! HTTP client for the two OpenAI endpoints the catalog pipeline calls:
//! Whisper audio transcription and the vision-capable chat completion.

pub mod client;

pub use client::{OpenAiClient, OpenAiError};
