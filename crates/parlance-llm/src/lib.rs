//! Parlance LLM - completion provider adapters

pub mod client;
pub mod groq;
pub mod types;

pub use client::{CompletionClient, CompletionError, CompletionResult};
pub use groq::GroqClient;
pub use types::*;
