//! Local LLM invocation via the Ollama CLI.
//!
//! The model runtime is an opaque collaborator: prompt in on stdin,
//! generated text out on stdout, diagnostics on stderr.

mod runner;

pub use runner::{LlmError, ModelRunner, OllamaRunner};
