//! Generation client: request building, streaming deltas, error mapping.

mod client;
mod error;
mod stream;

pub use client::{ChatRequest, DeltaStream, GeminiClient, TextGenerator, build_messages};
pub use error::{ChatError, map_api_error};
