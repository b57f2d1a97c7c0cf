#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiGateway};
#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaGateway};
