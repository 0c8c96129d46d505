pub mod execution;
pub mod gemini_client;
pub mod generation;
pub mod normalizer;
pub mod openai_client;
pub mod prompts;

pub use gemini_client::GeminiClient;
pub use generation::{create_client, GenerationClient};
pub use normalizer::normalize;
pub use openai_client::OpenAIClient;
