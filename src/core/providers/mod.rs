//! Provider implementations

pub mod openai;
pub mod openrouter;

pub use openai::OpenAIProvider;
pub use openrouter::OpenRouterProvider;

#[cfg(test)]
pub mod stub;
