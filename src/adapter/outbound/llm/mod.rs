//! LLM adapter modules.
//!
//! Provides implementations of the [`Llm`](crate::port::outbound::llm::Llm)
//! trait for chat completion providers.

pub mod openai;

pub use openai::OpenAi;
