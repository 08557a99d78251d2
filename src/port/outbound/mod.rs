//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the news channel,
//! the generative model, subscriber storage, and message delivery.

pub mod channel;
pub mod llm;
pub mod messenger;
pub mod store;
