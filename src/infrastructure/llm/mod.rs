//! # LLM Wrapper
//!
//! Thin adapter over hosted generative-language APIs (Gemini, OpenAI-compatible).
//! The bot only ever sends a single prompt and reads back text; `Client` implements the
//! domain `LlmProvider` trait on top of that.

mod client;
pub mod providers;
mod types;

pub use client::Client;
pub use types::{Error, Provider, Request, Response};
