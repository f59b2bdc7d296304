//! LLM provider integration for dashboard synthesis.
//!
//! This module provides the optional code-generation capability used to:
//! - Synthesize complete dashboard artifacts from chart specifications
//! - Review generated artifacts and score them
//! - Suggest extra insight bullets
//!
//! The LLM integration is optional - Dashforge always produces a dashboard
//! through its deterministic template renderer when no provider is configured
//! or the provider fails.
//!
//! # Supported Providers
//!
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Ollama** - Local models, no API key needed (honours `OLLAMA_HOST`)
//!
//! # Example
//!
//! ```no_run
//! use dashforge::{DashboardPipeline, OllamaProvider};
//!
//! // Use a free local model
//! let pipeline = DashboardPipeline::new().with_llm(OllamaProvider::new().unwrap());
//!
//! // Or use Anthropic API
//! // let pipeline = DashboardPipeline::new()
//! //     .with_llm(AnthropicProvider::from_env().unwrap());
//! ```

mod anthropic;
pub mod decode;
mod mock;
mod ollama;
mod openai;
pub mod prompts;
mod provider;

pub use anthropic::AnthropicProvider;
pub use mock::{MockProvider, MockReply};
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{CompletionRequest, LlmConfig, LlmProvider};
