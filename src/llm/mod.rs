// ABOUTME: LLM provider abstraction layer for pluggable AI model integration
// ABOUTME: Defines the contract for chat-completion providers used by the AI handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Service Provider Interface
//!
//! The AI chat and insights handlers talk to text-generation models through the
//! [`LlmProvider`] trait. The production implementation is
//! [`OpenAiCompatibleProvider`], pointed at DeepSeek by default; tests swap in
//! in-process stubs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use weatherdash_server::llm::{ChatMessage, ChatRequest, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
//! use weatherdash_server::errors::AppError;
//!
//! # async fn demo() -> Result<(), AppError> {
//! let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::deepseek("sk-..."))?;
//! let request = ChatRequest::new(vec![ChatMessage::user("Is it raining in Paris?")])
//!     .with_temperature(0.4);
//! let response = provider.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

mod openai_compatible;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// LLM provider capability flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider supports streaming responses
        const STREAMING = 0b0000_0001;
        /// Provider supports function/tool calling
        const FUNCTION_CALLING = 0b0000_0010;
        /// Provider supports JSON mode output
        const JSON_MODE = 0b0000_1000;
        /// Provider supports system messages
        const SYSTEM_MESSAGES = 0b0001_0000;
    }
}

impl LlmCapabilities {
    /// Plain text generation with system prompts
    #[must_use]
    pub const fn text_only() -> Self {
        Self::SYSTEM_MESSAGES
    }

    /// Check if system messages are supported
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions for the model
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
}

impl MessageRole {
    /// Wire name of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: MessageRole,
    /// Text content
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model override, provider default when `None`
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Output token ceiling
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model that produced the text
    pub model: String,
    /// Token accounting when reported
    pub usage: Option<TokenUsage>,
    /// Why generation stopped
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Sum of both
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Contract for text-generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short identifier, e.g. `deepseek`
    fn name(&self) -> &str;

    /// Human-readable name
    fn display_name(&self) -> &str;

    /// Supported features
    fn capabilities(&self) -> LlmCapabilities;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    /// Perform a non-streaming completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;

    /// Check that the provider is reachable and the credential is accepted
    async fn health_check(&self) -> Result<bool, AppError>;
}
