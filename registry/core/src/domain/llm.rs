// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

/// Model configuration an agent is bound to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    /// Model identifier (e.g., "gpt-4o-mini", "llama3.2:latest")
    pub model: String,

    /// Provider family used to reach the model (openai, anthropic, ollama, ...)
    pub model_endpoint_type: String,

    /// Optional endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_endpoint: Option<String>,

    /// Optional prompt wrapper for non-chat completion endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_wrapper: Option<String>,

    /// Context window in tokens
    pub context_window: u32,

    #[serde(default = "default_true")]
    pub put_inner_thoughts_in_kwargs: bool,
}

impl LlmConfig {
    pub fn new(model: impl Into<String>, model_endpoint_type: impl Into<String>, context_window: u32) -> Self {
        Self {
            model: model.into(),
            model_endpoint_type: model_endpoint_type.into(),
            model_endpoint: None,
            model_wrapper: None,
            context_window,
            put_inner_thoughts_in_kwargs: true,
        }
    }
}

/// Embedding model configuration used for archival memory and sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    pub embedding_endpoint_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_endpoint: Option<String>,

    pub embedding_model: String,

    /// Vector dimensionality
    pub embedding_dim: u32,

    /// Chunk size used when splitting passages
    #[serde(default = "default_chunk_size")]
    pub embedding_chunk_size: u32,
}

impl EmbeddingConfig {
    pub fn new(embedding_model: impl Into<String>, embedding_endpoint_type: impl Into<String>, embedding_dim: u32) -> Self {
        Self {
            embedding_endpoint_type: embedding_endpoint_type.into(),
            embedding_endpoint: None,
            embedding_model: embedding_model.into(),
            embedding_dim,
            embedding_chunk_size: default_chunk_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_chunk_size() -> u32 {
    300
}
