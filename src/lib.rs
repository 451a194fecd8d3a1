pub mod error;
pub mod config;
pub mod content;
pub mod context;
pub mod models;
pub mod request;
pub mod client;
pub mod chat;

/*

allm-chat: a typed client for the chat completions endpoint.

One call, one POST: build a ChatCompletionRequest, hand it to
Client::create_chat_completion with a RequestContext, get back a
ChatCompletionResponse. Message content is written ASCII-safe with
supplementary-plane characters as UTF-16 surrogate escapes (see content.rs).

src/
├── lib.rs        # Re-exports
├── error.rs      # Error enum
├── config.rs     # Base URL and credentials
├── content.rs    # Content newtype and its wire encoding
├── context.rs    # Deadline and cancellation per call
├── models.rs     # Model ids and endpoint support table
├── request.rs    # Usage and the API error envelope
├── client.rs     # URL building, request building, send + decode
├── chat.rs       # Chat types and create_chat_completion
└── bin/chat.rs   # Command line front end

*/

pub use chat::{
  ChatCompletionRequest
, ChatCompletionResponse
, Choice
, Message
, Role
, ROLE_ASSISTANT
, ROLE_SYSTEM
, ROLE_USER
};
pub use client::Client;
pub use config::ClientConfig;
pub use content::{encode_content, Content};
pub use context::RequestContext;
pub use error::{Error, Result};
pub use models::check_endpoint_supports_model;
pub use request::Usage;

// Cancellation tokens accepted by RequestContext::with_cancel
pub use tokio_util::sync::CancellationToken;
