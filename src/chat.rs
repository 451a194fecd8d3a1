//! Chat completion types and the non-streaming entry point

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use reqwest::Method;
use log::{debug, error};

use crate::content::Content;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::models::{check_endpoint_supports_model, CHAT_COMPLETIONS_SUFFIX};
use crate::request::Usage;

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

// ===== Message Types =====

/// Author of a message.
///
/// Travels as a plain string; roles this crate does not know are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role
{   System
  , User
  , Assistant
  , Other(String)
}

impl Role
{   pub fn as_str(&self) -> &str
    {   match self
        {   Role::System => ROLE_SYSTEM
          , Role::User => ROLE_USER
          , Role::Assistant => ROLE_ASSISTANT
          , Role::Other(s) => s
        }
    }
}

impl Default for Role
{   fn default() -> Self
    {   Role::User
    }
}

impl From<&str> for Role
{   fn from(s: &str) -> Self
    {   match s
        {   ROLE_SYSTEM => Role::System
          , ROLE_USER => Role::User
          , ROLE_ASSISTANT => Role::Assistant
          , other => Role::Other(other.to_string())
        }
    }
}

impl From<String> for Role
{   fn from(s: String) -> Self
    {   Role::from(s.as_str())
    }
}

impl From<Role> for String
{   fn from(role: Role) -> Self
    {   match role
        {   Role::Other(s) => s
          , known => known.as_str().to_string()
        }
    }
}

impl fmt::Display for Role
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}

/// One entry of the conversation history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message
{   #[serde(deserialize_with = "null_as_default")]
    pub role: Role
  , pub content: Content
  , /// Optional author name, left out of the body when empty
    #[serde(
      skip_serializing_if = "String::is_empty",
      deserialize_with = "null_as_default"
    )]
    pub name: String
}

impl Message
{   pub fn new(role: Role, content: impl Into<Content>) -> Self
    {   Message
        {   role
          , content: content.into()
          , name: String::new()
        }
    }

    pub fn system(content: impl Into<Content>) -> Self
    {   Message::new(Role::System, content)
    }

    pub fn user(content: impl Into<Content>) -> Self
    {   Message::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<Content>) -> Self
    {   Message::new(Role::Assistant, content)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self
    {   self.name = name.into();
        self
    }
}

// ===== Request =====

/// Body of `POST /chat/completions`.
///
/// Every field after `messages` is left out of the body while it holds its
/// zero value, so `..Default::default()` means "use the server default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest
{   pub model: String
  , pub messages: Vec<Message>
  , #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32
  , #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub temperature: f32
  , #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub top_p: f32
  , #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub n: u32
  , #[serde(default, skip_serializing_if = "is_false")]
    pub stream: bool
  , #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>
  , #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub presence_penalty: f32
  , #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub frequency_penalty: f32
  , /// Token id (as a string) to bias
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub logit_bias: HashMap<String, i32>
  , /// End-user identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String
}

impl ChatCompletionRequest
{   pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self
    {   ChatCompletionRequest
        {   model: model.into()
          , messages
          , ..ChatCompletionRequest::default()
        }
    }
}

fn is_zero_u32(v: &u32) -> bool
{   *v == 0
}

fn is_zero_f32(v: &f32) -> bool
{   *v == 0.0
}

fn is_false(v: &bool) -> bool
{   !*v
}

// ===== Response =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Choice
{   #[serde(deserialize_with = "null_as_default")]
    pub index: u32
  , #[serde(deserialize_with = "null_as_default")]
    pub message: Message
  , /// Why generation stopped, e.g. `stop` or `length`
    #[serde(deserialize_with = "null_as_default")]
    pub finish_reason: String
}

/// Reply to a chat completion.
///
/// Fields the server adds are ignored; missing or `null` fields decode to
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatCompletionResponse
{   #[serde(deserialize_with = "null_as_default")]
    pub id: String
  , #[serde(deserialize_with = "null_as_default")]
    pub object: String
  , /// Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub created: i64
  , #[serde(deserialize_with = "null_as_default")]
    pub model: String
  , #[serde(deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>
  , #[serde(deserialize_with = "null_as_default")]
    pub usage: Usage
}

impl ChatCompletionResponse
{   /// Text of the first choice, if any
    pub fn first_content(&self) -> Option<&str>
    {   self.choices.first().map(|c| c.message.content.as_str())
    }
}

fn null_as_default<'de, D, T>(deserializer: D)
  -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>
  , T: Default + Deserialize<'de>
{   Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ===== Entry point =====

impl crate::client::Client
{   /// Create a completion for the chat history in `request`.
    ///
    /// Fails before any network I/O when `request.stream` is set, when the
    /// model is not served at `/chat/completions`, or when there are no
    /// messages, checked in that order. Otherwise one POST is issued under
    /// `ctx`; nothing is retried.
    pub async fn create_chat_completion(
      &self
    , ctx: &RequestContext
    , request: &ChatCompletionRequest
    ) -> Result<ChatCompletionResponse>
    {   debug!("create_chat_completion for model: {}", request.model);

        if request.stream
        {   error!("Streaming requested on non-streaming path");
            return Err(Error::StreamNotSupportedOnThisPath);
        }

        if !check_endpoint_supports_model(CHAT_COMPLETIONS_SUFFIX, &request.model)
        {   error!("Model not served at {}: {}", CHAT_COMPLETIONS_SUFFIX, request.model);
            return Err(Error::InvalidModelForEndpoint);
        }

        if request.messages.is_empty()
        {   error!("No messages in chat completion request");
            return Err(Error::EmptyMessages);
        }

        let url = self.full_url(CHAT_COMPLETIONS_SUFFIX, &request.model);
        let http_request = self.build_request(Method::POST, &url, request)?;

        let response: ChatCompletionResponse
          = ctx.run(self.send_request(http_request)).await?;

        debug!(
          "Chat completion {} returned {} choices",
          response.id, response.choices.len()
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn roles_map_to_wire_strings()
    {   assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
        let tool: Role = serde_json::from_str(r#""tool""#).unwrap();
        assert_eq!(tool, Role::Other("tool".to_string()));
        assert_eq!(serde_json::to_string(&tool).unwrap(), r#""tool""#);
        assert_eq!(Role::from(ROLE_USER), Role::User);
    }

    #[test]
    fn message_omits_empty_name()
    {   let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);

        let json = serde_json::to_string(
          &Message::system("be brief").with_name("ops")
        ).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"be brief","name":"ops"}"#);
    }

    #[test]
    fn zero_valued_optionals_are_omitted()
    {   let request = ChatCompletionRequest::new(
          "gpt-3.5-turbo",
          vec![Message::user("hi")]
        );
        let value = serde_json::to_value(&request).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(value.get("model").is_some());
        assert!(value.get("messages").is_some());
    }

    #[test]
    fn set_optionals_use_wire_names_in_order()
    {   let request = ChatCompletionRequest
        {   max_tokens: 16
          , temperature: 0.5
          , top_p: 0.25
          , n: 2
          , stop: vec!["\n".to_string()]
          , presence_penalty: 1.0
          , frequency_penalty: -1.0
          , logit_bias: [("50256".to_string(), -100)].into_iter().collect()
          , user: "u-1".to_string()
          , ..ChatCompletionRequest::new("m", vec![Message::user("x")])
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
          json,
          concat!(
            r#"{"model":"m","messages":[{"role":"user","content":"x"}],"#,
            r#""max_tokens":16,"temperature":0.5,"top_p":0.25,"n":2,"#,
            r#""stop":["\n"],"presence_penalty":1.0,"frequency_penalty":-1.0,"#,
            r#""logit_bias":{"50256":-100},"user":"u-1"}"#
          )
        );
    }

    #[test]
    fn default_message_is_an_empty_user_turn()
    {   let json = serde_json::to_string(&Message::default()).unwrap();
        assert_eq!(json, r#"{"role":"user","content":""}"#);
    }

    #[test]
    fn null_scalars_decode_to_defaults()
    {   let body = r#"{
          "id": null, "object": null, "created": null, "model": null,
          "choices": [{"index": null, "message": {"role": null, "content": "hi", "name": null},
                       "finish_reason": "stop"}],
          "usage": null
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.id, "");
        assert_eq!(response.created, 0);
        assert_eq!(response.usage, Usage::default());

        let choice = &response.choices[0];
        assert_eq!(choice.index, 0);
        assert_eq!(choice.message.role, Role::User);
        assert_eq!(choice.message.name, "");
        assert_eq!(choice.message.content, "hi");

        let response: ChatCompletionResponse
          = serde_json::from_str(r#"{"choices": null}"#).unwrap();
        assert!(response.choices.is_empty());
    }

    #[test]
    fn response_tolerates_nulls_and_unknown_fields()
    {   let body = r#"{
          "id": "x", "object": "chat.completion", "created": 1, "model": "m",
          "system_fingerprint": "fp",
          "choices": [{"index": 0, "message": {"role": "assistant", "content": null},
                       "finish_reason": null, "logprobs": null}]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].finish_reason, "");
        assert_eq!(response.first_content(), Some(""));
        assert_eq!(response.usage, Usage::default());
    }
}
