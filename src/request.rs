//! Response pieces shared across endpoints

use serde::{Deserialize, Serialize};
use log::error;

/// Token accounting for one exchange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage
{   pub prompt_tokens: u32
  , pub completion_tokens: u32
  , pub total_tokens: u32
}

/// Error envelope returned with a failure status
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse
{   pub error: Option<ApiErrorBody>
}

/// Body of the error envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody
{   #[serde(default)]
    pub message: String
  , #[serde(default, rename = "type")]
    pub kind: String
  , #[serde(default)]
    pub param: Option<String>
  , /// Either a string or a number on the wire
    #[serde(default)]
    pub code: Option<serde_json::Value>
}

impl ApiErrorBody
{   fn code_string(&self) -> Option<String>
    {   match &self.code
        {   None | Some(serde_json::Value::Null) => None
          , Some(serde_json::Value::String(s)) => Some(s.clone())
          , Some(other) => Some(other.to_string())
        }
    }
}

/// Map a failed exchange to an error, preferring the API envelope
pub(crate) fn error_from_body(
  status: u16
, body: &[u8]
) -> crate::error::Error
{   match serde_json::from_slice::<ErrorResponse>(body)
    {   Ok(ErrorResponse { error: Some(api) }) => {
          error!("API error ({}): {}", status, api.message);
          let code = api.code_string();
          crate::error::Error::ApiError
          {   status
            , message: api.message
            , kind: api.kind
            , param: api.param
            , code
          }
        }
      , _ => {
          let body = String::from_utf8_lossy(body).into_owned();
          error!("Request failed ({}): {}", status, body);
          crate::error::Error::RequestError { status, body }
        }
    }
}
