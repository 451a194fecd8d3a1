use std::fmt;

/// Error type for chat completion operations
/// Clone + PartialEq so whole results can be compared in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Streaming was requested on the non-streaming entry point
    StreamNotSupportedOnThisPath
  , /// Model is not offered at the requested endpoint
    InvalidModelForEndpoint
  , /// Request carries no messages
    EmptyMessages
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// HTTP transport error (connect, TLS, body read)
    HttpError(String)
  , /// API returned a structured error envelope
    ApiError
    {   status: u16
      , message: String
      , kind: String
      , param: Option<String>
      , code: Option<String>
    }
  , /// API returned a failure status without a readable envelope
    RequestError
    {   status: u16
      , body: String
    }
  , /// Failed to encode a request or decode a response
    ParseError(String)
  , /// The request context was cancelled
    Cancelled
  , /// The request context deadline passed
    DeadlineExceeded
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::StreamNotSupportedOnThisPath => {
              write!(f,
                "streaming is not supported with this method, \
                 please use a streaming chat completion"
              )
            }
          , Error::InvalidModelForEndpoint => {
              write!(f,
                "this model is not supported with this method, \
                 please use the completions endpoint instead"
              )
            }
          , Error::EmptyMessages => {
              write!(f, "chat completion request has no messages")
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, message, .. } => {
              write!(f,
                "error, status code: {}, message: {}",
                status, message
              )
            }
          , Error::RequestError { status, body } => {
              write!(f,
                "error, status code: {}, message: {}",
                status, body
              )
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::Cancelled => {
              write!(f, "request cancelled")
            }
          , Error::DeadlineExceeded => {
              write!(f, "request deadline exceeded")
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error
{   /// HTTP status of a failed exchange, if the server answered
    pub fn status(&self) -> Option<u16>
    {   match self
        {   Error::ApiError { status, .. }
          | Error::RequestError { status, .. } => Some(*status)
          , _ => None
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
