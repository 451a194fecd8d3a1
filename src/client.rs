use serde::de::DeserializeOwned;
use serde::Serialize;
use reqwest::{header, Method};
use log::{debug, trace, error};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

/// HTTP client bound to one API base URL and credential set.
///
/// Cheap to clone; clones share the connection pool. Holds no per-call
/// state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Client
{   config: ClientConfig
  , http_client: reqwest::Client
}

impl Client
{   /// Create a client for `config`
    pub fn new(config: ClientConfig) -> Result<Self>
    {   Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a client reusing an existing reqwest client
    pub fn with_http_client(
      config: ClientConfig
    , http_client: reqwest::Client
    ) -> Result<Self>
    {   config.validate()?;
        debug!("Creating Client for {}", config.base_url);
        Ok(Client
        {   config
          , http_client
        })
    }

    /// Client configured from `OPENAI_*` environment variables
    pub fn from_env() -> Result<Self>
    {   Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig
    {   &self.config
    }

    /// URL for an endpoint suffix such as `/chat/completions`.
    ///
    /// The model is not part of the path for this API.
    pub fn full_url(&self, suffix: &str, _model: &str) -> String
    {   format!("{}{}", self.config.base_url.trim_end_matches('/'), suffix)
    }

    /// Build a request with a JSON body and the configured credentials
    pub fn build_request<B>(
      &self
    , method: Method
    , url: &str
    , body: &B
    ) -> Result<reqwest::Request>
    where
        B: Serialize + ?Sized
    {   let body = serde_json::to_vec(body).map_err(|e| {
          error!("Failed to encode request: {}", e);
          Error::ParseError(e.to_string())
        })?;
        trace!("{} {} body: {}", method, url, String::from_utf8_lossy(&body));

        let mut builder = self.http_client
          .request(method, url)
          .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
          .header(header::ACCEPT, JSON_CONTENT_TYPE)
          .body(body);

        if let Some(key) = &self.config.api_key
        {   builder = builder.bearer_auth(key);
        }
        if let Some(org) = &self.config.org_id
        {   builder = builder.header(ORGANIZATION_HEADER, org);
        }

        builder.build().map_err(|e| {
          error!("Failed to build request: {}", e);
          Error::HttpError(e.to_string())
        })
    }

    /// Execute `request` and decode a successful body as `T`.
    ///
    /// Statuses below 200 or from 400 up are failures and are turned into
    /// `ApiError` or `RequestError`.
    pub async fn send_request<T>(&self, request: reqwest::Request)
      -> Result<T>
    where
        T: DeserializeOwned
    {   debug!("Sending {} {}", request.method(), request.url());

        let response = self.http_client
          .execute(request)
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("Response status: {}", status);

        let body = response.bytes().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          Error::HttpError(e.to_string())
        })?;

        if status.as_u16() < 200 || status.as_u16() >= 400
        {   return Err(crate::request::error_from_body(
              status.as_u16(),
              &body
            ));
        }

        serde_json::from_slice(&body).map_err(|e| {
          error!("Parse error: {}", e);
          Error::ParseError(e.to_string())
        })
    }
}
