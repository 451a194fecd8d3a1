//! Client configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use log::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_ORG_ID: &str = "OPENAI_ORG_ID";

fn default_base_url() -> String
{   DEFAULT_BASE_URL.to_string()
}

/// Where to send requests and which credentials to attach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig
{   /// API base URL, endpoint suffixes are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String
  , /// Bearer token sent as `Authorization`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>
  , /// Organization sent as `OpenAI-Organization`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   base_url: default_base_url()
          , api_key: None
          , org_id: None
        }
    }
}

impl ClientConfig
{   /// Config for the default base URL with `api_key`
    pub fn new(api_key: impl Into<String>) -> Self
    {   ClientConfig
        {   api_key: Some(api_key.into())
          , ..ClientConfig::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self
    {   self.base_url = base_url.into();
        self
    }

    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self
    {   self.org_id = Some(org_id.into());
        self
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_ORG_ID`
    pub fn from_env() -> Self
    {   Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>
    {   let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let config = ClientConfig
        {   base_url: get(ENV_BASE_URL).unwrap_or_else(default_base_url)
          , api_key: get(ENV_API_KEY)
          , org_id: get(ENV_ORG_ID)
        };
        debug!(
          "Config from environment: base_url={}, api_key set: {}",
          config.base_url, config.api_key.is_some()
        );
        config
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>)
      -> crate::error::Result<Self>
    {   let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
          error!("Failed to read config {}: {}", path.display(), e);
          crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })?;
        let config: ClientConfig = serde_json::from_str(&text)
          .map_err(|e| {
            error!("Failed to parse config {}: {}", path.display(), e);
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the base URL is usable
    pub fn validate(&self) -> crate::error::Result<()>
    {   let url = self.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://"))
        {   error!("Invalid base URL: {}", url);
            return Err(crate::error::Error::InvalidConfiguration(
              format!("base_url must be http(s): {:?}", url)
            ));
        }
        Ok(())
    }
}
