//! Server credentials resolution

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;
use url::Url;

use crate::errors::ActionError;

/// Credentials for the publishing server
#[derive(Debug, Clone)]
pub struct Credentials {
    /// API key
    pub api_key: SecretString,

    /// Server URL, never carrying credentials
    pub base_url: Url,
}

impl Credentials {
    /// Resolve credentials from the configured server URL and API key.
    ///
    /// A non-empty password in the URL takes precedence, then a non-empty
    /// username, then `configured_key`. Both URL components are removed from
    /// the returned URL.
    pub fn resolve(raw_url: &str, configured_key: &str) -> Result<Self, ActionError> {
        let mut url = Url::parse(raw_url)?;
        if url.cannot_be_a_base() {
            return Err(ActionError::InvalidUrl(format!(
                "{} cannot carry a server address",
                url.scheme()
            )));
        }

        let key_specified = !configured_key.is_empty();
        let password = url.password().filter(|p| !p.is_empty()).map(str::to_string);
        let username = Some(url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        let api_key = if let Some(password) = password {
            if key_specified {
                warn!("using api key from URL password instead of api-key input");
            }
            password
        } else if let Some(username) = username {
            if key_specified {
                warn!("using api key from URL username instead of api-key input");
            }
            username
        } else {
            configured_key.to_string()
        };

        url.set_password(None)
            .and_then(|_| url.set_username(""))
            .map_err(|_| ActionError::InvalidUrl("unable to strip URL credentials".to_string()))?;

        if api_key.is_empty() {
            warn!("no api key configured, requests will be unauthenticated");
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url: url,
        })
    }

    /// Value for the `Authorization` header, none without an API key
    pub fn authorization(&self) -> Option<String> {
        let key = self.api_key.expose_secret();
        (!key.is_empty()).then(|| format!("Key {}", key))
    }

    /// Root of the server API
    pub fn api_root(&self) -> String {
        format!("{}/__api__", self.base_url.as_str().trim_end_matches('/'))
    }
}
