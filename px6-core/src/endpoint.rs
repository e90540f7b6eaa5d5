use url::Url;

use crate::config::{ApiKey, ClientConfig};
use crate::error::Result;

/// Address builder for one API key.
#[derive(Clone)]
pub struct Endpoint {
    // `<base_url>/<key>/`, trailing slash included so operations join under it
    root: Url,
}

impl Endpoint {
    pub fn new(config: &ClientConfig, api_key: &ApiKey) -> Result<Self> {
        let mut root = Url::parse(&config.base_url)?;
        root.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(api_key.as_str())
            .push("");
        Ok(Endpoint { root })
    }

    /// `<base_url>/<key>/<operation>`
    pub fn operation_url(&self, operation: &str) -> Result<Url> {
        Ok(self.root.join(operation)?)
    }

    /// `<base_url>/<key>`, the account status address.
    pub fn status_url(&self) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
        }
        url
    }
}

// The URL embeds the key, so it is never printed.
impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.root.host_str())
            .finish_non_exhaustive()
    }
}
