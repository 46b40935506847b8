//! Blocking HTTP helpers shared by the remote service clients.
//!
//! Calls made through [`HttpClient`] are expected to run on a background
//! task pool, never on the main schedule.

use std::io::Read;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::constants::MAX_IMAGE_BYTES;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Thin wrapper over a `ureq` agent carrying the configured user agent.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().user_agent(user_agent).build(),
        }
    }

    fn call(&self, url: &str, query: &[(&str, &str)]) -> Result<ureq::Response, NetError> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        match request.call() {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, _)) => Err(NetError::Status {
                status,
                url: url.to_string(),
            }),
            Err(e) => Err(NetError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// GET `url` with `query` parameters and deserialize the JSON body.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, NetError> {
        self.call(url, query)?
            .into_json::<T>()
            .map_err(|e| NetError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    /// GET `url` and return the raw body.
    pub fn get_bytes(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, NetError> {
        let response = self.call(url, query)?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_IMAGE_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| NetError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(bytes)
    }
}
