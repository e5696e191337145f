use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// The handful of calls the portal needs. Implementations must replay any
/// cookies the server sets on every later call.
pub trait HttpSession {
    fn get(&self, url: &str) -> Result<String, SessionError>;

    fn post_form(&self, url: &str, fields: &HashMap<String, String>)
    -> Result<String, SessionError>;

    /// Fails with [`SessionError::Status`] on a non-success status, since the
    /// JSON endpoints carry no usable body then.
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String, SessionError>;
}

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Debug, Clone)]
pub struct PortalSession {
    client: Client,
}

impl PortalSession {
    pub fn new() -> Result<Self, SessionError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client })
    }
}

impl HttpSession for PortalSession {
    fn get(&self, url: &str) -> Result<String, SessionError> {
        log::debug!("GET {}", url);
        Ok(self
            .client
            .get(url)
            .send()
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .text()
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }

    fn post_form(
        &self,
        url: &str,
        fields: &HashMap<String, String>,
    ) -> Result<String, SessionError> {
        log::debug!("POST {} ({} form fields)", url, fields.len());
        Ok(self
            .client
            .post(url)
            .form(fields)
            .send()
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .text()
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String, SessionError> {
        log::debug!("POST {} {}", url, body);
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body.to_string())
            .send()
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response
            .text()
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
