use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::core::error::FxError;

const USER_AGENT: &str = "fxpair/1.0";

/// Issues a GET request and decodes the JSON body.
///
/// Transport failures and non-success statuses map to `FxError::Network`, bodies
/// that do not match `T` to `FxError::InvalidResponse`.
pub async fn get_json<T: DeserializeOwned>(url: &str, bearer: Option<&str>) -> Result<T, FxError> {
    debug!("Requesting {}", url);

    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let mut request = client.get(url);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|e| FxError::Network(format!("Request error: {e} for URL: {url}")))?;

    if !response.status().is_success() {
        return Err(FxError::Network(format!(
            "HTTP error: {} for URL: {}",
            response.status(),
            url
        )));
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        error!(error = ?e, response = %text, "Failed to parse response");
        FxError::InvalidResponse(format!("Failed to parse JSON response for {url}: {e}"))
    })
}

/// Checks a converted amount returned by an upstream API.
pub fn validate_converted(value: f64, from: &str, to: &str) -> Result<f64, FxError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FxError::InvalidResponse(format!(
            "Converted amount {value} is not valid for {from}{to}"
        )))
    }
}
