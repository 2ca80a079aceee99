//! Shared HTTP client construction and error mapping.

use std::time::Duration;

use reqwest::{redirect, Client, Url};
use stookwijzer_common::{StookwijzerError, StookwijzerResult};

/// Build a client that performs a single, bounded, non-redirecting GET.
pub(crate) fn build_client(timeout: Duration, verify_tls: bool) -> StookwijzerResult<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(redirect::Policy::none())
        .danger_accept_invalid_certs(!verify_tls)
        .build()
        .map_err(|e| StookwijzerError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))
}

/// Append query parameters to a base endpoint.
pub(crate) fn endpoint_url<I, K, V>(base: &str, params: I) -> StookwijzerResult<Url>
where
    I: IntoIterator,
    I::Item: std::borrow::Borrow<(K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Url::parse_with_params(base, params)
        .map_err(|e| StookwijzerError::InvalidConfig(format!("Invalid endpoint {}: {}", base, e)))
}

pub(crate) fn map_request_error(err: reqwest::Error) -> StookwijzerError {
    if err.is_timeout() {
        StookwijzerError::Timeout(err.to_string())
    } else if err.is_decode() {
        StookwijzerError::MalformedResponse(err.to_string())
    } else {
        StookwijzerError::Network(err.to_string())
    }
}

/// Send a GET and return the body of a 2xx response.
pub(crate) async fn get_bytes(client: &Client, url: Url) -> StookwijzerResult<bytes::Bytes> {
    let response = client.get(url).send().await.map_err(map_request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(StookwijzerError::Network(format!("HTTP {}", status)));
    }

    response.bytes().await.map_err(map_request_error)
}
