//! Pass-through forwarding for the generic proxy endpoint.

use bytes::Bytes;
use reqwest::{header, Client, Method, Url};

use crate::error::{ClientError, ClientResult};

/// What the upstream answered, untouched.
#[derive(Clone, Debug)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Only absolute http(s) URLs are forwarded.
pub fn parse_target(raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ClientError::InvalidUrl(format!(
            "{raw}: only http and https targets are allowed"
        ))),
    }
}

/// Forward one request. Upstream error statuses are returned as-is, not as
/// errors; only transport failures fail.
pub async fn forward(
    client: &Client,
    method: Method,
    target: &str,
    content_type: Option<&str>,
    body: Bytes,
) -> ClientResult<ProxyResponse> {
    let url = parse_target(target)?;
    tracing::debug!(%method, %url, bytes = body.len(), "forwarding");

    let mut request = client.request(method, url);
    if let Some(ct) = content_type {
        request = request.header(header::CONTENT_TYPE, ct);
    }
    if !body.is_empty() {
        request = request.body(body);
    }
    let response = request.send().await?;

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.bytes().await?;
    Ok(ProxyResponse {
        status,
        content_type,
        body,
    })
}
