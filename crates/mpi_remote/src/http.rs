//! [`Transport`] over HTTP with `reqwest`.

use crate::error::TransportError;
use crate::transport::{Envelope, Response, Transport, Verb};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

/// HTTP client sending envelopes as JSON bodies.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing client (timeouts, proxies, TLS).
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl core::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        uri: &str,
        verb: Verb,
        envelope: &Envelope,
    ) -> Result<Response, TransportError> {
        let url = reqwest::Url::parse(uri)
            .map_err(|err| TransportError::InvalidUri(format!("{uri}: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let request = match verb {
            Verb::Post => self.client.post(url),
            Verb::Patch => self.client.patch(url),
        };

        tracing::debug!(uri, %verb, method = %envelope.method, "sending envelope");
        let response = request
            .headers(headers)
            .json(envelope)
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpi_meta::Meta;

    #[tokio::test]
    async fn rejects_unparseable_uris() {
        let transport = HttpTransport::new();
        let env = Envelope::new("find", Meta::new("User"), Meta::nil());
        let err = transport.send("not a uri", Verb::Post, &env).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUri(_)));
    }
}
