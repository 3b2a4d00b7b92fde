//! Fetching raw burn proofs from a notary node over JSON-RPC.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use bytes::Bytes;
use serde::Serialize;
use tower::{retry::Retry, Service, ServiceExt as _};
use tracing::{debug, info};
use url::Url;

use crate::error::NetworkError;

pub mod cli;
pub mod retry;

use retry::RetryPolicy;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One proof lookup: which node to ask, with which RPC method, for which burn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRequest {
    pub endpoint: Url,
    pub method: String,
    pub burn_reference: String,
}

impl ProofRequest {
    pub fn new(
        endpoint: &str,
        method: impl Into<String>,
        burn_reference: impl Into<String>,
    ) -> Result<Self, NetworkError> {
        let burn_reference = burn_reference.into();
        if burn_reference.is_empty() {
            return Err(NetworkError::EmptyBurnReference);
        }
        let endpoint = Url::parse(endpoint).map_err(|source| NetworkError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            source,
        })?;
        Ok(Self {
            endpoint,
            method: method.into(),
            burn_reference,
        })
    }

    fn body(&self) -> RpcRequest<'_> {
        RpcRequest {
            id: 1,
            jsonrpc: "1.0",
            method: &self.method,
            params: [&self.burn_reference],
        }
    }
}

/// Field order is the order on the wire.
#[derive(Serialize, Debug)]
struct RpcRequest<'a> {
    id: u32,
    jsonrpc: &'static str,
    method: &'a str,
    params: [&'a str; 1],
}

/// Anything that can turn a [`ProofRequest`] into a raw response body.
pub trait ProofSource {
    fn fetch_proof(
        &self,
        request: &ProofRequest,
    ) -> impl Future<Output = Result<Bytes, NetworkError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotaryConfig {
    /// Upper bound on a single attempt, connection included.
    pub timeout: Duration,
    /// Pause between attempts.
    pub backoff: Duration,
    /// Attempts after the first. Only transient failures are retried, and a
    /// retry re-sends the identical request.
    pub max_retries: u32,
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            backoff: Duration::ZERO,
            max_retries: 0,
        }
    }
}

/// HTTP client for a notary node.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct NotaryClient {
    http: reqwest::Client,
    config: NotaryConfig,
}

impl NotaryClient {
    pub fn new(config: NotaryConfig) -> Result<Self, NetworkError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(NetworkError::Transport)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &NotaryConfig {
        &self.config
    }

    /// POSTs the request and returns the full body, unparsed.
    pub async fn fetch(&self, request: &ProofRequest) -> Result<Bytes, NetworkError> {
        let service = Retry::new(
            RetryPolicy::new(self.config.backoff, self.config.max_retries),
            NotaryService {
                http: self.http.clone(),
                timeout: self.config.timeout,
            },
        );
        let body = service.oneshot(request.clone()).await?;
        info!(
            burn_reference = %request.burn_reference,
            len = body.len(),
            "fetched burn proof"
        );
        Ok(body)
    }

    /// Like [`Self::fetch`], but gives up with [`NetworkError::Cancelled`] as
    /// soon as `cancel` completes.
    pub async fn fetch_with_cancel(
        &self,
        request: &ProofRequest,
        cancel: impl Future<Output = ()>,
    ) -> Result<Bytes, NetworkError> {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!(burn_reference = %request.burn_reference, "burn proof fetch cancelled");
                Err(NetworkError::Cancelled)
            }
            res = self.fetch(request) => res,
        }
    }
}

impl ProofSource for NotaryClient {
    async fn fetch_proof(&self, request: &ProofRequest) -> Result<Bytes, NetworkError> {
        self.fetch(request).await
    }
}

/// Fetches a burn proof with a default [`NotaryClient`].
pub async fn fetch(
    endpoint: &str,
    method: &str,
    burn_reference: &str,
) -> Result<Bytes, NetworkError> {
    let request = ProofRequest::new(endpoint, method, burn_reference)?;
    NotaryClient::new(NotaryConfig::default())?
        .fetch(&request)
        .await
}

/// A single attempt, as a [`Service`] so [`RetryPolicy`] can wrap it.
#[derive(Debug, Clone)]
struct NotaryService {
    http: reqwest::Client,
    timeout: Duration,
}

impl Service<ProofRequest> for NotaryService {
    type Response = Bytes;
    type Error = NetworkError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ProofRequest) -> Self::Future {
        let http = self.http.clone();
        let timeout = self.timeout;
        Box::pin(async move {
            debug!(
                endpoint = %request.endpoint,
                method = %request.method,
                burn_reference = %request.burn_reference,
                "requesting burn proof"
            );
            let response = http
                .post(request.endpoint.clone())
                .json(&request.body())
                .send()
                .await
                .map_err(|e| NetworkError::from_reqwest(e, timeout))?;

            let status = response.status();
            if !status.is_success() {
                return Err(NetworkError::Status(status));
            }
            response
                .bytes()
                .await
                .map_err(|e| NetworkError::from_reqwest(e, timeout))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn body_matches_the_notary_wire_format() {
        let request =
            ProofRequest::new("http://127.0.0.1:9334", "getsolburnproof", "c0ffee").unwrap();
        assert_eq!(
            serde_json::to_string(&request.body()).unwrap(),
            r#"{"id":1,"jsonrpc":"1.0","method":"getsolburnproof","params":["c0ffee"]}"#
        );
    }

    #[test]
    fn empty_burn_reference_is_rejected_before_sending() {
        assert!(matches!(
            ProofRequest::new("http://127.0.0.1:9334", "getsolburnproof", "").unwrap_err(),
            NetworkError::EmptyBurnReference
        ));
    }

    #[test]
    fn endpoint_must_be_a_url() {
        assert!(matches!(
            ProofRequest::new("not a url", "getsolburnproof", "c0ffee").unwrap_err(),
            NetworkError::InvalidEndpoint { .. }
        ));
    }
}
