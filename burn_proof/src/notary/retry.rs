use std::{future::Future, pin::Pin, time::Duration};

use bytes::Bytes;
use tower::retry::Policy;
use tracing::warn;

use super::ProofRequest;
use crate::error::NetworkError;

/// Re-sends a proof request after transient failures, waiting `backoff`
/// before every attempt, at most `max_retries` times.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    backoff: Duration,
    retries: u32,
    max_retries: u32,
}

impl RetryPolicy {
    pub fn new(backoff: Duration, max_retries: u32) -> Self {
        Self {
            backoff,
            retries: 0,
            max_retries,
        }
    }

    pub fn backoff(&self) -> tokio::time::Sleep {
        tokio::time::sleep(self.backoff)
    }
}

impl Policy<ProofRequest, Bytes, NetworkError> for RetryPolicy {
    type Future = Pin<Box<dyn Future<Output = Self> + Send + 'static>>;

    fn retry(
        &self,
        req: &ProofRequest,
        result: Result<&Bytes, &NetworkError>,
    ) -> Option<Self::Future> {
        match result {
            Err(err) if err.is_transient() && self.retries < self.max_retries => {
                warn!(
                    burn_reference = %req.burn_reference,
                    attempt = self.retries + 1,
                    max_retries = self.max_retries,
                    "retrying burn proof fetch: {err}"
                );
                let mut policy = self.clone();
                Some(Box::pin(async move {
                    policy.backoff().await;
                    policy.retries += 1;
                    policy
                }))
            }
            _ => None,
        }
    }

    fn clone_request(&self, req: &ProofRequest) -> Option<ProofRequest> {
        Some(req.clone())
    }
}
