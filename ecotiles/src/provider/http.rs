//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::types::ProviderError;

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request with Bearer token authentication.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `bearer_token` - Sent as `Authorization: Bearer <token>`
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an async HTTP POST request with a JSON body and Bearer token.
    fn post_json_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Default User-Agent string for HTTP requests.
const DEFAULT_USER_AGENT: &str = concat!("ecotiles/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create async HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    async fn execute(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, ProviderError> {
        trace!(url = url, "HTTP request starting");

        let response = match request.send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(request_error(e));
            }
        };

        // Check HTTP status
        if !response.status().is_success() {
            warn!(
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(ProviderError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        // Read response body
        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(request_error(e))
            }
        }
    }
}

fn request_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::HttpError(format!("Request failed: {}", e))
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let request = self.client.get(url).bearer_auth(bearer_token);
        self.execute(url, request).await
    }

    async fn post_json_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
        json_body: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let request = self
            .client
            .post(url)
            .bearer_auth(bearer_token)
            .header("Content-Type", "application/json")
            .body(json_body.to_string());
        self.execute(url, request).await
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A request observed by [`MockAsyncHttpClient`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: &'static str,
        pub url: String,
        pub bearer: Option<String>,
        pub body: Option<String>,
    }

    /// Mock async HTTP client replaying queued responses in order.
    #[derive(Default)]
    pub struct MockAsyncHttpClient {
        responses: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockAsyncHttpClient {
        pub fn with_responses(responses: Vec<Result<Vec<u8>, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn respond(&self, request: RecordedRequest) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::HttpError("no scripted response".into())))
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get_with_bearer(
            &self,
            url: &str,
            bearer_token: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            self.respond(RecordedRequest {
                method: "GET",
                url: url.to_string(),
                bearer: Some(bearer_token.to_string()),
                body: None,
            })
        }

        async fn post_json_with_bearer(
            &self,
            url: &str,
            bearer_token: &str,
            json_body: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            self.respond(RecordedRequest {
                method: "POST",
                url: url.to_string(),
                bearer: Some(bearer_token.to_string()),
                body: Some(json_body.to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_mock_async_client_success() {
        let mock = MockAsyncHttpClient::with_responses(vec![Ok(vec![1, 2, 3, 4])]);

        let result = mock.get_with_bearer("http://example.com", "t").await;
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.requests()[0].method, "GET");
        assert_eq!(mock.requests()[0].bearer.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_mock_async_client_error() {
        let mock = MockAsyncHttpClient::with_responses(vec![Err(ProviderError::HttpError(
            "Test error".to_string(),
        ))]);

        let result = mock
            .post_json_with_bearer("http://example.com", "t", "{}")
            .await;
        assert!(result.is_err());
        assert_eq!(mock.requests()[0].body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(AsyncReqwestClient::with_timeout(5).is_ok());
    }
}
