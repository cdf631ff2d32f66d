//! HTTP transport for the account service.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;
use std::time::Duration;
use tracing;
use uuid::Uuid;

use vf_core::errors::{CeremonyError, ChallengeError, FlowError, FlowResult};
use vf_shared::config::endpoints::EndpointsConfig;
use vf_shared::types::response::{error_codes, ApiResponse, ErrorResponse};

/// Thin wrapper around reqwest carrying the base URL, the bearer
/// credential, and the response-envelope handling every gateway shares.
///
/// Server error codes are mapped to flow errors here, once, so gateway
/// implementations stay mechanical.
pub struct HttpClient {
    http: reqwest::Client,
    endpoints: EndpointsConfig,
    bearer: RwLock<Option<String>>,
}

impl HttpClient {
    pub fn new(endpoints: EndpointsConfig) -> FlowResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoints.request_timeout_secs))
            .build()
            .map_err(|e| FlowError::Internal {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            http,
            endpoints,
            bearer: RwLock::new(None),
        })
    }

    pub fn endpoints(&self) -> &EndpointsConfig {
        &self.endpoints
    }

    /// Install the access credential returned by login/signup
    pub fn set_bearer(&self, token: impl Into<String>) {
        *self.bearer.write().unwrap() = Some(token.into());
    }

    pub fn clear_bearer(&self) {
        *self.bearer.write().unwrap() = None;
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> FlowResult<T> {
        let request = self.http.get(self.endpoints.url(path));
        self.require_data(path, request).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> FlowResult<T> {
        let request = self.http.post(self.endpoints.url(path)).json(body);
        self.require_data(path, request).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> FlowResult<T> {
        let request = self.http.post(self.endpoints.url(path));
        self.require_data(path, request).await
    }

    /// POST whose success carries no payload of interest
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> FlowResult<()> {
        let request = self.http.post(self.endpoints.url(path)).json(body);
        self.execute::<serde_json::Value>(path, request).await?;
        Ok(())
    }

    async fn require_data<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> FlowResult<T> {
        self.execute(path, request).await?.ok_or(FlowError::Gateway {
            message: "success response without data".to_string(),
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        mut request: reqwest::RequestBuilder,
    ) -> FlowResult<Option<T>> {
        if let Some(token) = self.bearer.read().unwrap().as_deref() {
            request = request.bearer_auth(token);
        }
        let request_id = Uuid::new_v4();
        tracing::debug!(
            path = path,
            request_id = %request_id,
            event = "api_request",
            "Calling account service"
        );

        let response = request
            .header("X-Request-Id", request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    path = path,
                    request_id = %request_id,
                    error = %e,
                    event = "api_transport_error",
                    "Account service unreachable"
                );
                FlowError::Gateway {
                    message: e.to_string(),
                }
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(FlowError::SessionExpired),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(ChallengeError::RateLimited { retry_after_secs }.into());
            }
            _ => {}
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            tracing::warn!(
                path = path,
                request_id = %request_id,
                error = %e,
                event = "api_decode_error",
                "Undecodable account service response"
            );
            FlowError::Gateway {
                message: e.to_string(),
            }
        })?;

        if envelope.success {
            return Ok(envelope.data);
        }
        let error = envelope.error.unwrap_or_else(|| {
            ErrorResponse::new("UNKNOWN", "failure response without error payload")
        });
        Err(map_error_response(&error))
    }
}

/// Map a server error payload to a flow error by its code
fn map_error_response(error: &ErrorResponse) -> FlowError {
    let detail_u32 = |key: &str| -> Option<u32> {
        error
            .details
            .as_ref()
            .and_then(|details| details.get(key))
            .and_then(|value| value.as_u64())
            .map(|value| value as u32)
    };

    match error.error.as_str() {
        error_codes::INVALID_VERIFICATION_CODE => ChallengeError::InvalidCode {
            remaining_attempts: detail_u32("remainingAttempts").map(|v| v as i32),
        }
        .into(),
        error_codes::VERIFICATION_CODE_EXPIRED => ChallengeError::CodeExpired.into(),
        error_codes::CHALLENGE_EXPIRED => ChallengeError::ChallengeExpired.into(),
        error_codes::MAX_ATTEMPTS_EXCEEDED => ChallengeError::MaxAttemptsExceeded.into(),
        error_codes::RATE_LIMIT_EXCEEDED => ChallengeError::RateLimited {
            retry_after_secs: detail_u32("retryAfterSecs").unwrap_or(60) as u64,
        }
        .into(),
        error_codes::QUOTA_EXCEEDED => ChallengeError::QuotaExceeded {
            requests_today: detail_u32("requestsToday").unwrap_or(0),
            daily_cap: detail_u32("dailyCap").unwrap_or(3),
        }
        .into(),
        error_codes::SESSION_EXPIRED => FlowError::SessionExpired,
        error_codes::CREDENTIAL_EXISTS => CeremonyError::CredentialExists.into(),
        error_codes::REVERT_TOKEN_USED | error_codes::REVERT_TOKEN_EXPIRED => {
            ChallengeError::RevertTokenInvalid.into()
        }
        _ => FlowError::Gateway {
            message: error.message.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test_logging() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn error_with(code: &str, details: &[(&str, u64)]) -> ErrorResponse {
        let mut error = ErrorResponse::new(code, "server text");
        for (key, value) in details {
            error = error.add_detail(*key, *value);
        }
        error
    }

    #[test]
    fn test_challenge_codes_map_to_challenge_errors() {
        init_test_logging();
        assert_eq!(
            map_error_response(&error_with(
                error_codes::INVALID_VERIFICATION_CODE,
                &[("remainingAttempts", 2)]
            )),
            ChallengeError::InvalidCode {
                remaining_attempts: Some(2)
            }
            .into()
        );
        assert_eq!(
            map_error_response(&error_with(error_codes::VERIFICATION_CODE_EXPIRED, &[])),
            ChallengeError::CodeExpired.into()
        );
    }

    #[test]
    fn test_quota_code_carries_counters() {
        let mapped = map_error_response(&error_with(
            error_codes::QUOTA_EXCEEDED,
            &[("requestsToday", 3), ("dailyCap", 3)],
        ));
        assert_eq!(
            mapped,
            ChallengeError::QuotaExceeded {
                requests_today: 3,
                daily_cap: 3
            }
            .into()
        );
    }

    #[test]
    fn test_session_expiry_is_fatal() {
        let mapped = map_error_response(&error_with(error_codes::SESSION_EXPIRED, &[]));
        assert!(mapped.is_fatal());
    }

    #[test]
    fn test_revert_token_codes_collapse_to_single_use_error() {
        for code in [error_codes::REVERT_TOKEN_USED, error_codes::REVERT_TOKEN_EXPIRED] {
            assert_eq!(
                map_error_response(&error_with(code, &[])),
                ChallengeError::RevertTokenInvalid.into()
            );
        }
    }

    #[test]
    fn test_unknown_codes_become_gateway_errors() {
        let mapped = map_error_response(&ErrorResponse::new("SOMETHING_NEW", "server text"));
        assert_eq!(
            mapped,
            FlowError::Gateway {
                message: "server text".to_string()
            }
        );
    }
}
