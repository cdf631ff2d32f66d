//! Password-reset gateway over HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use vf_core::errors::FlowResult;
use vf_core::gateways::reset::PasswordResetGateway;
use vf_core::gateways::types::{ResendReceipt, ResetSession};
use vf_shared::types::SubjectId;

use super::client::HttpClient;

#[derive(Debug, Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionCodeBody<'a> {
    session_id: &'a str,
    code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody<'a> {
    session_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteBody<'a> {
    reset_token: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetTokenDto {
    reset_token: String,
}

/// [`PasswordResetGateway`] implementation against the account service
pub struct HttpPasswordResetGateway {
    client: Arc<HttpClient>,
}

impl HttpPasswordResetGateway {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PasswordResetGateway for HttpPasswordResetGateway {
    async fn request(&self, email: &str) -> FlowResult<ResetSession> {
        self.client
            .post("/auth/password-reset/request", &EmailBody { email })
            .await
    }

    async fn verify_otp(&self, session_id: &SubjectId, code: &str) -> FlowResult<String> {
        let dto: ResetTokenDto = self
            .client
            .post(
                "/auth/password-reset/verify-otp",
                &SessionCodeBody {
                    session_id: session_id.as_str(),
                    code,
                },
            )
            .await?;
        Ok(dto.reset_token)
    }

    async fn resend_otp(&self, session_id: &SubjectId) -> FlowResult<ResendReceipt> {
        self.client
            .post(
                "/auth/password-reset/resend-otp",
                &SessionBody {
                    session_id: session_id.as_str(),
                },
            )
            .await
    }

    async fn complete(&self, reset_token: &str, new_password: &str) -> FlowResult<()> {
        self.client
            .post_unit(
                "/auth/password-reset/complete",
                &CompleteBody {
                    reset_token,
                    new_password,
                },
            )
            .await
    }
}
