//! Mobile verification gateway over HTTP.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use vf_core::domain::entities::verification_session::VerificationSession;
use vf_core::errors::FlowResult;
use vf_core::gateways::mobile::MobileVerificationGateway;
use vf_core::gateways::types::{
    InitiateMobileVerification, MobileVerificationStatus, ResendReceipt,
};

use super::client::HttpClient;

#[derive(Debug, Serialize)]
struct CodeBody<'a> {
    code: &'a str,
}

/// [`MobileVerificationGateway`] implementation against the account
/// service. The push channel lives in [`crate::sse`], not here.
pub struct HttpMobileVerificationGateway {
    client: Arc<HttpClient>,
}

impl HttpMobileVerificationGateway {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MobileVerificationGateway for HttpMobileVerificationGateway {
    async fn initiate(
        &self,
        request: InitiateMobileVerification,
    ) -> FlowResult<VerificationSession> {
        self.client
            .post("/mobile-verification/initiate", &request)
            .await
    }

    async fn resend(&self) -> FlowResult<ResendReceipt> {
        self.client.post_empty("/mobile-verification/resend").await
    }

    async fn verify_otp(&self, code: &str) -> FlowResult<MobileVerificationStatus> {
        self.client
            .post("/mobile-verification/verify-otp", &CodeBody { code })
            .await
    }

    async fn status(&self) -> FlowResult<MobileVerificationStatus> {
        self.client.get("/mobile-verification/status").await
    }
}
