//! Contact-change gateway over HTTP.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use vf_core::domain::entities::contact_change::ContactChannel;
use vf_core::errors::FlowResult;
use vf_core::gateways::contact::ContactChangeGateway;
use vf_core::gateways::types::{
    ChangeAuthorization, ChangeCompletion, ChangeSubmission, IdentityVerification, ResendReceipt,
};
use vf_shared::types::SubjectId;

use super::client::HttpClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyIdentityBody<'a> {
    verification_id: &'a str,
    otp_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitNewValueBody<'a> {
    change_request_id: &'a str,
    new_value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyNewValueBody<'a> {
    change_request_id: &'a str,
    verification_id: &'a str,
    otp_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResendBody<'a> {
    verification_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RevertBody<'a> {
    revert_token: &'a str,
}

/// [`ContactChangeGateway`] implementation against the account service.
/// The contact channel selects the endpoint family
/// (`/account/email/...` or `/account/phone/...`).
pub struct HttpContactChangeGateway {
    client: Arc<HttpClient>,
}

impl HttpContactChangeGateway {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    fn path(channel: ContactChannel, operation: &str) -> String {
        format!("/account/{}/{}", channel.as_str(), operation)
    }

    fn value_operation(channel: ContactChannel, prefix: &str) -> String {
        match channel {
            ContactChannel::Email => format!("{}-email", prefix),
            ContactChannel::Phone => format!("{}-phone", prefix),
        }
    }
}

#[async_trait]
impl ContactChangeGateway for HttpContactChangeGateway {
    async fn request_identity_verification(
        &self,
        channel: ContactChannel,
    ) -> FlowResult<IdentityVerification> {
        self.client
            .post_empty(&Self::path(channel, "request-identity-verification"))
            .await
    }

    async fn verify_identity(
        &self,
        channel: ContactChannel,
        verification_id: &SubjectId,
        otp_code: &str,
    ) -> FlowResult<ChangeAuthorization> {
        self.client
            .post(
                &Self::path(channel, "verify-identity"),
                &VerifyIdentityBody {
                    verification_id: verification_id.as_str(),
                    otp_code,
                },
            )
            .await
    }

    async fn submit_new_value(
        &self,
        channel: ContactChannel,
        change_request_id: &SubjectId,
        new_value: &str,
    ) -> FlowResult<ChangeSubmission> {
        self.client
            .post(
                &Self::path(channel, &Self::value_operation(channel, "submit-new")),
                &SubmitNewValueBody {
                    change_request_id: change_request_id.as_str(),
                    new_value,
                },
            )
            .await
    }

    async fn verify_new_value(
        &self,
        channel: ContactChannel,
        change_request_id: &SubjectId,
        verification_id: &SubjectId,
        otp_code: &str,
    ) -> FlowResult<ChangeCompletion> {
        self.client
            .post(
                &Self::path(channel, &Self::value_operation(channel, "verify-new")),
                &VerifyNewValueBody {
                    change_request_id: change_request_id.as_str(),
                    verification_id: verification_id.as_str(),
                    otp_code,
                },
            )
            .await
    }

    async fn resend_otp(
        &self,
        channel: ContactChannel,
        verification_id: &SubjectId,
    ) -> FlowResult<ResendReceipt> {
        self.client
            .post(
                &Self::path(channel, "resend-otp"),
                &ResendBody {
                    verification_id: verification_id.as_str(),
                },
            )
            .await
    }

    async fn revert(&self, channel: ContactChannel, revert_token: &str) -> FlowResult<()> {
        self.client
            .post_unit(&Self::path(channel, "revert"), &RevertBody { revert_token })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_the_channel() {
        assert_eq!(
            HttpContactChangeGateway::path(ContactChannel::Email, "verify-identity"),
            "/account/email/verify-identity"
        );
        assert_eq!(
            HttpContactChangeGateway::path(
                ContactChannel::Phone,
                &HttpContactChangeGateway::value_operation(ContactChannel::Phone, "submit-new")
            ),
            "/account/phone/submit-new-phone"
        );
    }
}
