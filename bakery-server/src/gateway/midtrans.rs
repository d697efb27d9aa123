//! Midtrans Snap client (REST, no SDK)

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use super::signature::verify_signature;
use super::{GatewayError, Notification, PaymentGateway, SnapRequest, SnapToken};
use crate::config::MidtransConfig;

pub struct MidtransGateway {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
    timeout: Duration,
}

impl MidtransGateway {
    pub fn new(config: &MidtransConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            server_key: config.server_key.clone(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl PaymentGateway for MidtransGateway {
    async fn create_transaction(&self, request: &SnapRequest) -> Result<SnapToken, GatewayError> {
        let url = format!("{}/snap/v1/transactions", self.endpoint);
        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.server_key, None::<&str>)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = resp.json().await?;
        match (value["token"].as_str(), value["redirect_url"].as_str()) {
            (Some(token), Some(redirect_url)) => Ok(SnapToken {
                token: token.to_string(),
                redirect_url: redirect_url.to_string(),
            }),
            _ => Err(GatewayError::MalformedResponse(value.to_string())),
        }
    }

    fn verify_notification(&self, n: &Notification) -> bool {
        verify_signature(
            &n.order_id,
            &n.status_code,
            &n.gross_amount,
            &self.server_key,
            &n.signature_key,
        )
    }
}
