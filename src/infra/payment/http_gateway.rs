use std::time::Duration;

use crate::domain::ports::{ChargeVerification, CreatedIntent, PaymentGateway};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the external payment provider over HTTP. Every call is bounded
/// by `GATEWAY_TIMEOUT`; the orchestrator treats a timeout during
/// verification the same as a failed verification.
pub struct HttpPaymentGateway {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(api_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .build()
            .expect("Failed to build payment gateway client");
        Self {
            client,
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct CreateIntentPayload<'a> {
    amount_cents: i64,
    currency: &'a str,
    method_token: Option<&'a str>,
}

#[derive(Deserialize)]
struct CreateIntentResponse {
    provider_ref: String,
}

#[derive(Deserialize)]
struct IntentStatusResponse {
    status: String,
    reason: Option<String>,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        method_token: Option<&str>,
    ) -> Result<CreatedIntent, AppError> {
        let payload = CreateIntentPayload {
            amount_cents,
            currency,
            method_token,
        };

        let res = self.client.post(format!("{}/intents", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment provider connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment provider rejected intent. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: CreateIntentResponse = res.json().await.map_err(|e| {
            AppError::InternalWithMsg(format!("Invalid payment provider response: {}", e))
        })?;

        Ok(CreatedIntent {
            provider_ref: body.provider_ref,
        })
    }

    async fn verify_intent(&self, provider_ref: &str) -> Result<ChargeVerification, AppError> {
        let res = self.client.get(format!("{}/intents/{}", self.api_url, provider_ref))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Payment provider connection error: {}", e)))?;

        if !res.status().is_success() {
            return Err(AppError::InternalWithMsg(format!(
                "Payment provider status lookup failed: {}",
                res.status()
            )));
        }

        let body: IntentStatusResponse = res.json().await.map_err(|e| {
            AppError::InternalWithMsg(format!("Invalid payment provider response: {}", e))
        })?;

        match body.status.as_str() {
            "succeeded" => Ok(ChargeVerification::Succeeded),
            _ => Ok(ChargeVerification::Failed(
                body.reason.unwrap_or_else(|| format!("provider reported status '{}'", body.status)),
            )),
        }
    }

    async fn refund_intent(&self, provider_ref: &str) -> Result<(), AppError> {
        let res = self.client.post(format!("{}/intents/{}/refund", self.api_url, provider_ref))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Payment provider connection error: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::InternalWithMsg(format!(
                "Refund failed. Status: {}, Body: {}",
                status, text
            )));
        }

        Ok(())
    }
}
