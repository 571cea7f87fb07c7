//! Razorpay-backed [`PaymentProvider`] over the REST API with basic auth.

use anyhow::{Context as _, bail};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::domain::ports::{PaymentProvider, ProviderSubscription};

const API_BASE: &str = "https://api.razorpay.com/v1";

/// Billing cycles requested for every new subscription.
const TOTAL_COUNT: u32 = 12;

pub struct RazorpayProvider {
    client: Client,
    key_id: String,
    key_secret: String,
    plan_id: String,
}

#[derive(Deserialize)]
struct SubscriptionResponse {
    id: String,
    status: String,
}

impl From<SubscriptionResponse> for ProviderSubscription {
    fn from(resp: SubscriptionResponse) -> Self {
        Self {
            id: resp.id,
            status: resp.status,
        }
    }
}

impl RazorpayProvider {
    pub fn new(key_id: String, key_secret: String, plan_id: String) -> Self {
        Self {
            client: Client::new(),
            key_id,
            key_secret,
            plan_id,
        }
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.key_id, Some(&self.key_secret))
    }

    async fn send(&self, builder: RequestBuilder, what: &'static str) -> anyhow::Result<reqwest::Response> {
        let resp = self.authed(builder).send().await.context(what)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("{what}: razorpay returned {status}: {body}");
        }
        Ok(resp)
    }
}

#[async_trait]
impl PaymentProvider for RazorpayProvider {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_subscription(&self) -> anyhow::Result<ProviderSubscription> {
        let body = serde_json::json!({
            "plan_id": self.plan_id,
            "customer_notify": 1,
            "total_count": TOTAL_COUNT,
        });
        let resp = self
            .send(
                self.client.post(format!("{API_BASE}/subscriptions")).json(&body),
                "create subscription",
            )
            .await?;
        let created: SubscriptionResponse =
            resp.json().await.context("decode created subscription")?;
        Ok(created.into())
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> anyhow::Result<ProviderSubscription> {
        let resp = self
            .send(
                self.client
                    .post(format!("{API_BASE}/subscriptions/{subscription_id}/cancel"))
                    .json(&serde_json::json!({ "cancel_at_cycle_end": 0 })),
                "cancel subscription",
            )
            .await?;
        let cancelled: SubscriptionResponse =
            resp.json().await.context("decode cancelled subscription")?;
        Ok(cancelled.into())
    }

    async fn list_subscriptions(&self, count: u32) -> anyhow::Result<serde_json::Value> {
        let resp = self
            .send(
                self.client
                    .get(format!("{API_BASE}/subscriptions?count={count}")),
                "list subscriptions",
            )
            .await?;
        resp.json().await.context("decode subscription list")
    }
}
